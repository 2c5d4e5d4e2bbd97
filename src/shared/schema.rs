diesel::table! {
    users (id) {
        id -> Uuid,
        username -> Text,
        email -> Text,
        password_hash -> Text,
        #[max_length = 20]
        role -> Varchar,
        is_active -> Bool,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    tickets (id) {
        id -> Uuid,
        customer_id -> Uuid,
        agent_id -> Nullable<Uuid>,
        #[max_length = 255]
        subject -> Varchar,
        description -> Text,
        #[max_length = 20]
        status -> Varchar,
        #[max_length = 20]
        priority -> Varchar,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    ticket_status_history (id) {
        id -> Uuid,
        ticket_id -> Uuid,
        #[max_length = 20]
        status -> Varchar,
        changed_by -> Uuid,
        changed_at -> Timestamptz,
    }
}

diesel::joinable!(ticket_status_history -> tickets (ticket_id));
diesel::joinable!(ticket_status_history -> users (changed_by));

diesel::allow_tables_to_appear_in_same_query!(users, tickets, ticket_status_history);
