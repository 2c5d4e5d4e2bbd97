use chrono::Utc;
use diesel::prelude::*;
use log::info;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::shared::enums::{TicketPriority, TicketStatus};
use crate::shared::error::{DeskError, DeskResult};
use crate::shared::models::{Ticket, TicketStatusHistory};
use crate::shared::schema::{ticket_status_history, tickets};

/// Upper bound on the subject column, in characters.
pub const MAX_SUBJECT_LEN: usize = 255;

#[derive(Debug, Deserialize)]
pub struct CreateTicketRequest {
    pub customer_id: Uuid,
    pub agent_id: Option<Uuid>,
    pub subject: String,
    pub description: String,
    pub priority: TicketPriority,
}

#[derive(Debug, Deserialize, AsChangeset)]
#[diesel(table_name = tickets)]
pub struct UpdateTicketRequest {
    pub subject: Option<String>,
    pub description: Option<String>,
    pub priority: Option<TicketPriority>,
}

#[derive(Debug, Deserialize)]
pub struct ChangeStatusRequest {
    pub status: TicketStatus,
    pub changed_by: Uuid,
}

#[derive(Debug, Default, Deserialize)]
pub struct TicketQuery {
    pub search: Option<String>,
    pub status: Option<TicketStatus>,
    pub priority: Option<TicketPriority>,
    pub customer_id: Option<Uuid>,
    pub agent_id: Option<Uuid>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct TicketStats {
    pub total_tickets: i64,
    pub open_tickets: i64,
    pub in_progress_tickets: i64,
    pub resolved_tickets: i64,
}

fn validate_subject(subject: &str) -> DeskResult<()> {
    if subject.trim().is_empty() {
        return Err(DeskError::Validation("Subject must not be empty".into()));
    }
    if subject.chars().count() > MAX_SUBJECT_LEN {
        return Err(DeskError::Validation(format!(
            "Subject exceeds {MAX_SUBJECT_LEN} characters"
        )));
    }
    Ok(())
}

pub fn create_ticket(conn: &mut PgConnection, req: CreateTicketRequest) -> DeskResult<Ticket> {
    validate_subject(&req.subject)?;
    if req.description.trim().is_empty() {
        return Err(DeskError::Validation("Description must not be empty".into()));
    }

    let now = Utc::now();
    let ticket = Ticket {
        id: Uuid::new_v4(),
        customer_id: req.customer_id,
        agent_id: req.agent_id,
        subject: req.subject,
        description: req.description,
        status: TicketStatus::default(),
        priority: req.priority,
        created_at: now,
        updated_at: now,
    };

    diesel::insert_into(tickets::table)
        .values(&ticket)
        .execute(conn)?;

    info!(
        "Created ticket {} for customer {}",
        ticket.id, ticket.customer_id
    );
    Ok(ticket)
}

pub fn get_ticket(conn: &mut PgConnection, id: Uuid) -> DeskResult<Ticket> {
    tickets::table
        .filter(tickets::id.eq(id))
        .first(conn)
        .optional()?
        .ok_or_else(|| DeskError::NotFound(format!("Ticket {id}")))
}

pub fn list_tickets(conn: &mut PgConnection, query: TicketQuery) -> DeskResult<Vec<Ticket>> {
    let limit = query.limit.unwrap_or(50);
    let offset = query.offset.unwrap_or(0);

    let mut q = tickets::table.into_boxed();

    if let Some(status) = query.status {
        q = q.filter(tickets::status.eq(status));
    }

    if let Some(priority) = query.priority {
        q = q.filter(tickets::priority.eq(priority));
    }

    if let Some(customer_id) = query.customer_id {
        q = q.filter(tickets::customer_id.eq(customer_id));
    }

    if let Some(agent_id) = query.agent_id {
        q = q.filter(tickets::agent_id.eq(agent_id));
    }

    if let Some(search) = query.search {
        let pattern = format!("%{search}%");
        q = q.filter(tickets::subject.ilike(pattern));
    }

    let rows = q
        .order(tickets::created_at.desc())
        .limit(limit)
        .offset(offset)
        .load(conn)?;

    Ok(rows)
}

/// All tickets opened by a customer, newest first.
pub fn list_tickets_for_customer(
    conn: &mut PgConnection,
    customer_id: Uuid,
) -> DeskResult<Vec<Ticket>> {
    let rows = tickets::table
        .filter(tickets::customer_id.eq(customer_id))
        .order(tickets::created_at.desc())
        .load(conn)?;
    Ok(rows)
}

/// All tickets currently assigned to an agent, newest first.
pub fn list_tickets_for_agent(conn: &mut PgConnection, agent_id: Uuid) -> DeskResult<Vec<Ticket>> {
    let rows = tickets::table
        .filter(tickets::agent_id.eq(agent_id))
        .order(tickets::created_at.desc())
        .load(conn)?;
    Ok(rows)
}

/// Edits subject, description or priority. Status changes go through
/// [`change_status`] so the audit trail stays complete; `created_at` is
/// never written after creation.
pub fn update_ticket(
    conn: &mut PgConnection,
    id: Uuid,
    req: UpdateTicketRequest,
) -> DeskResult<Ticket> {
    if let Some(subject) = req.subject.as_deref() {
        validate_subject(subject)?;
    }
    if let Some(description) = req.description.as_deref() {
        if description.trim().is_empty() {
            return Err(DeskError::Validation("Description must not be empty".into()));
        }
    }

    let affected = diesel::update(tickets::table.filter(tickets::id.eq(id)))
        .set((&req, tickets::updated_at.eq(Utc::now())))
        .execute(conn)?;
    if affected == 0 {
        return Err(DeskError::NotFound(format!("Ticket {id}")));
    }

    get_ticket(conn, id)
}

pub fn assign_ticket(conn: &mut PgConnection, id: Uuid, agent_id: Uuid) -> DeskResult<Ticket> {
    let affected = diesel::update(tickets::table.filter(tickets::id.eq(id)))
        .set((
            tickets::agent_id.eq(Some(agent_id)),
            tickets::updated_at.eq(Utc::now()),
        ))
        .execute(conn)?;
    if affected == 0 {
        return Err(DeskError::NotFound(format!("Ticket {id}")));
    }

    info!("Assigned ticket {} to agent {}", id, agent_id);
    get_ticket(conn, id)
}

pub fn unassign_ticket(conn: &mut PgConnection, id: Uuid) -> DeskResult<Ticket> {
    let affected = diesel::update(tickets::table.filter(tickets::id.eq(id)))
        .set((
            tickets::agent_id.eq(None::<Uuid>),
            tickets::updated_at.eq(Utc::now()),
        ))
        .execute(conn)?;
    if affected == 0 {
        return Err(DeskError::NotFound(format!("Ticket {id}")));
    }

    get_ticket(conn, id)
}

/// Moves a ticket to a new status and appends the audit row in the same
/// transaction. Every status change in the system goes through here.
pub fn change_status(
    conn: &mut PgConnection,
    id: Uuid,
    req: ChangeStatusRequest,
) -> DeskResult<Ticket> {
    let now = Utc::now();

    let ticket = conn.transaction::<Ticket, DeskError, _>(|conn| {
        let affected = diesel::update(tickets::table.filter(tickets::id.eq(id)))
            .set((tickets::status.eq(req.status), tickets::updated_at.eq(now)))
            .execute(conn)?;
        if affected == 0 {
            return Err(DeskError::NotFound(format!("Ticket {id}")));
        }

        let entry = TicketStatusHistory {
            id: Uuid::new_v4(),
            ticket_id: id,
            status: req.status,
            changed_by: req.changed_by,
            changed_at: now,
        };
        diesel::insert_into(ticket_status_history::table)
            .values(&entry)
            .execute(conn)?;

        tickets::table
            .filter(tickets::id.eq(id))
            .first(conn)
            .map_err(DeskError::from)
    })?;

    info!(
        "Ticket {} moved to {} by user {}",
        id, req.status, req.changed_by
    );
    Ok(ticket)
}

pub fn resolve_ticket(conn: &mut PgConnection, id: Uuid, changed_by: Uuid) -> DeskResult<Ticket> {
    change_status(
        conn,
        id,
        ChangeStatusRequest {
            status: TicketStatus::Resolved,
            changed_by,
        },
    )
}

pub fn reopen_ticket(conn: &mut PgConnection, id: Uuid, changed_by: Uuid) -> DeskResult<Ticket> {
    change_status(
        conn,
        id,
        ChangeStatusRequest {
            status: TicketStatus::Open,
            changed_by,
        },
    )
}

/// History rows cascade with the ticket.
pub fn delete_ticket(conn: &mut PgConnection, id: Uuid) -> DeskResult<()> {
    let affected = diesel::delete(tickets::table.filter(tickets::id.eq(id))).execute(conn)?;
    if affected == 0 {
        return Err(DeskError::NotFound(format!("Ticket {id}")));
    }

    info!("Deleted ticket {}", id);
    Ok(())
}

/// Status transitions for a ticket, oldest first.
pub fn list_status_history(
    conn: &mut PgConnection,
    ticket_id: Uuid,
) -> DeskResult<Vec<TicketStatusHistory>> {
    let rows = ticket_status_history::table
        .filter(ticket_status_history::ticket_id.eq(ticket_id))
        .order(ticket_status_history::changed_at.asc())
        .load(conn)?;
    Ok(rows)
}

pub fn ticket_stats(conn: &mut PgConnection) -> DeskResult<TicketStats> {
    let total_tickets: i64 = tickets::table.count().get_result(conn)?;

    let open_tickets: i64 = tickets::table
        .filter(tickets::status.eq(TicketStatus::Open))
        .count()
        .get_result(conn)?;

    let in_progress_tickets: i64 = tickets::table
        .filter(tickets::status.eq(TicketStatus::InProgress))
        .count()
        .get_result(conn)?;

    let resolved_tickets: i64 = tickets::table
        .filter(tickets::status.eq(TicketStatus::Resolved))
        .count()
        .get_result(conn)?;

    Ok(TicketStats {
        total_tickets,
        open_tickets,
        in_progress_tickets,
        resolved_tickets,
    })
}
