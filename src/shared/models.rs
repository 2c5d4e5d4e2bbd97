use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::enums::{TicketPriority, TicketStatus, UserRole};
use super::schema::{ticket_status_history, tickets, users};

/// A user account. The identity fields (`username`, `email`,
/// `password_hash`, `is_active`) belong to the external identity subsystem;
/// this schema owns `role`.
#[derive(Debug, Clone, Serialize, Deserialize, Queryable, Insertable, AsChangeset)]
#[diesel(table_name = users)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: UserRole,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A support request. Owned by exactly one customer; deleting the customer
/// deletes the ticket, deleting the assigned agent only clears `agent_id`.
#[derive(Debug, Clone, Serialize, Deserialize, Queryable, Insertable, AsChangeset)]
#[diesel(table_name = tickets)]
pub struct Ticket {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub agent_id: Option<Uuid>,
    pub subject: String,
    pub description: String,
    pub status: TicketStatus,
    pub priority: TicketPriority,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One row per status transition on a ticket. Append-only; rows leave the
/// table only via cascade from the owning ticket or the changing user.
#[derive(Debug, Clone, Serialize, Deserialize, Queryable, Insertable)]
#[diesel(table_name = ticket_status_history)]
pub struct TicketStatusHistory {
    pub id: Uuid,
    pub ticket_id: Uuid,
    pub status: TicketStatus,
    pub changed_by: Uuid,
    pub changed_at: DateTime<Utc>,
}
