pub mod enums;
pub mod error;
pub mod models;
pub mod schema;
pub mod utils;

pub use enums::{TicketPriority, TicketStatus, UserRole};
pub use error::{DeskError, DeskResult};
pub use models::{Ticket, TicketStatusHistory, User};
pub use utils::{create_conn, establish_pg_connection, run_migrations, DbPool};

pub mod prelude {
    pub use super::schema::*;
    pub use super::{
        DbPool, DeskError, DeskResult, Ticket, TicketPriority, TicketStatus, TicketStatusHistory,
        User, UserRole,
    };

    pub use diesel::prelude::*;
    pub use diesel::{ExpressionMethods, QueryDsl, RunQueryDsl};

    pub use chrono::{DateTime, Utc};
    pub use serde::{Deserialize, Serialize};
    pub use uuid::Uuid;
}
