//! Shared scaffolding for the database integration tests.
//!
//! Tests run against the PostgreSQL pointed to by `DATABASE_URL` and skip
//! when no database is reachable.

use std::sync::OnceLock;

use diesel::PgConnection;
use ticketdesk::assert_ok;
use ticketdesk::config::DatabaseConfig;
use ticketdesk::shared::enums::UserRole;
use ticketdesk::shared::models::User;
use ticketdesk::shared::utils::{create_conn, run_migrations, DbPool};
use ticketdesk::users::{create_user, CreateUserRequest};
use uuid::Uuid;

pub fn test_pool() -> Option<DbPool> {
    static POOL: OnceLock<Option<DbPool>> = OnceLock::new();
    POOL.get_or_init(|| {
        ticketdesk::tests::test_util::setup();
        let url = std::env::var("DATABASE_URL").ok()?;
        let config = DatabaseConfig {
            url,
            max_connections: 4,
        };
        let pool = create_conn(&config).ok()?;
        pool.get().ok()?;
        run_migrations(&pool).ok()?;
        Some(pool)
    })
    .clone()
}

pub fn unique(prefix: &str) -> String {
    format!("{prefix}-{}", Uuid::new_v4().simple())
}

pub fn create_role_user(conn: &mut PgConnection, role: UserRole) -> User {
    let username = unique(role.as_str());
    assert_ok!(create_user(
        conn,
        CreateUserRequest {
            email: format!("{username}@example.com"),
            username,
            password_hash: "external-hash".to_string(),
            role,
        },
    ))
}
