//! User store operations.
//!
//! Registration, authentication and password handling live in the external
//! identity subsystem; it hands us the account fields ready-made. This
//! module owns persistence and the `role` field.

use chrono::Utc;
use diesel::prelude::*;
use log::info;
use serde::Deserialize;
use uuid::Uuid;

use crate::shared::enums::UserRole;
use crate::shared::error::{DeskError, DeskResult};
use crate::shared::models::User;
use crate::shared::schema::users;

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub role: UserRole,
}

#[derive(Debug, Default, Deserialize)]
pub struct UserQuery {
    pub search: Option<String>,
    pub role: Option<UserRole>,
    pub is_active: Option<bool>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

pub fn create_user(conn: &mut PgConnection, req: CreateUserRequest) -> DeskResult<User> {
    if req.username.trim().is_empty() {
        return Err(DeskError::Validation("Username must not be empty".into()));
    }

    let now = Utc::now();
    let user = User {
        id: Uuid::new_v4(),
        username: req.username,
        email: req.email,
        password_hash: req.password_hash,
        role: req.role,
        is_active: true,
        created_at: now,
        updated_at: now,
    };

    diesel::insert_into(users::table)
        .values(&user)
        .execute(conn)?;

    info!("Created user {} with role {}", user.id, user.role);
    Ok(user)
}

pub fn get_user(conn: &mut PgConnection, id: Uuid) -> DeskResult<User> {
    users::table
        .filter(users::id.eq(id))
        .first(conn)
        .optional()?
        .ok_or_else(|| DeskError::NotFound(format!("User {id}")))
}

pub fn find_user_by_username(
    conn: &mut PgConnection,
    username: &str,
) -> DeskResult<Option<User>> {
    let user = users::table
        .filter(users::username.eq(username))
        .first(conn)
        .optional()?;
    Ok(user)
}

pub fn list_users(conn: &mut PgConnection, query: UserQuery) -> DeskResult<Vec<User>> {
    let limit = query.limit.unwrap_or(50);
    let offset = query.offset.unwrap_or(0);

    let mut q = users::table.into_boxed();

    if let Some(role) = query.role {
        q = q.filter(users::role.eq(role));
    }

    if let Some(is_active) = query.is_active {
        q = q.filter(users::is_active.eq(is_active));
    }

    if let Some(search) = query.search {
        let pattern = format!("%{search}%");
        q = q.filter(
            users::username
                .ilike(pattern.clone())
                .or(users::email.ilike(pattern)),
        );
    }

    let rows = q
        .order(users::created_at.desc())
        .limit(limit)
        .offset(offset)
        .load(conn)?;

    Ok(rows)
}

/// Administrative role change.
pub fn set_user_role(conn: &mut PgConnection, id: Uuid, role: UserRole) -> DeskResult<User> {
    let affected = diesel::update(users::table.filter(users::id.eq(id)))
        .set((users::role.eq(role), users::updated_at.eq(Utc::now())))
        .execute(conn)?;
    if affected == 0 {
        return Err(DeskError::NotFound(format!("User {id}")));
    }

    info!("User {} role set to {}", id, role);
    get_user(conn, id)
}

/// Tickets owned by the user cascade; tickets they were assigned to fall
/// back to unassigned.
pub fn delete_user(conn: &mut PgConnection, id: Uuid) -> DeskResult<()> {
    let affected = diesel::delete(users::table.filter(users::id.eq(id))).execute(conn)?;
    if affected == 0 {
        return Err(DeskError::NotFound(format!("User {id}")));
    }

    info!("Deleted user {}", id);
    Ok(())
}
