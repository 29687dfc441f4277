// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! User and role-grant queries.

use diesel::prelude::*;
use tracing::debug;

use crate::data_models::{RoleGrantData, UserData};
use crate::diesel_schema::{user_roles, users};
use crate::error::PersistenceError;

/// Diesel Queryable struct for user rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = users)]
struct UserRow {
    user_id: i64,
    username: String,
    email: String,
    first_name: String,
    last_name: String,
    gender: String,
    is_staff: i32,
    is_superuser: i32,
    is_active: i32,
    password_hash: String,
    created_at: Option<String>,
}

impl From<UserRow> for UserData {
    fn from(row: UserRow) -> Self {
        Self {
            user_id: row.user_id,
            username: row.username,
            email: row.email,
            first_name: row.first_name,
            last_name: row.last_name,
            gender: row.gender,
            is_staff: row.is_staff != 0,
            is_superuser: row.is_superuser != 0,
            is_active: row.is_active != 0,
            password_hash: row.password_hash,
            created_at: row.created_at,
        }
    }
}

/// Retrieves a user by username.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `username` - The username to search for
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the user is not found.
pub fn get_user_by_username(
    conn: &mut SqliteConnection,
    username: &str,
) -> Result<Option<UserData>, PersistenceError> {
    debug!(username, "Looking up user by username");

    let result: Option<UserRow> = users::table
        .filter(users::username.eq(username))
        .select(UserRow::as_select())
        .first(conn)
        .optional()?;

    Ok(result.map(UserData::from))
}

/// Retrieves a user by ID.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `user_id` - The user ID
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the user is not found.
pub fn get_user_by_id(
    conn: &mut SqliteConnection,
    user_id: i64,
) -> Result<Option<UserData>, PersistenceError> {
    debug!(user_id, "Looking up user by ID");

    let result: Option<UserRow> = users::table
        .filter(users::user_id.eq(user_id))
        .select(UserRow::as_select())
        .first(conn)
        .optional()?;

    Ok(result.map(UserData::from))
}

/// Counts user rows with the given username.
///
/// Used by tests asserting the idempotent-seeding invariant: after any
/// number of `ensure_*` calls, exactly one row exists per logical name.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `username` - The username to count
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn count_users_with_username(
    conn: &mut SqliteConnection,
    username: &str,
) -> Result<i64, PersistenceError> {
    Ok(users::table
        .filter(users::username.eq(username))
        .count()
        .get_result(conn)?)
}

/// Verifies a candidate password against a user's stored bcrypt hash.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `user_id` - The user ID
/// * `candidate` - The plain-text password to check
///
/// # Errors
///
/// Returns an error if the user does not exist or hash verification fails
/// structurally (a malformed stored hash).
pub fn verify_password(
    conn: &mut SqliteConnection,
    user_id: i64,
    candidate: &str,
) -> Result<bool, PersistenceError> {
    let stored_hash: Option<String> = users::table
        .filter(users::user_id.eq(user_id))
        .select(users::password_hash)
        .first(conn)
        .optional()?;

    let stored_hash: String = stored_hash.ok_or_else(|| {
        PersistenceError::UserNotFound(format!("User with ID {user_id} not found"))
    })?;

    bcrypt::verify(candidate, &stored_hash)
        .map_err(|e| PersistenceError::Other(format!("Failed to verify password: {e}")))
}

/// Lists all role grants for a user, ordered by site and role.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `user_id` - The user ID
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn roles_for_user(
    conn: &mut SqliteConnection,
    user_id: i64,
) -> Result<Vec<RoleGrantData>, PersistenceError> {
    let rows: Vec<(i64, i64, i64, String)> = user_roles::table
        .filter(user_roles::user_id.eq(user_id))
        .order((user_roles::site_id.asc(), user_roles::role.asc()))
        .select((
            user_roles::role_id,
            user_roles::user_id,
            user_roles::site_id,
            user_roles::role,
        ))
        .load(conn)?;

    Ok(rows
        .into_iter()
        .map(|(role_id, user_id, site_id, role)| RoleGrantData {
            role_id,
            user_id,
            site_id,
            role,
        })
        .collect())
}

/// Checks whether a user holds a role on a site.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `user_id` - The user ID
/// * `site_id` - The site scoping the grant
/// * `role` - The role string
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn has_role(
    conn: &mut SqliteConnection,
    user_id: i64,
    site_id: i64,
    role: &str,
) -> Result<bool, PersistenceError> {
    let count: i64 = user_roles::table
        .filter(user_roles::user_id.eq(user_id))
        .filter(user_roles::site_id.eq(site_id))
        .filter(user_roles::role.eq(role))
        .count()
        .get_result(conn)?;

    Ok(count > 0)
}
