// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Session mutations.

use diesel::prelude::*;
use tracing::{debug, info};

use crate::diesel_schema::sessions;
use crate::error::PersistenceError;
use crate::schema_init::get_last_insert_rowid;

/// Creates a session row directly, bypassing any login flow.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `session_key` - The opaque session key (must be unique)
/// * `user_id` - The authenticated user's ID
/// * `auth_hash` - Tamper-detection hash derived from the user's current
///   password hash
/// * `expires_at` - Expiry timestamp, ISO 8601
///
/// # Errors
///
/// Returns an error if the session cannot be created.
pub fn create_session(
    conn: &mut SqliteConnection,
    session_key: &str,
    user_id: i64,
    auth_hash: &str,
    expires_at: &str,
) -> Result<i64, PersistenceError> {
    info!(user_id, "Creating session");

    diesel::insert_into(sessions::table)
        .values((
            sessions::session_key.eq(session_key),
            sessions::user_id.eq(user_id),
            sessions::auth_hash.eq(auth_hash),
            sessions::expires_at.eq(expires_at),
        ))
        .execute(conn)?;

    let session_id: i64 = get_last_insert_rowid(conn)?;

    debug!(session_id, "Session created");

    Ok(session_id)
}

/// Deletes a session by key.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `session_key` - The session key
///
/// # Errors
///
/// Returns an error if the session does not exist or the delete fails.
pub fn delete_session(
    conn: &mut SqliteConnection,
    session_key: &str,
) -> Result<(), PersistenceError> {
    debug!("Deleting session");

    let rows_affected: usize = diesel::delete(sessions::table)
        .filter(sessions::session_key.eq(session_key))
        .execute(conn)?;

    if rows_affected == 0 {
        return Err(PersistenceError::SessionNotFound(format!(
            "Session with key {session_key} not found"
        )));
    }

    Ok(())
}

/// Deletes every session belonging to a user.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `user_id` - The user ID
///
/// # Errors
///
/// Returns an error if the delete fails.
pub fn delete_sessions_for_user(
    conn: &mut SqliteConnection,
    user_id: i64,
) -> Result<usize, PersistenceError> {
    debug!(user_id, "Deleting sessions for user");

    Ok(diesel::delete(sessions::table)
        .filter(sessions::user_id.eq(user_id))
        .execute(conn)?)
}
