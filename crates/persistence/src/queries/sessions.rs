// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Session queries.

use diesel::prelude::*;
use tracing::debug;

use crate::data_models::SessionData;
use crate::diesel_schema::sessions;
use crate::error::PersistenceError;

/// Diesel Queryable struct for session rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = sessions)]
struct SessionRow {
    session_id: i64,
    session_key: String,
    user_id: i64,
    auth_hash: String,
    created_at: Option<String>,
    expires_at: String,
}

impl From<SessionRow> for SessionData {
    fn from(row: SessionRow) -> Self {
        Self {
            session_id: row.session_id,
            session_key: row.session_key,
            user_id: row.user_id,
            auth_hash: row.auth_hash,
            created_at: row.created_at,
            expires_at: row.expires_at,
        }
    }
}

/// Retrieves a session by its key.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `session_key` - The session key from the cookie
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if no session has that key.
pub fn get_session_by_key(
    conn: &mut SqliteConnection,
    session_key: &str,
) -> Result<Option<SessionData>, PersistenceError> {
    debug!("Looking up session by key");

    let result: Option<SessionRow> = sessions::table
        .filter(sessions::session_key.eq(session_key))
        .select(SessionRow::as_select())
        .first(conn)
        .optional()?;

    Ok(result.map(SessionData::from))
}

/// Counts sessions belonging to a user.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `user_id` - The user ID
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn count_sessions_for_user(
    conn: &mut SqliteConnection,
    user_id: i64,
) -> Result<i64, PersistenceError> {
    Ok(sessions::table
        .filter(sessions::user_id.eq(user_id))
        .count()
        .get_result(conn)?)
}
