// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Session injection.
//!
//! `force_login` writes a session row directly, skipping the login form
//! and any verification challenge. `inject_session` additionally packages
//! the session as a cookie descriptor scoped by the live-server URL, so
//! the cookie follows the dynamically allocated port instead of a
//! hardcoded domain.

use studium_browser::CookieSpec;
use studium_persistence::{SessionData, SqlitePersistence, UserData};
use time::{Duration, OffsetDateTime};
use tracing::info;

pub use studium_persistence::session_auth_hash;

use crate::error::FixtureError;

/// Name of the session cookie the server reads.
pub const SESSION_COOKIE_NAME: &str = "sessionid";

/// How long an injected session stays valid.
pub const SESSION_LIFETIME: Duration = Duration::days(14);

/// Creates a session row for the user without going through the login form.
///
/// # Errors
///
/// Returns an error if the expiry timestamp cannot be formatted or the
/// insert fails.
pub fn force_login(
    persistence: &mut SqlitePersistence,
    user: &UserData,
) -> Result<SessionData, FixtureError> {
    let session_key = generate_session_key();
    let auth_hash = session_auth_hash(&user.password_hash);

    let expires_at = (OffsetDateTime::now_utc() + SESSION_LIFETIME)
        .format(&time::format_description::well_known::Iso8601::DEFAULT)
        .map_err(|e| FixtureError::TimestampFormat(e.to_string()))?;

    info!(username = %user.username, "Injecting session");
    let session_id =
        persistence.create_session(&session_key, user.user_id, &auth_hash, &expires_at)?;

    Ok(SessionData {
        session_id,
        session_key,
        user_id: user.user_id,
        auth_hash,
        created_at: None,
        expires_at,
    })
}

/// Force-logs the user in and returns the cookie to attach to a page.
///
/// The cookie is scoped by the base URL (host and port together); scoping
/// by domain while the server lives on a dynamic port is the classic way
/// injected sessions silently fail to be sent.
///
/// # Errors
///
/// Returns an error if the session cannot be created.
pub fn inject_session(
    persistence: &mut SqlitePersistence,
    user: &UserData,
    base_url: &str,
) -> Result<CookieSpec, FixtureError> {
    let session = force_login(persistence, user)?;

    Ok(CookieSpec::for_url(
        SESSION_COOKIE_NAME,
        &session.session_key,
        base_url,
    ))
}

/// Generates a unique session key.
fn generate_session_key() -> String {
    use std::time::{SystemTime, UNIX_EPOCH};
    let timestamp: u128 = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.as_nanos());
    format!("sess_{timestamp:x}{:016x}", rand::random::<u64>())
}
