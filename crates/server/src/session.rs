// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Session extraction for the server.
//!
//! [`SessionUser`] validates the `sessionid` cookie: the session row must
//! exist, must not be expired, and its auth-hash must still match the
//! user's current password hash. Any failure redirects to the login page
//! with the original path in `next`, the same place an anonymous request
//! lands.

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, header, request::Parts},
    response::{IntoResponse, Response},
};
use studium_persistence::{UserData, session_auth_hash};
use time::OffsetDateTime;
use tracing::{debug, warn};

use crate::AppState;

/// Name of the session cookie.
pub const SESSION_COOKIE_NAME: &str = "sessionid";

/// Extractor for the authenticated user behind the session cookie.
pub struct SessionUser(pub UserData);

impl FromRequestParts<AppState> for SessionUser {
    type Rejection = SessionRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let next = parts
            .uri
            .path_and_query()
            .map_or_else(|| "/".to_string(), ToString::to_string);
        let reject = || SessionRejection { next: next.clone() };

        let session_key = session_cookie(parts).ok_or_else(|| {
            debug!("No session cookie on request");
            reject()
        })?;

        let mut persistence = state.persistence.lock().await;

        let session = persistence
            .get_session_by_key(&session_key)
            .map_err(|e| {
                warn!(error = %e, "Session lookup failed");
                reject()
            })?
            .ok_or_else(|| {
                debug!("Unknown session key");
                reject()
            })?;

        if is_expired(&session.expires_at) {
            debug!("Session expired");
            return Err(reject());
        }

        let user = persistence
            .get_user_by_id(session.user_id)
            .map_err(|e| {
                warn!(error = %e, "User lookup failed");
                reject()
            })?
            .ok_or_else(reject)?;

        // A password rotation invalidates every session minted before it.
        if session_auth_hash(&user.password_hash) != session.auth_hash {
            warn!(username = %user.username, "Stale session auth-hash");
            return Err(reject());
        }

        if !user.is_active {
            debug!(username = %user.username, "Inactive user");
            return Err(reject());
        }

        Ok(Self(user))
    }
}

/// Rejection that redirects to the login page, preserving the target.
#[derive(Debug)]
pub struct SessionRejection {
    next: String,
}

impl IntoResponse for SessionRejection {
    fn into_response(self) -> Response {
        let location = format!("/login/?next={}", self.next);
        (
            StatusCode::FOUND,
            [(header::LOCATION, location)],
        )
            .into_response()
    }
}

/// Pulls the session key out of the Cookie header, if present.
fn session_cookie(parts: &Parts) -> Option<String> {
    let header_value = parts.headers.get(header::COOKIE)?.to_str().ok()?;

    header_value.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        (name == SESSION_COOKIE_NAME).then(|| value.to_string())
    })
}

/// Whether an ISO 8601 expiry timestamp is in the past (or unparseable).
fn is_expired(expires_at: &str) -> bool {
    OffsetDateTime::parse(
        expires_at,
        &time::format_description::well_known::Iso8601::DEFAULT,
    )
    .map_or(true, |expiry| expiry <= OffsetDateTime::now_utc())
}
