// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Request handlers for the server surface.

use axum::{
    extract::{Form, Path, Query, State as AxumState},
    http::{StatusCode, header},
    response::{Html, IntoResponse, Response},
};
use serde::Deserialize;
use studium_persistence::session_auth_hash;
use time::{Duration, OffsetDateTime};
use tracing::{debug, info, warn};

use crate::session::{SESSION_COOKIE_NAME, SessionUser};
use crate::{AppState, render};

/// How long a session minted by the login form stays valid.
const SESSION_LIFETIME: Duration = Duration::days(14);

/// Where a successful login lands when no `next` target was given.
const DEFAULT_NEXT: &str = "/learning/assignments/";

/// Query parameters for the login page.
#[derive(Debug, Deserialize)]
pub struct LoginPageQuery {
    /// Path to return to after signing in.
    next: Option<String>,
}

/// Form fields of the login submission.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    username: String,
    password: String,
    verification_token: Option<String>,
    next: Option<String>,
}

/// Query parameters of the assignments listing.
#[derive(Debug, Deserialize)]
pub struct AssignmentsQuery {
    /// Course filter; empty string means all courses.
    course: Option<String>,
    /// Present when the filter form was submitted.
    #[allow(dead_code)]
    apply: Option<String>,
}

/// Form fields of a comment submission.
#[derive(Debug, Deserialize)]
pub struct CommentForm {
    body: String,
}

/// `GET /login/`
pub async fn handle_login_page(Query(query): Query<LoginPageQuery>) -> Html<String> {
    Html(render::login_page(None, query.next.as_deref()))
}

/// `POST /login/`
///
/// Verification checkpoint first, credentials second; a failed check
/// re-renders the form rather than leaking which step failed to a probe.
pub async fn handle_login_submit(
    AxumState(state): AxumState<AppState>,
    Form(form): Form<LoginForm>,
) -> Response {
    let verification = state.verification.lock().await;
    let verified = verification.check("login_form", form.verification_token.as_deref());
    drop(verification);

    if !verified {
        warn!(username = %form.username, "Login rejected by verification checkpoint");
        return Html(render::login_page(
            Some("Verification failed. Please try again."),
            form.next.as_deref(),
        ))
        .into_response();
    }

    let mut persistence = state.persistence.lock().await;

    let credentials_error = || {
        Html(render::login_page(
            Some("Please enter a correct username and password."),
            form.next.as_deref(),
        ))
        .into_response()
    };

    let Ok(Some(user)) = persistence.get_user_by_username(&form.username) else {
        debug!(username = %form.username, "Unknown username");
        return credentials_error();
    };

    if !user.is_active || !persistence.verify_password(user.user_id, &form.password).unwrap_or(false)
    {
        debug!(username = %form.username, "Bad credentials");
        return credentials_error();
    }

    let session_key = generate_session_key();
    let auth_hash = session_auth_hash(&user.password_hash);
    let Ok(expires_at) = (OffsetDateTime::now_utc() + SESSION_LIFETIME)
        .format(&time::format_description::well_known::Iso8601::DEFAULT)
    else {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    };

    if let Err(e) = persistence.create_session(&session_key, user.user_id, &auth_hash, &expires_at)
    {
        warn!(error = %e, "Session creation failed");
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }
    drop(persistence);

    info!(username = %user.username, "Login succeeded");

    let next = form.next.as_deref().filter(|n| n.starts_with('/'));
    let cookie = format!("{SESSION_COOKIE_NAME}={session_key}; Path=/; HttpOnly; SameSite=Lax");
    (
        StatusCode::FOUND,
        [
            (header::SET_COOKIE, cookie),
            (header::LOCATION, next.unwrap_or(DEFAULT_NEXT).to_string()),
        ],
    )
        .into_response()
}

/// `GET /learning/assignments/`
pub async fn handle_assignments_list(
    AxumState(state): AxumState<AppState>,
    SessionUser(user): SessionUser,
    Query(query): Query<AssignmentsQuery>,
) -> Response {
    let course_filter = query
        .course
        .as_deref()
        .and_then(|raw| raw.parse::<i64>().ok());

    let mut persistence = state.persistence.lock().await;
    let courses = persistence.courses_for_student(user.user_id);
    let assignments = persistence.assignments_for_student(user.user_id, course_filter);
    drop(persistence);

    match (courses, assignments) {
        (Ok(courses), Ok(assignments)) => Html(render::assignments_page(
            &courses,
            &assignments,
            course_filter,
        ))
        .into_response(),
        (Err(e), _) | (_, Err(e)) => {
            warn!(error = %e, "Assignments lookup failed");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// `GET /learning/assignments/{assignment_id}/`
pub async fn handle_assignment_detail(
    AxumState(state): AxumState<AppState>,
    SessionUser(_user): SessionUser,
    Path(assignment_id): Path<i64>,
) -> Response {
    let mut persistence = state.persistence.lock().await;
    let assignment = persistence.get_assignment(assignment_id);
    let comments = persistence.comments_for_assignment(assignment_id);
    drop(persistence);

    match (assignment, comments) {
        (Ok(Some(assignment)), Ok(comments)) => {
            Html(render::assignment_detail_page(&assignment, &comments)).into_response()
        }
        (Ok(None), _) => StatusCode::NOT_FOUND.into_response(),
        (Err(e), _) | (_, Err(e)) => {
            warn!(error = %e, "Assignment lookup failed");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// `POST /learning/assignments/{assignment_id}/comments/`
pub async fn handle_add_comment(
    AxumState(state): AxumState<AppState>,
    SessionUser(user): SessionUser,
    Path(assignment_id): Path<i64>,
    Form(form): Form<CommentForm>,
) -> Response {
    let mut persistence = state.persistence.lock().await;

    match persistence.get_assignment(assignment_id) {
        Ok(Some(_)) => {}
        Ok(None) => return StatusCode::NOT_FOUND.into_response(),
        Err(e) => {
            warn!(error = %e, "Assignment lookup failed");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    }

    if let Err(e) = persistence.add_comment(assignment_id, user.user_id, &form.body) {
        warn!(error = %e, "Comment insert failed");
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }
    drop(persistence);

    debug!(assignment_id, "Comment added");
    (
        StatusCode::FOUND,
        [(
            header::LOCATION,
            format!("/learning/assignments/{assignment_id}/"),
        )],
    )
        .into_response()
}

/// Generates a unique session key.
fn generate_session_key() -> String {
    use std::time::{SystemTime, UNIX_EPOCH};
    let timestamp: u128 = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.as_nanos());
    format!("sess_{timestamp:x}{:016x}", rand::random::<u64>())
}
