// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Test module for the server crate.

#![allow(clippy::expect_used, clippy::unwrap_used)]

mod assignments_tests;

use axum::{
    body::Body,
    http::{Request, header},
    response::Response,
};
use studium_fixtures::{TEST_DOMAIN_ID, ensure_student, repopulate_baseline};
use studium_persistence::{SqlitePersistence, UserData};

use crate::{AppState, SESSION_COOKIE_NAME, VerificationRegistry};

/// App state over a fresh seeded database, verification bypassed.
pub fn bypassed_state() -> AppState {
    let mut persistence = SqlitePersistence::new_in_memory().unwrap();
    repopulate_baseline(&mut persistence).unwrap();

    let mut verification = VerificationRegistry::with_challenge("prod-token");
    verification.bypass_all();

    AppState::new(persistence, verification)
}

/// Seeds the standard student into the state's database.
pub async fn seed_student(state: &AppState, username: &str) -> UserData {
    let mut persistence = state.persistence.lock().await;
    ensure_student(&mut persistence, TEST_DOMAIN_ID, username).unwrap()
}

/// Injects a session for the user and returns the Cookie header value.
pub async fn session_cookie_for(state: &AppState, user: &UserData) -> String {
    let mut persistence = state.persistence.lock().await;
    let session = studium_fixtures::force_login(&mut persistence, user).unwrap();
    format!("{SESSION_COOKIE_NAME}={}", session.session_key)
}

/// Builds a GET request, optionally with a session cookie.
pub fn get_request(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

/// Builds a form POST request, optionally with a session cookie.
pub fn form_request(uri: &str, body: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

/// Collects a response body into a string.
pub async fn body_text(response: Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}
