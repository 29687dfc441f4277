// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Minimal LMS server surface for the Studium test harness.
//!
//! The routes here are the ones the harness protocols exercise: the login
//! form (with its verification checkpoint), the assignments listing with
//! its course filter, and the assignment detail page with its comment
//! form. Session validation runs as a [`SessionUser`] extractor; the
//! verification seam is a [`VerificationRegistry`] whose checkpoints the
//! harness overrides with [`AlwaysPass`].

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use studium_persistence::SqlitePersistence;
use tokio::sync::Mutex;

mod handlers;
mod render;
mod session;
mod verify;

#[cfg(test)]
mod tests;

pub use session::{SESSION_COOKIE_NAME, SessionRejection, SessionUser};
pub use verify::{
    AlwaysPass, ChallengeVerification, KNOWN_CHECKPOINTS, VerificationCheck, VerificationRegistry,
};

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// The persistence layer, serialized behind a mutex.
    pub persistence: Arc<Mutex<SqlitePersistence>>,
    /// Verification checkpoints consulted by the login flow.
    pub verification: Arc<Mutex<VerificationRegistry>>,
}

impl AppState {
    /// Creates application state around a persistence adapter.
    #[must_use]
    pub fn new(persistence: SqlitePersistence, verification: VerificationRegistry) -> Self {
        Self {
            persistence: Arc::new(Mutex::new(persistence)),
            verification: Arc::new(Mutex::new(verification)),
        }
    }
}

/// Builds the application router with all endpoints.
#[must_use]
pub fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route(
            "/login/",
            get(handlers::handle_login_page).post(handlers::handle_login_submit),
        )
        .route(
            "/learning/assignments/",
            get(handlers::handle_assignments_list),
        )
        .route(
            "/learning/assignments/{assignment_id}/",
            get(handlers::handle_assignment_detail),
        )
        .route(
            "/learning/assignments/{assignment_id}/comments/",
            post(handlers::handle_add_comment),
        )
        .with_state(app_state)
}
