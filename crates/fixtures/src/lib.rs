// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Fixture layer for the Studium test harness.
//!
//! Three protocols live here:
//!
//! - **Factories** ([`factories`]): builder-style object mothers with
//!   defaults and per-field overrides, backed by an atomic sequence so
//!   generated names never collide within a process.
//! - **Idempotent seeding** ([`seed`]): `ensure_student` converges on one
//!   user row per logical username no matter how many times it runs, and
//!   `repopulate_baseline` restores the fixed sites and lookup tables a
//!   scenario assumes exist.
//! - **Session injection** ([`session`]): `force_login` writes a session
//!   row directly and `inject_session` turns it into a cookie descriptor,
//!   skipping the login form and any verification challenge entirely.

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

mod error;
pub mod factories;
pub mod seed;
pub mod session;

#[cfg(test)]
mod tests;

pub use error::FixtureError;
pub use seed::{
    ANOTHER_DOMAIN, ANOTHER_DOMAIN_ID, TEST_DOMAIN, TEST_DOMAIN_ID, TEST_PASSWORD,
    ensure_student, repopulate_baseline,
};
pub use session::{
    SESSION_COOKIE_NAME, SESSION_LIFETIME, force_login, inject_session, session_auth_hash,
};
