// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Browser-automation surface for the Studium test harness.
//!
//! This crate defines the seam between test scenarios and whatever drives
//! the pages: the [`Page`] trait (navigate, fill, click, cookies), the
//! [`CookieSpec`] descriptor produced by session injection, and the
//! readiness-polling protocol ([`Condition`], [`await_condition`]) that
//! replaces fixed sleeps with bounded waits on deterministic DOM signals.
//!
//! Drivers implement [`Page`]; the harness ships an in-process HTTP driver,
//! and a real WebDriver client can implement the same trait.

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

mod condition;
mod cookie;
mod error;
mod page;
mod wait;

#[cfg(test)]
mod tests;

pub use condition::{Condition, url_glob_matches};
pub use cookie::{CookieScope, CookieSpec, SameSite};
pub use error::BrowserError;
pub use page::Page;
pub use wait::{
    DEFAULT_POLL_INTERVAL, DEFAULT_TIMEOUT, await_condition, await_condition_with_interval,
    force_visible,
};
