// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! End-to-end harness for the Studium server surface.
//!
//! [`RouterPage`] implements the browser-automation trait directly over
//! the server's axum router, and [`dom`] answers the selector queries the
//! scenarios use. The scenario suite itself lives under `tests/`.

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

pub mod dom;
mod driver;

pub use driver::RouterPage;
