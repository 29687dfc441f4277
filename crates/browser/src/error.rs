// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error taxonomy for the browser surface.
//!
//! Timing failures (`Timeout`) are distinguishable from authentication
//! failures (`LoginRedirect`) and from driver faults, so a test that dies
//! on a timeout reads differently from one whose session injection failed.

use thiserror::Error;

/// Errors produced by page drivers and the readiness-polling protocol.
#[derive(Debug, Error)]
pub enum BrowserError {
    /// The awaited condition did not hold within the bounded wait.
    #[error("timed out after {waited_ms}ms waiting for {condition}")]
    Timeout {
        /// Human-readable description of the awaited condition.
        condition: String,
        /// Total time waited, in milliseconds.
        waited_ms: u64,
    },

    /// The page unexpectedly landed on the login screen.
    ///
    /// This is surfaced immediately instead of timing out: it almost always
    /// means session injection failed or the cookie scope did not match the
    /// live server. The page text is attached for diagnosis.
    #[error("unexpected redirect to login at {url}")]
    LoginRedirect {
        /// The URL the page ended up on.
        url: String,
        /// The rendered page text, dumped for diagnosis.
        page_text: String,
    },

    /// A selector matched no element on the current page.
    #[error("no element matches selector '{0}'")]
    ElementNotFound(String),

    /// Navigation failed or the driver has no page loaded.
    #[error("navigation failed: {0}")]
    Navigation(String),

    /// A cookie descriptor could not be applied to the driver's context.
    #[error("invalid cookie: {0}")]
    InvalidCookie(String),

    /// A URL glob pattern could not be compiled.
    #[error("invalid URL glob '{pattern}': {message}")]
    InvalidGlob {
        /// The offending pattern.
        pattern: String,
        /// The compile error.
        message: String,
    },

    /// A driver-specific failure.
    #[error("driver error: {0}")]
    Driver(String),
}
