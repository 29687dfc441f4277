// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Bounded waiting for readiness conditions.
//!
//! Replaces fixed sleeps: the wait returns as soon as the condition holds,
//! fails fast when the page lands on the login screen, and raises a
//! distinguishable timeout error at the bound.

use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::condition::Condition;
use crate::error::BrowserError;
use crate::page::Page;

/// Default upper bound for a wait.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Default polling interval.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Waits until the condition holds, using the default polling interval.
///
/// # Errors
///
/// - [`BrowserError::LoginRedirect`] immediately when the page lands on
///   the login screen (session injection failed; the page text is
///   attached rather than letting the wait time out opaquely)
/// - [`BrowserError::Timeout`] when the bound elapses
/// - Any driver error from evaluating the condition
pub fn await_condition<P: Page>(
    page: &mut P,
    condition: &Condition,
    timeout: Duration,
) -> Result<(), BrowserError> {
    await_condition_with_interval(page, condition, timeout, DEFAULT_POLL_INTERVAL)
}

/// Waits until the condition holds, polling at the given interval.
///
/// # Errors
///
/// See [`await_condition`].
pub fn await_condition_with_interval<P: Page>(
    page: &mut P,
    condition: &Condition,
    timeout: Duration,
    interval: Duration,
) -> Result<(), BrowserError> {
    let started = Instant::now();

    debug!(%condition, ?timeout, "Awaiting condition");

    loop {
        // Landing on the login screen is terminal even when the awaited
        // condition is itself a login URL check would never hold.
        if let Some(url) = page.current_url() {
            if is_login_url(url) && !condition_expects_login(condition) {
                warn!(url, "Unexpected redirect to login during wait");
                return Err(BrowserError::LoginRedirect {
                    url: url.to_string(),
                    page_text: page.page_text(),
                });
            }
        }

        if condition.eval(page)? {
            debug!(%condition, elapsed_ms = ?started.elapsed().as_millis(), "Condition satisfied");
            return Ok(());
        }

        if started.elapsed() >= timeout {
            return Err(BrowserError::Timeout {
                condition: condition.to_string(),
                waited_ms: u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
            });
        }

        std::thread::sleep(interval);
    }
}

/// Directly unhides an element that client-side script would reveal.
///
/// Test environments with a stubbed bundler never execute the toggle
/// script, so the scenario manipulates the visibility state itself before
/// waiting on the element.
///
/// # Errors
///
/// Returns an error if the element is absent or the driver rejects the
/// script.
pub fn force_visible<P: Page>(page: &mut P, selector: &str) -> Result<(), BrowserError> {
    debug!(selector, "Forcing element visible");
    page.evaluate(&format!(
        "document.querySelector('{selector}').removeAttribute('hidden')"
    ))
}

/// Whether a URL points at the login screen.
fn is_login_url(url: &str) -> bool {
    let path = url
        .split_once("://")
        .map_or(url, |(_, rest)| rest)
        .split_once('/')
        .map_or("/", |(_, path)| path);

    path.trim_end_matches('/').trim_start_matches('/') == "login"
        || path.starts_with("login/?")
        || path.starts_with("login?")
}

/// Whether the caller is deliberately waiting for the login screen.
fn condition_expects_login(condition: &Condition) -> bool {
    match condition {
        Condition::UrlGlob(pattern) => pattern.contains("login"),
        Condition::Selector(_) | Condition::Text(_) => false,
    }
}
