// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Readiness conditions: the deterministic DOM signals a scenario waits on.

use regex::Regex;

use crate::error::BrowserError;
use crate::page::Page;

/// A deterministic signal that a page has reached the awaited state.
///
/// Conditions are content-based, so both page shapes a view can render
/// (populated list vs. empty state) satisfy a wait as long as the caller
/// picks a signal present in both.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Condition {
    /// A CSS selector matches a visible element.
    Selector(String),
    /// The current URL matches a glob pattern (`*` within a path segment,
    /// `**` across segments).
    UrlGlob(String),
    /// The given text appears in the page.
    Text(String),
}

impl std::fmt::Display for Condition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Selector(selector) => write!(f, "selector '{selector}'"),
            Self::UrlGlob(pattern) => write!(f, "url matching '{pattern}'"),
            Self::Text(text) => write!(f, "text '{text}'"),
        }
    }
}

impl Condition {
    /// Evaluates the condition against the page's current state.
    ///
    /// # Errors
    ///
    /// Returns an error if the page cannot be queried or the glob pattern
    /// is invalid.
    pub fn eval<P: Page>(&self, page: &mut P) -> Result<bool, BrowserError> {
        match self {
            Self::Selector(selector) => page.is_visible(selector),
            Self::UrlGlob(pattern) => {
                let Some(url) = page.current_url() else {
                    return Ok(false);
                };
                url_glob_matches(pattern, url)
            }
            Self::Text(text) => Ok(page.page_text().contains(text)),
        }
    }
}

/// Checks a URL against a glob pattern.
///
/// `**` matches across path segments, `*` within a single segment. The
/// pattern matches anywhere in the URL unless anchored by the caller, which
/// mirrors how browser-automation wait APIs treat URL globs.
///
/// # Errors
///
/// Returns an error if the translated pattern fails to compile.
pub fn url_glob_matches(pattern: &str, url: &str) -> Result<bool, BrowserError> {
    let regex = Regex::new(&glob_to_regex(pattern)).map_err(|e| BrowserError::InvalidGlob {
        pattern: pattern.to_string(),
        message: e.to_string(),
    })?;

    Ok(regex.is_match(url))
}

/// Translates a URL glob into an anchored regular expression.
fn glob_to_regex(pattern: &str) -> String {
    let mut regex = String::with_capacity(pattern.len() * 2);
    regex.push('^');

    // Unanchored prefix: "**/x" style patterns match any URL ending.
    if !pattern.starts_with("**") && !pattern.contains("://") {
        regex.push_str(".*");
    }

    let mut chars = pattern.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '*' => {
                if chars.peek() == Some(&'*') {
                    chars.next();
                    regex.push_str(".*");
                } else {
                    regex.push_str("[^/]*");
                }
            }
            '?' => regex.push_str("[^/]"),
            _ => regex.push_str(&regex::escape(&c.to_string())),
        }
    }

    regex.push('$');
    regex
}
