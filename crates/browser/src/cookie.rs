// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Cookie descriptors for session injection.
//!
//! A cookie is scoped either by a full URL (host, port, and path together)
//! or by an explicit domain+path pair. Mixing the two is how injected
//! sessions silently fail to match a dynamically-allocated test-server
//! port, so the scope is an enum: the invalid combination cannot be built.

use serde::{Deserialize, Serialize};

/// `SameSite` attribute values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SameSite {
    /// Strict same-site enforcement.
    Strict,
    /// Lax same-site enforcement (the browser default).
    Lax,
    /// No same-site enforcement; requires `secure`.
    None,
}

/// Where a cookie applies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CookieScope {
    /// Scope derived from a full URL: scheme, host, port, and path.
    ///
    /// This is the right choice against a live test server, whose port is
    /// allocated dynamically.
    Url(String),
    /// Explicit domain and path.
    DomainPath {
        /// The cookie domain.
        domain: String,
        /// The cookie path.
        path: String,
    },
}

/// A cookie descriptor a page driver attaches to its context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CookieSpec {
    /// Cookie name.
    pub name: String,
    /// Cookie value.
    pub value: String,
    /// Where the cookie applies.
    pub scope: CookieScope,
    /// Whether the cookie is HTTP-only.
    pub http_only: bool,
    /// Whether the cookie requires a secure context.
    pub secure: bool,
    /// `SameSite` attribute, when set.
    pub same_site: Option<SameSite>,
    /// Expiry as a Unix timestamp in seconds, when set.
    pub expires: Option<i64>,
}

impl CookieSpec {
    /// Creates a session-style cookie scoped to a full URL.
    #[must_use]
    pub fn for_url(name: &str, value: &str, url: &str) -> Self {
        Self {
            name: name.to_string(),
            value: value.to_string(),
            scope: CookieScope::Url(url.to_string()),
            http_only: true,
            secure: false,
            same_site: Some(SameSite::Lax),
            expires: None,
        }
    }

    /// Checks whether this cookie applies to a request URL.
    ///
    /// URL-scoped cookies match on host+port equality and path prefix;
    /// domain+path cookies match on host equality (any port) and path
    /// prefix.
    #[must_use]
    pub fn matches_url(&self, request_url: &str) -> bool {
        let (request_authority, request_path) = split_authority_path(request_url);
        let request_host = request_authority.split(':').next().unwrap_or("");

        match &self.scope {
            CookieScope::Url(scope_url) => {
                let (scope_authority, scope_path) = split_authority_path(scope_url);
                scope_authority == request_authority && path_matches(scope_path, request_path)
            }
            CookieScope::DomainPath { domain, path } => {
                request_host == domain && path_matches(path, request_path)
            }
        }
    }
}

/// Splits `scheme://authority/path` into (authority, path).
fn split_authority_path(url: &str) -> (&str, &str) {
    let rest = url
        .split_once("://")
        .map_or(url, |(_, remainder)| remainder);

    match rest.find('/') {
        Some(idx) => (&rest[..idx], &rest[idx..]),
        None => (rest, "/"),
    }
}

/// Cookie path matching: the scope path is a prefix on a segment boundary.
fn path_matches(scope_path: &str, request_path: &str) -> bool {
    let scope_path = if scope_path.is_empty() { "/" } else { scope_path };

    request_path == scope_path
        || scope_path == "/"
        || (request_path.starts_with(scope_path)
            && (scope_path.ends_with('/')
                || request_path[scope_path.len()..].starts_with('/')))
}
