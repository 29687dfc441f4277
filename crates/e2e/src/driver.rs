// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! In-process page driver.
//!
//! [`RouterPage`] drives an axum `Router` directly through
//! `tower::ServiceExt::oneshot`, no sockets involved. The driver owns a
//! private current-thread runtime and blocks on each request, so the
//! [`Page`] trait stays synchronous and fixture code doing blocking
//! database work never executes inside the driver's event loop.
//!
//! The router must be backed by its own database connection (a sibling of
//! the fixture connection): only committed writes are visible across
//! connections, which is exactly the visibility a live server would have.

use axum::{
    Router,
    body::Body,
    http::{Request, header},
};
use studium_browser::{BrowserError, CookieSpec, Page};
use tower::ServiceExt;
use tracing::debug;

use crate::dom::{self, Form, Selector, SubmitControl};

/// Redirect-following bound.
const MAX_REDIRECTS: usize = 5;

/// A page context over an in-process router.
pub struct RouterPage {
    runtime: tokio::runtime::Runtime,
    router: Router,
    base_url: String,
    cookies: Vec<CookieSpec>,
    current_url: Option<String>,
    body: String,
    filled: Vec<(String, String)>,
}

impl RouterPage {
    /// Creates a driver over the router, with URLs resolved against
    /// `base_url` (scheme, host, and port; no trailing slash).
    ///
    /// # Errors
    ///
    /// Returns an error if the private runtime cannot be built.
    pub fn new(router: Router, base_url: &str) -> Result<Self, BrowserError> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| BrowserError::Driver(format!("runtime: {e}")))?;

        Ok(Self {
            runtime,
            router,
            base_url: base_url.trim_end_matches('/').to_string(),
            cookies: Vec::new(),
            current_url: None,
            body: String::new(),
            filled: Vec::new(),
        })
    }

    fn absolute(&self, url: &str) -> String {
        if url.starts_with("http://") || url.starts_with("https://") {
            url.to_string()
        } else {
            format!("{}{url}", self.base_url)
        }
    }

    fn cookie_header(&self, url: &str) -> Option<String> {
        let pairs: Vec<String> = self
            .cookies
            .iter()
            .filter(|cookie| cookie.matches_url(url))
            .map(|cookie| format!("{}={}", cookie.name, cookie.value))
            .collect();
        (!pairs.is_empty()).then(|| pairs.join("; "))
    }

    fn store_cookie(&mut self, name: &str, value: &str) {
        self.cookies.retain(|cookie| cookie.name != name);
        self.cookies
            .push(CookieSpec::for_url(name, value, &self.base_url));
    }

    /// Issues a request and follows redirects to the final page.
    fn request(
        &mut self,
        method: &str,
        url: &str,
        form_body: Option<String>,
    ) -> Result<(), BrowserError> {
        let mut method = method.to_string();
        let mut url = self.absolute(url);
        let mut form_body = form_body;

        for _ in 0..=MAX_REDIRECTS {
            debug!(%method, %url, "Driving request");

            let mut builder = Request::builder()
                .method(method.as_str())
                .uri(path_and_query(&url).to_string());
            if let Some(cookie) = self.cookie_header(&url) {
                builder = builder.header(header::COOKIE, cookie);
            }
            let request = if let Some(body) = form_body.take() {
                builder
                    .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                    .body(Body::from(body))
            } else {
                builder.body(Body::empty())
            }
            .map_err(|e| BrowserError::Navigation(e.to_string()))?;

            let response = self
                .runtime
                .block_on(self.router.clone().oneshot(request))
                .map_err(|e| BrowserError::Navigation(e.to_string()))?;

            for set_cookie in response.headers().get_all(header::SET_COOKIE) {
                if let Ok(raw) = set_cookie.to_str() {
                    if let Some((name, value)) = raw
                        .split(';')
                        .next()
                        .and_then(|pair| pair.trim().split_once('='))
                    {
                        let (name, value) = (name.to_string(), value.to_string());
                        self.store_cookie(&name, &value);
                    }
                }
            }

            if response.status().is_redirection() {
                let location = response
                    .headers()
                    .get(header::LOCATION)
                    .and_then(|value| value.to_str().ok())
                    .ok_or_else(|| {
                        BrowserError::Navigation("redirect without Location".to_string())
                    })?;
                url = self.absolute(location);
                method = "GET".to_string();
                continue;
            }

            let bytes = self
                .runtime
                .block_on(axum::body::to_bytes(response.into_body(), usize::MAX))
                .map_err(|e| BrowserError::Navigation(e.to_string()))?;
            self.body = String::from_utf8_lossy(&bytes).into_owned();
            self.current_url = Some(url);
            self.filled.clear();
            return Ok(());
        }

        Err(BrowserError::Navigation(format!(
            "more than {MAX_REDIRECTS} redirects from {url}"
        )))
    }

    fn record_fill(&mut self, name: String, value: String) {
        self.filled.retain(|(existing, _)| existing != &name);
        self.filled.push((name, value));
    }

    fn submit_form(&mut self, form: &Form, submit: &SubmitControl) -> Result<(), BrowserError> {
        let mut pairs: Vec<(String, String)> = form.defaults.clone();
        for (name, value) in &self.filled {
            if let Some(slot) = pairs.iter_mut().find(|(n, _)| n == name) {
                slot.1.clone_from(value);
            } else {
                pairs.push((name.clone(), value.clone()));
            }
        }
        if let (Some(name), Some(value)) = (&submit.name, &submit.value) {
            pairs.push((name.clone(), value.clone()));
        }

        let encoded = urlencode_pairs(&pairs);
        let action = form.action.clone().or_else(|| {
            self.current_url
                .as_deref()
                .map(|url| path_and_query(url).to_string())
        });
        let action =
            action.ok_or_else(|| BrowserError::Navigation("no form action".to_string()))?;

        if form.method == "post" {
            self.request("POST", &action, Some(encoded))
        } else {
            let target = format!("{}?{encoded}", action.split('?').next().unwrap_or(&action));
            self.request("GET", &target, None)
        }
    }
}

impl Page for RouterPage {
    fn navigate(&mut self, url: &str) -> Result<(), BrowserError> {
        self.request("GET", url, None)
    }

    fn fill(&mut self, selector: &str, text: &str) -> Result<(), BrowserError> {
        let parsed = Selector::parse(selector)?;
        let name = dom::control_name(&self.body, &parsed)
            .ok_or_else(|| BrowserError::ElementNotFound(selector.to_string()))?;
        self.record_fill(name, text.to_string());
        Ok(())
    }

    fn click(&mut self, selector: &str) -> Result<(), BrowserError> {
        let parsed = Selector::parse(selector)?;

        if let Some(href) = dom::link_target(&self.body, &parsed) {
            return self.navigate(&href);
        }

        let forms = dom::parse_forms(&self.body);
        if let Some(form) = forms.iter().find(|form| form.has_submit(&parsed)) {
            let submit = form.submit_matching(&parsed).cloned().unwrap_or_default();
            let form = form.clone();
            return self.submit_form(&form, &submit);
        }

        // A plain button (no submit semantics) is clickable but inert for
        // this driver; its client-side behavior is reproduced through
        // `force_visible`.
        if dom::exists(&self.body, &parsed) {
            return Ok(());
        }

        Err(BrowserError::ElementNotFound(selector.to_string()))
    }

    fn select_option(&mut self, selector: &str, value: &str) -> Result<(), BrowserError> {
        let parsed = Selector::parse(selector)?;
        let name = dom::control_name(&self.body, &parsed)
            .ok_or_else(|| BrowserError::ElementNotFound(selector.to_string()))?;
        let values = dom::select_values(&self.body, &name)
            .ok_or_else(|| BrowserError::ElementNotFound(selector.to_string()))?;
        if !values.iter().any(|v| v == value) {
            return Err(BrowserError::ElementNotFound(format!(
                "option '{value}' in {selector}"
            )));
        }
        self.record_fill(name, value.to_string());
        Ok(())
    }

    fn evaluate(&mut self, script: &str) -> Result<(), BrowserError> {
        // Supports exactly the visibility-forcing script shape.
        let Some(selector) = script
            .strip_prefix("document.querySelector('")
            .and_then(|rest| rest.strip_suffix("').removeAttribute('hidden')"))
        else {
            return Err(BrowserError::Driver(format!(
                "unsupported script: {script}"
            )));
        };

        let parsed = Selector::parse(selector)?;
        let Some(tag) = dom::opening_tag_str(&self.body, &parsed) else {
            return Err(BrowserError::ElementNotFound(selector.to_string()));
        };
        let unhidden = tag.replace(" hidden", "");
        self.body = self.body.replacen(tag.as_str(), &unhidden, 1);
        Ok(())
    }

    fn add_cookies(&mut self, cookies: &[CookieSpec]) -> Result<(), BrowserError> {
        for cookie in cookies {
            self.cookies.retain(|existing| existing.name != cookie.name);
            self.cookies.push(cookie.clone());
        }
        Ok(())
    }

    fn current_url(&self) -> Option<&str> {
        self.current_url.as_deref()
    }

    fn page_text(&self) -> String {
        dom::visible_text(&self.body)
    }

    fn has_selector(&mut self, selector: &str) -> Result<bool, BrowserError> {
        let parsed = Selector::parse(selector)?;
        Ok(dom::exists(&self.body, &parsed))
    }

    fn is_visible(&mut self, selector: &str) -> Result<bool, BrowserError> {
        let parsed = Selector::parse(selector)?;
        Ok(dom::is_visible(&self.body, &parsed))
    }
}

/// The path-and-query part of a URL.
fn path_and_query(url: &str) -> &str {
    let rest = url.split_once("://").map_or(url, |(_, rest)| rest);
    rest.find('/').map_or("/", |idx| &rest[idx..])
}

/// Encodes form pairs as `application/x-www-form-urlencoded`.
fn urlencode_pairs(pairs: &[(String, String)]) -> String {
    pairs
        .iter()
        .map(|(name, value)| format!("{}={}", urlencode(name), urlencode(value)))
        .collect::<Vec<_>>()
        .join("&")
}

fn urlencode(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for byte in text.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char);
            }
            b' ' => out.push('+'),
            _ => out.push_str(&format!("%{byte:02X}")),
        }
    }
    out
}
