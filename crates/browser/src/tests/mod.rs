// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::expect_used, clippy::unwrap_used)]

mod wait_tests;

use std::collections::HashSet;

use crate::cookie::CookieSpec;
use crate::error::BrowserError;
use crate::page::Page;

/// A scripted page for exercising the wait protocol without a driver.
pub struct FakePage {
    pub url: Option<String>,
    pub text: String,
    pub visible: HashSet<String>,
    pub cookies: Vec<CookieSpec>,
    /// Selectors that become visible after this many `is_visible` polls.
    pub visible_after: Vec<(String, u32)>,
    pub polls: u32,
}

impl FakePage {
    pub fn at(url: &str) -> Self {
        Self {
            url: Some(url.to_string()),
            text: String::new(),
            visible: HashSet::new(),
            cookies: Vec::new(),
            visible_after: Vec::new(),
            polls: 0,
        }
    }
}

impl Page for FakePage {
    fn navigate(&mut self, url: &str) -> Result<(), BrowserError> {
        self.url = Some(url.to_string());
        Ok(())
    }

    fn fill(&mut self, _selector: &str, _text: &str) -> Result<(), BrowserError> {
        Ok(())
    }

    fn click(&mut self, _selector: &str) -> Result<(), BrowserError> {
        Ok(())
    }

    fn select_option(&mut self, _selector: &str, _value: &str) -> Result<(), BrowserError> {
        Ok(())
    }

    fn evaluate(&mut self, script: &str) -> Result<(), BrowserError> {
        // Supports only the visibility-forcing script shape.
        if let Some(rest) = script.strip_prefix("document.querySelector('") {
            if let Some((selector, _)) = rest.split_once('\'') {
                self.visible.insert(selector.to_string());
                return Ok(());
            }
        }
        Err(BrowserError::Driver(format!("unsupported script: {script}")))
    }

    fn add_cookies(&mut self, cookies: &[CookieSpec]) -> Result<(), BrowserError> {
        self.cookies.extend_from_slice(cookies);
        Ok(())
    }

    fn current_url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    fn page_text(&self) -> String {
        self.text.clone()
    }

    fn has_selector(&mut self, selector: &str) -> Result<bool, BrowserError> {
        Ok(self.visible.contains(selector)
            || self.visible_after.iter().any(|(s, _)| s == selector))
    }

    fn is_visible(&mut self, selector: &str) -> Result<bool, BrowserError> {
        self.polls += 1;
        if self.visible.contains(selector) {
            return Ok(true);
        }
        if let Some((_, after)) = self
            .visible_after
            .iter()
            .find(|(s, _)| s == selector)
        {
            return Ok(self.polls > *after);
        }
        Ok(false)
    }
}
