// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The page-automation trait.

use crate::cookie::CookieSpec;
use crate::error::BrowserError;

/// A driveable page context.
///
/// This is the seam between scenarios and the automation backend. The
/// harness ships an in-process HTTP driver; a WebDriver-backed client can
/// implement the same trait without touching any scenario code.
///
/// The API is synchronous by design. Drivers that are internally async own
/// a private event loop; keeping the trait synchronous means fixture code
/// doing blocking database work can never end up executing inside the
/// driver's loop.
pub trait Page {
    /// Navigates to a URL, following redirects, and loads the final page.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or redirects loop.
    fn navigate(&mut self, url: &str) -> Result<(), BrowserError>;

    /// Fills a form control identified by a selector with text.
    ///
    /// # Errors
    ///
    /// Returns an error if no control matches the selector.
    fn fill(&mut self, selector: &str, text: &str) -> Result<(), BrowserError>;

    /// Clicks an element: a link navigates, a submit control submits its
    /// form.
    ///
    /// # Errors
    ///
    /// Returns an error if no element matches or the resulting request
    /// fails.
    fn click(&mut self, selector: &str) -> Result<(), BrowserError>;

    /// Selects an option in a `<select>` control by value.
    ///
    /// # Errors
    ///
    /// Returns an error if no select matches or the option is absent.
    fn select_option(&mut self, selector: &str, value: &str) -> Result<(), BrowserError>;

    /// Evaluates a script against the current page.
    ///
    /// Drivers may support only the subset of scripts the harness needs
    /// (visibility manipulation); unsupported scripts are a driver error.
    ///
    /// # Errors
    ///
    /// Returns an error if the script is unsupported or fails.
    fn evaluate(&mut self, script: &str) -> Result<(), BrowserError>;

    /// Adds cookies to the context, to be sent on matching requests.
    ///
    /// # Errors
    ///
    /// Returns an error if a cookie descriptor cannot be applied.
    fn add_cookies(&mut self, cookies: &[CookieSpec]) -> Result<(), BrowserError>;

    /// The URL of the currently loaded page, if any.
    fn current_url(&self) -> Option<&str>;

    /// The visible text of the currently loaded page (markup stripped).
    fn page_text(&self) -> String;

    /// Whether any element matches the selector on the current page.
    ///
    /// # Errors
    ///
    /// Returns an error if no page is loaded or the selector is
    /// unsupported by the driver.
    fn has_selector(&mut self, selector: &str) -> Result<bool, BrowserError>;

    /// Whether an element matching the selector is visible (attached and
    /// not hidden).
    ///
    /// # Errors
    ///
    /// Returns an error if no page is loaded or the selector is
    /// unsupported by the driver.
    fn is_visible(&mut self, selector: &str) -> Result<bool, BrowserError>;
}
