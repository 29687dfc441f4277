// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Tiny DOM queries over rendered markup.
//!
//! The in-process driver does not embed a browser engine; it answers the
//! selector shapes the scenarios actually use (`#id`, `[name=..]` with an
//! optional tag prefix, and `text=..`) with regular expressions over the
//! server's rendered HTML. Unsupported selectors are a driver error, not
//! a silent miss.

use regex::Regex;
use studium_browser::BrowserError;

/// A parsed selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    /// `#some-id`
    Id(String),
    /// `[name=..]`, `input[name=..]`, `select[name=..]`, `textarea[name=..]`
    Name {
        /// Optional tag prefix.
        tag: Option<String>,
        /// The `name` attribute value.
        name: String,
    },
    /// `text=visible text`
    Text(String),
}

impl Selector {
    /// Parses a selector string into the supported subset.
    ///
    /// # Errors
    ///
    /// Returns a driver error for selector shapes the driver does not
    /// implement.
    pub fn parse(selector: &str) -> Result<Self, BrowserError> {
        if let Some(id) = selector.strip_prefix('#') {
            return Ok(Self::Id(id.to_string()));
        }
        if let Some(text) = selector.strip_prefix("text=") {
            return Ok(Self::Text(text.to_string()));
        }
        if let Some(open) = selector.find("[name=") {
            let tag = (open > 0).then(|| selector[..open].to_string());
            let rest = &selector[open + "[name=".len()..];
            let name = rest
                .strip_suffix(']')
                .ok_or_else(|| unsupported(selector))?
                .trim_matches(['"', '\''])
                .to_string();
            return Ok(Self::Name { tag, name });
        }
        Err(unsupported(selector))
    }
}

fn unsupported(selector: &str) -> BrowserError {
    BrowserError::Driver(format!("unsupported selector: '{selector}'"))
}

/// A form control that submits its form.
#[derive(Debug, Clone, Default)]
pub struct SubmitControl {
    pub id: Option<String>,
    pub name: Option<String>,
    pub value: Option<String>,
}

/// One parsed `<form>` block.
#[derive(Debug, Clone)]
pub struct Form {
    pub method: String,
    pub action: Option<String>,
    /// Default values of non-submit controls, in document order.
    pub defaults: Vec<(String, String)>,
    pub submits: Vec<SubmitControl>,
}

impl Form {
    /// The form's submit control matching the selector, if any.
    #[must_use]
    pub fn submit_matching(&self, selector: &Selector) -> Option<&SubmitControl> {
        self.submits.iter().find(|submit| match selector {
            Selector::Id(id) => submit.id.as_deref() == Some(id),
            Selector::Name { name, .. } => submit.name.as_deref() == Some(name),
            Selector::Text(_) => false,
        })
    }

    /// Whether any of the form's submit controls matches the selector.
    #[must_use]
    pub fn has_submit(&self, selector: &Selector) -> bool {
        self.submit_matching(selector).is_some()
    }
}

/// Extracts an attribute value from an opening tag's attribute list.
fn attr(attrs: &str, name: &str) -> Option<String> {
    let pattern = format!(r#"\b{name}\s*=\s*"([^"]*)""#);
    let regex = Regex::new(&pattern).ok()?;
    regex
        .captures(attrs)
        .map(|captures| captures[1].to_string())
}

/// Whether an attribute list carries a bare boolean attribute.
fn has_bare_attr(attrs: &str, name: &str) -> bool {
    Regex::new(&format!(r"\b{name}(?:[\s>/]|$)"))
        .map(|regex| regex.is_match(attrs))
        .unwrap_or(false)
}

/// Finds the opening tag matching the selector, with its byte offset.
fn opening_tag<'a>(html: &'a str, selector: &Selector) -> Option<(usize, &'a str)> {
    let pattern = match selector {
        Selector::Id(id) => {
            format!(r#"<[a-zA-Z][a-zA-Z0-9]*\b[^>]*\bid="{}"[^>]*>"#, regex::escape(id))
        }
        Selector::Name { tag, name } => {
            let tag_pattern = tag
                .as_deref()
                .map_or_else(|| "[a-zA-Z][a-zA-Z0-9]*".to_string(), regex::escape);
            format!(
                r#"<{tag_pattern}\b[^>]*\bname="{}"[^>]*>"#,
                regex::escape(name)
            )
        }
        Selector::Text(_) => return None,
    };

    let regex = Regex::new(&pattern).ok()?;
    let found = regex.find(html)?;
    Some((found.start(), found.as_str()))
}

/// The opening tag matching the selector, as an owned string.
#[must_use]
pub fn opening_tag_str(html: &str, selector: &Selector) -> Option<String> {
    opening_tag(html, selector).map(|(_, tag)| tag.to_string())
}

/// Whether any element matches the selector.
#[must_use]
pub fn exists(html: &str, selector: &Selector) -> bool {
    match selector {
        Selector::Text(text) => strip_tags(html).contains(text),
        _ => opening_tag(html, selector).is_some(),
    }
}

/// Whether the matched element is visible.
///
/// An element is hidden when its own tag carries `hidden` or it sits
/// inside a container whose tag carries `hidden`.
#[must_use]
pub fn is_visible(html: &str, selector: &Selector) -> bool {
    match selector {
        Selector::Text(text) => visible_text(html).contains(text),
        _ => opening_tag(html, selector).is_some_and(|(offset, tag)| {
            !has_bare_attr(tag, "hidden")
                && !hidden_ranges(html)
                    .iter()
                    .any(|&(start, end)| offset > start && offset < end)
        }),
    }
}

/// Byte ranges covered by elements whose opening tag carries `hidden`.
fn hidden_ranges(html: &str) -> Vec<(usize, usize)> {
    let Ok(open_regex) = Regex::new(r"<([a-zA-Z][a-zA-Z0-9]*)\b[^>]*>") else {
        return Vec::new();
    };

    let mut ranges = Vec::new();
    for tag_match in open_regex.captures_iter(html) {
        let Some(whole) = tag_match.get(0) else {
            continue;
        };
        if !has_bare_attr(whole.as_str(), "hidden") {
            continue;
        }
        let tag_name = &tag_match[1];
        if let Some(end) = element_end(html, whole.end(), tag_name) {
            ranges.push((whole.start(), end));
        }
    }
    ranges
}

/// Finds the end of an element by balancing same-named tags.
fn element_end(html: &str, after_open: usize, tag_name: &str) -> Option<usize> {
    let open = format!("<{tag_name}");
    let close = format!("</{tag_name}>");
    let mut depth = 1usize;
    let mut cursor = after_open;

    while depth > 0 {
        let rest = &html[cursor..];
        let next_open = rest.find(&open);
        let next_close = rest.find(&close)?;

        if next_open.is_some_and(|o| o < next_close) {
            // The find is on the tag-name prefix; only count real opens.
            let open_at = cursor + next_open?;
            let following = html[open_at + open.len()..].chars().next();
            cursor = open_at + open.len();
            if following.is_some_and(|c| c.is_whitespace() || c == '>') {
                depth += 1;
            }
        } else {
            depth -= 1;
            cursor += next_close + close.len();
        }
    }
    Some(cursor)
}

/// Resolves the href of the link matching the selector.
#[must_use]
pub fn link_target(html: &str, selector: &Selector) -> Option<String> {
    let regex = Regex::new(r#"(?s)<a\b([^>]*)>(.*?)</a>"#).ok()?;

    for captures in regex.captures_iter(html) {
        let attrs = &captures[1];
        let inner = strip_tags(&captures[2]);
        let matched = match selector {
            Selector::Id(id) => attr(attrs, "id").as_deref() == Some(id),
            Selector::Text(text) => inner.contains(text),
            Selector::Name { .. } => false,
        };
        if matched {
            return attr(attrs, "href");
        }
    }
    None
}

/// Resolves the `name` attribute of the control a selector points at.
#[must_use]
pub fn control_name(html: &str, selector: &Selector) -> Option<String> {
    match selector {
        Selector::Name { name, .. } => Some(name.clone()),
        Selector::Id(_) => {
            let (_, tag) = opening_tag(html, selector)?;
            let attrs = tag.trim_start_matches('<').trim_end_matches('>');
            attr(attrs, "name")
        }
        Selector::Text(_) => None,
    }
}

/// Parses every `<form>` block on the page.
#[must_use]
pub fn parse_forms(html: &str) -> Vec<Form> {
    let Ok(form_regex) = Regex::new(r"(?s)<form\b([^>]*)>(.*?)</form>") else {
        return Vec::new();
    };

    form_regex
        .captures_iter(html)
        .map(|captures| parse_form(&captures[1], &captures[2]))
        .collect()
}

fn parse_form(attrs: &str, inner: &str) -> Form {
    let method = attr(attrs, "method").unwrap_or_else(|| "get".to_string());
    let action = attr(attrs, "action");
    let mut defaults = Vec::new();
    let mut submits = Vec::new();

    if let Ok(input_regex) = Regex::new(r"<input\b([^>]*)>") {
        for captures in input_regex.captures_iter(inner) {
            let input_attrs = &captures[1];
            let kind = attr(input_attrs, "type").unwrap_or_else(|| "text".to_string());
            if kind == "submit" {
                submits.push(SubmitControl {
                    id: attr(input_attrs, "id"),
                    name: attr(input_attrs, "name"),
                    value: attr(input_attrs, "value"),
                });
            } else if let Some(name) = attr(input_attrs, "name") {
                defaults.push((name, attr(input_attrs, "value").unwrap_or_default()));
            }
        }
    }

    if let Ok(button_regex) = Regex::new(r"(?s)<button\b([^>]*)>") {
        for captures in button_regex.captures_iter(inner) {
            let button_attrs = &captures[1];
            let kind = attr(button_attrs, "type").unwrap_or_else(|| "submit".to_string());
            if kind == "submit" {
                submits.push(SubmitControl {
                    id: attr(button_attrs, "id"),
                    name: attr(button_attrs, "name"),
                    value: attr(button_attrs, "value"),
                });
            }
        }
    }

    if let Ok(select_regex) = Regex::new(r"(?s)<select\b([^>]*)>(.*?)</select>") {
        for captures in select_regex.captures_iter(inner) {
            let Some(name) = attr(&captures[1], "name") else {
                continue;
            };
            defaults.push((name, select_default(&captures[2])));
        }
    }

    if let Ok(textarea_regex) = Regex::new(r"(?s)<textarea\b([^>]*)>(.*?)</textarea>") {
        for captures in textarea_regex.captures_iter(inner) {
            if let Some(name) = attr(&captures[1], "name") {
                defaults.push((name, strip_tags(&captures[2]).trim().to_string()));
            }
        }
    }

    Form {
        method: method.to_lowercase(),
        action,
        defaults,
        submits,
    }
}

/// The option values of the named `<select>`, if one exists on the page.
#[must_use]
pub fn select_values(html: &str, name: &str) -> Option<Vec<String>> {
    let select_regex = Regex::new(r"(?s)<select\b([^>]*)>(.*?)</select>").ok()?;
    let option_regex = Regex::new(r"<option\b([^>]*)>").ok()?;

    for captures in select_regex.captures_iter(html) {
        if attr(&captures[1], "name").as_deref() == Some(name) {
            return Some(
                option_regex
                    .captures_iter(&captures[2])
                    .map(|option| attr(&option[1], "value").unwrap_or_default())
                    .collect(),
            );
        }
    }
    None
}

/// The default value of a `<select>`: the selected option, else the first.
fn select_default(inner: &str) -> String {
    let Ok(option_regex) = Regex::new(r#"<option\b([^>]*)>"#) else {
        return String::new();
    };

    let mut first = None;
    for captures in option_regex.captures_iter(inner) {
        let value = attr(&captures[1], "value").unwrap_or_default();
        if has_bare_attr(&captures[1], "selected") {
            return value;
        }
        if first.is_none() {
            first = Some(value);
        }
    }
    first.unwrap_or_default()
}

/// The page's text with markup stripped and entities decoded.
#[must_use]
pub fn strip_tags(html: &str) -> String {
    let Ok(tag_regex) = Regex::new(r"<[^>]*>") else {
        return html.to_string();
    };
    let text = tag_regex.replace_all(html, " ");
    decode_entities(&collapse_whitespace(&text))
}

/// Like [`strip_tags`], but hidden elements contribute no text.
#[must_use]
pub fn visible_text(html: &str) -> String {
    let mut pruned = String::with_capacity(html.len());
    let ranges = hidden_ranges(html);
    let mut cursor = 0;
    for &(start, end) in &ranges {
        if start >= cursor {
            pruned.push_str(&html[cursor..start]);
            cursor = end.max(cursor);
        }
    }
    pruned.push_str(&html[cursor..]);
    strip_tags(&pruned)
}

fn collapse_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut last_was_space = true;
    for c in text.chars() {
        if c.is_whitespace() {
            if !last_was_space {
                out.push(' ');
            }
            last_was_space = true;
        } else {
            out.push(c);
            last_was_space = false;
        }
    }
    out.trim_end().to_string()
}

fn decode_entities(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    const PAGE: &str = r#"<html><body>
        <h1>Open assignments</h1>
        <form id="course-filter" method="get" action="/learning/assignments/">
        <select name="course">
        <option value="">All courses</option>
        <option value="3" selected>Rust 101</option>
        </select>
        <input type="submit" name="apply" value="1">
        </form>
        <ul id="assignment-list">
        <li><a href="/learning/assignments/7/">E2E Assignment</a></li>
        </ul>
        <div id="comment-form-wrapper" hidden>
        <form method="post" action="/learning/assignments/7/comments/">
        <textarea name="body"></textarea>
        <button id="submit-id-comment-save" type="submit">Save</button>
        </form>
        </div>
        </body></html>"#;

    #[test]
    fn test_selector_parsing() {
        assert_eq!(
            Selector::parse("#add-comment").unwrap(),
            Selector::Id("add-comment".to_string())
        );
        assert_eq!(
            Selector::parse("input[name=username]").unwrap(),
            Selector::Name {
                tag: Some("input".to_string()),
                name: "username".to_string()
            }
        );
        assert_eq!(
            Selector::parse("[name=apply]").unwrap(),
            Selector::Name {
                tag: None,
                name: "apply".to_string()
            }
        );
        assert!(Selector::parse("div > p:nth-child(2)").is_err());
    }

    #[test]
    fn test_exists_and_visibility() {
        let list = Selector::parse("#assignment-list").unwrap();
        assert!(exists(PAGE, &list));
        assert!(is_visible(PAGE, &list));

        let wrapper = Selector::parse("#comment-form-wrapper").unwrap();
        assert!(exists(PAGE, &wrapper));
        assert!(!is_visible(PAGE, &wrapper));

        // Inside the hidden wrapper.
        let save = Selector::parse("#submit-id-comment-save").unwrap();
        assert!(exists(PAGE, &save));
        assert!(!is_visible(PAGE, &save));
    }

    #[test]
    fn test_link_target_by_text() {
        let selector = Selector::parse("text=E2E Assignment").unwrap();
        assert_eq!(
            link_target(PAGE, &selector).unwrap(),
            "/learning/assignments/7/"
        );
    }

    #[test]
    fn test_form_parsing_with_select_default() {
        let forms = parse_forms(PAGE);
        assert_eq!(forms.len(), 2);

        let filter = &forms[0];
        assert_eq!(filter.method, "get");
        assert_eq!(filter.action.as_deref(), Some("/learning/assignments/"));
        assert_eq!(
            filter.defaults,
            vec![("course".to_string(), "3".to_string())]
        );
        assert!(filter.has_submit(&Selector::parse("[name=apply]").unwrap()));

        let comment = &forms[1];
        assert_eq!(comment.method, "post");
        assert!(comment.has_submit(&Selector::parse("#submit-id-comment-save").unwrap()));
        assert_eq!(
            comment.defaults,
            vec![("body".to_string(), String::new())]
        );
    }

    #[test]
    fn test_select_values_lists_options() {
        assert_eq!(
            select_values(PAGE, "course").unwrap(),
            vec![String::new(), "3".to_string()]
        );
        assert!(select_values(PAGE, "missing").is_none());
    }

    #[test]
    fn test_strip_tags_decodes_entities() {
        assert_eq!(strip_tags("<p>a &amp; b</p>"), "a & b");
    }

    #[test]
    fn test_visible_text_omits_hidden_blocks() {
        let text = visible_text(PAGE);
        assert!(text.contains("Open assignments"));
        assert!(!text.contains("Save"));
    }
}
