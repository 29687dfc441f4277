// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use std::time::Duration;

use super::FakePage;
use crate::condition::Condition;
use crate::error::BrowserError;
use crate::page::Page;
use crate::wait::{await_condition_with_interval, force_visible};

const FAST_POLL: Duration = Duration::from_millis(1);

#[test]
fn test_selector_already_visible_returns_immediately() {
    let mut page = FakePage::at("http://127.0.0.1:8001/learning/assignments/");
    page.visible.insert("#assignment-list".to_string());

    let condition = Condition::Selector("#assignment-list".to_string());
    await_condition_with_interval(&mut page, &condition, Duration::from_secs(1), FAST_POLL)
        .unwrap();
    assert_eq!(page.polls, 1);
}

#[test]
fn test_selector_appearing_later_satisfies_wait() {
    let mut page = FakePage::at("http://127.0.0.1:8001/learning/assignments/");
    page.visible_after
        .push(("#assignment-list".to_string(), 3));

    let condition = Condition::Selector("#assignment-list".to_string());
    await_condition_with_interval(&mut page, &condition, Duration::from_secs(5), FAST_POLL)
        .unwrap();
    assert!(page.polls > 3);
}

#[test]
fn test_timeout_carries_condition_description() {
    let mut page = FakePage::at("http://127.0.0.1:8001/learning/assignments/");

    let condition = Condition::Selector("#never-appears".to_string());
    let err = await_condition_with_interval(
        &mut page,
        &condition,
        Duration::from_millis(20),
        FAST_POLL,
    )
    .unwrap_err();

    match err {
        BrowserError::Timeout {
            condition,
            waited_ms,
        } => {
            assert!(condition.contains("#never-appears"));
            assert!(waited_ms >= 20);
        }
        other => panic!("expected Timeout, got {other:?}"),
    }
}

#[test]
fn test_login_redirect_fails_fast_with_page_text() {
    let mut page = FakePage::at("http://127.0.0.1:8001/login/?next=/learning/assignments/");
    page.text = "Please sign in".to_string();

    let condition = Condition::Selector("#assignment-list".to_string());
    let err = await_condition_with_interval(
        &mut page,
        &condition,
        Duration::from_secs(60),
        FAST_POLL,
    )
    .unwrap_err();

    match err {
        BrowserError::LoginRedirect { url, page_text } => {
            assert!(url.contains("/login/"));
            assert_eq!(page_text, "Please sign in");
        }
        other => panic!("expected LoginRedirect, got {other:?}"),
    }
    // Fail-fast: the wait never entered its polling budget.
    assert_eq!(page.polls, 0);
}

#[test]
fn test_waiting_for_login_url_is_not_a_redirect_failure() {
    let mut page = FakePage::at("http://127.0.0.1:8001/login/");

    let condition = Condition::UrlGlob("**/login/".to_string());
    await_condition_with_interval(&mut page, &condition, Duration::from_secs(1), FAST_POLL)
        .unwrap();
}

#[test]
fn test_text_condition_matches_either_page_shape() {
    let condition = Condition::Text("Open assignments".to_string());

    let mut populated = FakePage::at("http://127.0.0.1:8001/learning/assignments/");
    populated.text = "Open assignments\nE2E Assignment".to_string();
    await_condition_with_interval(&mut populated, &condition, Duration::from_secs(1), FAST_POLL)
        .unwrap();

    let mut empty = FakePage::at("http://127.0.0.1:8001/learning/assignments/");
    empty.text = "Open assignments\nNo assignments yet.".to_string();
    await_condition_with_interval(&mut empty, &condition, Duration::from_secs(1), FAST_POLL)
        .unwrap();
}

#[test]
fn test_force_visible_unhides_element() {
    let mut page = FakePage::at("http://127.0.0.1:8001/learning/assignments/7/");
    assert!(!page.is_visible("#comment-form-wrapper").unwrap());

    force_visible(&mut page, "#comment-form-wrapper").unwrap();
    assert!(page.is_visible("#comment-form-wrapper").unwrap());
}
