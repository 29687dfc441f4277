// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Tests for the assignments pages and session enforcement.

use axum::http::{StatusCode, header};
use studium_fixtures::factories::{AssignmentFactory, CourseFactory};
use tower::ServiceExt;

use crate::tests::{
    body_text, bypassed_state, form_request, get_request, seed_student, session_cookie_for,
};
use crate::{AppState, build_router};

/// Enrolls the user in a fresh course carrying one assignment.
async fn enroll_with_assignment(
    state: &AppState,
    user_id: i64,
    course_name: &str,
    title: &str,
) -> (i64, i64) {
    let mut persistence = state.persistence.lock().await;
    let course_id = CourseFactory::new()
        .meta_name(course_name)
        .create(&mut persistence)
        .unwrap();
    persistence.create_enrollment(user_id, course_id).unwrap();
    let assignment_id = AssignmentFactory::new()
        .course_id(course_id)
        .title(title)
        .create(&mut persistence)
        .unwrap();
    (course_id, assignment_id)
}

#[tokio::test]
async fn test_unauthenticated_request_redirects_to_login_with_next() {
    let app = build_router(bypassed_state());

    let response = app
        .oneshot(get_request("/learning/assignments/", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(
        response.headers().get(header::LOCATION).unwrap(),
        "/login/?next=/learning/assignments/"
    );
}

#[tokio::test]
async fn test_injected_session_is_accepted_on_first_request() {
    let state = bypassed_state();
    let user = seed_student(&state, "student2").await;
    let cookie = session_cookie_for(&state, &user).await;
    let app = build_router(state);

    let response = app
        .oneshot(get_request("/learning/assignments/", Some(&cookie)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_text(response).await;
    assert!(body.contains("Open assignments"));
}

#[tokio::test]
async fn test_student_without_enrollments_sees_empty_state() {
    let state = bypassed_state();
    let user = seed_student(&state, "student2").await;
    let cookie = session_cookie_for(&state, &user).await;
    let app = build_router(state);

    let response = app
        .oneshot(get_request("/learning/assignments/", Some(&cookie)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_text(response).await;
    assert!(body.contains("Open assignments"));
    assert!(body.contains("No assignments yet."));
}

#[tokio::test]
async fn test_listing_contains_enrolled_assignment_title() {
    let state = bypassed_state();
    let user = seed_student(&state, "student2").await;
    enroll_with_assignment(&state, user.user_id, "Rust 101", "E2E Assignment").await;
    let cookie = session_cookie_for(&state, &user).await;
    let app = build_router(state);

    let response = app
        .oneshot(get_request("/learning/assignments/", Some(&cookie)))
        .await
        .unwrap();

    let body = body_text(response).await;
    assert!(body.contains("E2E Assignment"));
}

#[tokio::test]
async fn test_course_filter_retains_and_excludes() {
    let state = bypassed_state();
    let user = seed_student(&state, "student2").await;
    let (course_a, _) =
        enroll_with_assignment(&state, user.user_id, "Rust 101", "E2E Assignment").await;
    let (course_b, _) =
        enroll_with_assignment(&state, user.user_id, "Rust 102", "Other Assignment").await;
    let cookie = session_cookie_for(&state, &user).await;
    let app = build_router(state);

    let filtered = app
        .clone()
        .oneshot(get_request(
            &format!("/learning/assignments/?course={course_a}&apply=1"),
            Some(&cookie),
        ))
        .await
        .unwrap();
    let body = body_text(filtered).await;
    assert!(body.contains("E2E Assignment"));
    assert!(!body.contains("Other Assignment"));

    let excluded = app
        .oneshot(get_request(
            &format!("/learning/assignments/?course={course_b}&apply=1"),
            Some(&cookie),
        ))
        .await
        .unwrap();
    let body = body_text(excluded).await;
    assert!(!body.contains("E2E Assignment"));
    assert!(body.contains("Other Assignment"));
}

#[tokio::test]
async fn test_detail_page_carries_comment_form_hooks() {
    let state = bypassed_state();
    let user = seed_student(&state, "student2").await;
    let (_, assignment_id) =
        enroll_with_assignment(&state, user.user_id, "Rust 101", "E2E Assignment").await;
    let cookie = session_cookie_for(&state, &user).await;
    let app = build_router(state);

    let response = app
        .oneshot(get_request(
            &format!("/learning/assignments/{assignment_id}/"),
            Some(&cookie),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_text(response).await;
    assert!(body.contains("id=\"add-comment\""));
    assert!(body.contains("id=\"comment-form-wrapper\" hidden"));
    assert!(body.contains("id=\"submit-id-comment-save\""));
}

#[tokio::test]
async fn test_comment_submission_appears_on_detail_page() {
    let state = bypassed_state();
    let user = seed_student(&state, "student2").await;
    let (_, assignment_id) =
        enroll_with_assignment(&state, user.user_id, "Rust 101", "E2E Assignment").await;
    let cookie = session_cookie_for(&state, &user).await;
    let app = build_router(state);

    let post = app
        .clone()
        .oneshot(form_request(
            &format!("/learning/assignments/{assignment_id}/comments/"),
            "body=Hello+from+Playwright+UI+test",
            Some(&cookie),
        ))
        .await
        .unwrap();
    assert_eq!(post.status(), StatusCode::FOUND);

    let detail = app
        .oneshot(get_request(
            &format!("/learning/assignments/{assignment_id}/"),
            Some(&cookie),
        ))
        .await
        .unwrap();
    let body = body_text(detail).await;
    assert!(body.contains("Hello from Playwright UI test"));
}

#[tokio::test]
async fn test_missing_assignment_returns_not_found() {
    let state = bypassed_state();
    let user = seed_student(&state, "student2").await;
    let cookie = session_cookie_for(&state, &user).await;
    let app = build_router(state);

    let response = app
        .oneshot(get_request("/learning/assignments/9999/", Some(&cookie)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_stale_auth_hash_is_rejected() {
    let state = bypassed_state();
    let user = seed_student(&state, "student2").await;
    let cookie = session_cookie_for(&state, &user).await;

    {
        let mut persistence = state.persistence.lock().await;
        persistence.set_password(user.user_id, "rotated").unwrap();
    }
    let app = build_router(state);

    let response = app
        .oneshot(get_request("/learning/assignments/", Some(&cookie)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(
        response.headers().get(header::LOCATION).unwrap(),
        "/login/?next=/learning/assignments/"
    );
}

#[tokio::test]
async fn test_expired_session_is_rejected() {
    let state = bypassed_state();
    let user = seed_student(&state, "student2").await;

    let cookie = {
        let mut persistence = state.persistence.lock().await;
        let auth_hash = studium_persistence::session_auth_hash(&user.password_hash);
        persistence
            .create_session("expired-key", user.user_id, &auth_hash, "2020-01-01T00:00:00Z")
            .unwrap();
        "sessionid=expired-key".to_string()
    };
    let app = build_router(state);

    let response = app
        .oneshot(get_request("/learning/assignments/", Some(&cookie)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FOUND);
}

#[tokio::test]
async fn test_unknown_session_key_is_rejected() {
    let app = build_router(bypassed_state());

    let response = app
        .oneshot(get_request(
            "/learning/assignments/",
            Some("sessionid=never-minted"),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FOUND);
}
