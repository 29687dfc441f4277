// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Tests for session persistence operations.

use crate::SqlitePersistence;
use crate::tests::create_test_user;

#[test]
fn test_create_and_lookup_session() {
    let mut persistence = SqlitePersistence::new_in_memory().unwrap();

    let user_id = persistence.create_user(&create_test_user("student2")).unwrap();
    persistence
        .create_session("abc123", user_id, "deadbeef", "2026-09-12T00:00:00Z")
        .unwrap();

    let session = persistence.get_session_by_key("abc123").unwrap().unwrap();
    assert_eq!(session.user_id, user_id);
    assert_eq!(session.auth_hash, "deadbeef");
    assert_eq!(session.expires_at, "2026-09-12T00:00:00Z");
}

#[test]
fn test_lookup_missing_session_returns_none() {
    let mut persistence = SqlitePersistence::new_in_memory().unwrap();

    assert!(persistence.get_session_by_key("nope").unwrap().is_none());
}

#[test]
fn test_duplicate_session_key_is_rejected() {
    let mut persistence = SqlitePersistence::new_in_memory().unwrap();

    let user_id = persistence.create_user(&create_test_user("student2")).unwrap();
    persistence
        .create_session("abc123", user_id, "deadbeef", "2026-09-12T00:00:00Z")
        .unwrap();

    let result = persistence.create_session("abc123", user_id, "deadbeef", "2026-09-12T00:00:00Z");
    assert!(result.is_err());
}

#[test]
fn test_delete_session() {
    let mut persistence = SqlitePersistence::new_in_memory().unwrap();

    let user_id = persistence.create_user(&create_test_user("student2")).unwrap();
    persistence
        .create_session("abc123", user_id, "deadbeef", "2026-09-12T00:00:00Z")
        .unwrap();

    persistence.delete_session("abc123").unwrap();
    assert!(persistence.get_session_by_key("abc123").unwrap().is_none());

    // Deleting again reports the miss.
    assert!(persistence.delete_session("abc123").is_err());
}

#[test]
fn test_delete_sessions_for_user() {
    let mut persistence = SqlitePersistence::new_in_memory().unwrap();

    let user_id = persistence.create_user(&create_test_user("student2")).unwrap();
    persistence
        .create_session("key-1", user_id, "deadbeef", "2026-09-12T00:00:00Z")
        .unwrap();
    persistence
        .create_session("key-2", user_id, "deadbeef", "2026-09-12T00:00:00Z")
        .unwrap();

    assert_eq!(persistence.count_sessions_for_user(user_id).unwrap(), 2);
    assert_eq!(persistence.delete_sessions_for_user(user_id).unwrap(), 2);
    assert_eq!(persistence.count_sessions_for_user(user_id).unwrap(), 0);
}

#[test]
fn test_sibling_connection_observes_committed_writes() {
    let mut persistence = SqlitePersistence::new_in_memory().unwrap();
    let mut sibling = persistence.connect_sibling().unwrap();

    let user_id = persistence.create_user(&create_test_user("student2")).unwrap();
    persistence
        .create_session("abc123", user_id, "deadbeef", "2026-09-12T00:00:00Z")
        .unwrap();

    // The second connection sees the committed rows: this is what lets a
    // live server answer requests for data the fixtures just wrote.
    let session = sibling.get_session_by_key("abc123").unwrap().unwrap();
    assert_eq!(session.user_id, user_id);
    assert!(sibling.get_user_by_username("student2").unwrap().is_some());
}
