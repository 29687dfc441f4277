// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Tests for user and role-grant persistence operations.

use crate::tests::create_test_user;
use crate::{SqlitePersistence, UserProfileUpdate};

#[test]
fn test_create_and_lookup_user_by_username() {
    let mut persistence = SqlitePersistence::new_in_memory().unwrap();

    let user_id = persistence.create_user(&create_test_user("student2")).unwrap();

    let user = persistence.get_user_by_username("student2").unwrap().unwrap();
    assert_eq!(user.user_id, user_id);
    assert_eq!(user.email, "student2@example.com");
    assert!(user.is_active);
    assert!(!user.is_staff);
}

#[test]
fn test_lookup_missing_user_returns_none() {
    let mut persistence = SqlitePersistence::new_in_memory().unwrap();

    assert!(persistence.get_user_by_username("ghost").unwrap().is_none());
}

#[test]
fn test_duplicate_username_is_rejected() {
    let mut persistence = SqlitePersistence::new_in_memory().unwrap();

    persistence.create_user(&create_test_user("student2")).unwrap();
    let result = persistence.create_user(&create_test_user("student2"));

    assert!(result.is_err());
    assert_eq!(persistence.count_users_with_username("student2").unwrap(), 1);
}

#[test]
fn test_password_reset_and_verify() {
    let mut persistence = SqlitePersistence::new_in_memory().unwrap();

    let user_id = persistence.create_user(&create_test_user("student2")).unwrap();

    persistence.set_password(user_id, "test123foobar@!").unwrap();

    assert!(persistence.verify_password(user_id, "test123foobar@!").unwrap());
    assert!(!persistence.verify_password(user_id, "initial-password").unwrap());
}

#[test]
fn test_password_is_never_stored_in_plain_text() {
    let mut persistence = SqlitePersistence::new_in_memory().unwrap();

    let user_id = persistence.create_user(&create_test_user("student2")).unwrap();
    let user = persistence.get_user_by_id(user_id).unwrap().unwrap();

    assert_ne!(user.password_hash, "initial-password");
    assert!(user.password_hash.starts_with("$2"));
}

#[test]
fn test_update_user_profile_normalizes_fields() {
    let mut persistence = SqlitePersistence::new_in_memory().unwrap();

    let user_id = persistence.create_user(&create_test_user("microvanuta")).unwrap();

    persistence
        .update_user_profile(
            user_id,
            &UserProfileUpdate {
                email: String::from("microvanuta@example.com"),
                first_name: String::from("Micro"),
                last_name: String::from("Vanuta"),
                gender: String::from("Other"),
                is_staff: true,
                is_superuser: true,
                is_active: true,
            },
        )
        .unwrap();

    let user = persistence.get_user_by_id(user_id).unwrap().unwrap();
    assert!(user.is_staff);
    assert!(user.is_superuser);
    assert_eq!(user.first_name, "Micro");
    // Username is the natural key; the update never touches it.
    assert_eq!(user.username, "microvanuta");
}

#[test]
fn test_update_missing_user_fails() {
    let mut persistence = SqlitePersistence::new_in_memory().unwrap();

    let result = persistence.update_user_profile(
        9999,
        &UserProfileUpdate {
            email: String::from("x@example.com"),
            first_name: String::new(),
            last_name: String::new(),
            gender: String::from("Other"),
            is_staff: false,
            is_superuser: false,
            is_active: true,
        },
    );

    assert!(result.is_err());
}

#[test]
fn test_grant_role_is_idempotent() {
    let mut persistence = SqlitePersistence::new_in_memory().unwrap();

    persistence.upsert_site(1, "test.example.com", "Test Site").unwrap();
    let user_id = persistence.create_user(&create_test_user("student2")).unwrap();

    persistence.grant_role(user_id, 1, "Student").unwrap();
    persistence.grant_role(user_id, 1, "Student").unwrap();
    persistence.grant_role(user_id, 1, "Student").unwrap();

    let grants = persistence.roles_for_user(user_id).unwrap();
    assert_eq!(grants.len(), 1);
    assert_eq!(grants[0].role, "Student");
    assert!(persistence.has_role(user_id, 1, "Student").unwrap());
}

#[test]
fn test_distinct_roles_on_one_site_coexist() {
    let mut persistence = SqlitePersistence::new_in_memory().unwrap();

    persistence.upsert_site(1, "test.example.com", "Test Site").unwrap();
    let user_id = persistence.create_user(&create_test_user("curator")).unwrap();

    persistence.grant_role(user_id, 1, "Student").unwrap();
    persistence.grant_role(user_id, 1, "Curator").unwrap();

    let grants = persistence.roles_for_user(user_id).unwrap();
    assert_eq!(grants.len(), 2);
}

#[test]
fn test_revoke_missing_role_is_tolerated() {
    let mut persistence = SqlitePersistence::new_in_memory().unwrap();

    persistence.upsert_site(1, "test.example.com", "Test Site").unwrap();
    let user_id = persistence.create_user(&create_test_user("student2")).unwrap();

    persistence.revoke_role(user_id, 1, "Curator").unwrap();
    assert!(persistence.roles_for_user(user_id).unwrap().is_empty());
}
