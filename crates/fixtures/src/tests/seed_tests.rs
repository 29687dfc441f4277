// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Tests for the idempotent seeding protocol.

use studium_domain::Role;
use studium_persistence::SqlitePersistence;

use crate::error::FixtureError;
use crate::seed::{
    ANOTHER_DOMAIN, TEST_DOMAIN, TEST_DOMAIN_ID, TEST_PASSWORD, ensure_student,
    repopulate_baseline,
};
use crate::tests::seeded_persistence;

#[test]
fn test_ensure_student_is_idempotent() {
    let mut persistence = seeded_persistence();

    let first = ensure_student(&mut persistence, TEST_DOMAIN_ID, "student2").unwrap();
    let second = ensure_student(&mut persistence, TEST_DOMAIN_ID, "student2").unwrap();
    let third = ensure_student(&mut persistence, TEST_DOMAIN_ID, "student2").unwrap();

    assert_eq!(first.user_id, second.user_id);
    assert_eq!(second.user_id, third.user_id);
    assert_eq!(persistence.count_users_with_username("student2").unwrap(), 1);
}

#[test]
fn test_ensure_student_rejects_invalid_username() {
    let mut persistence = seeded_persistence();

    let result = ensure_student(&mut persistence, TEST_DOMAIN_ID, "bad name!");

    assert!(matches!(result, Err(FixtureError::Validation(_))));
    assert!(
        persistence
            .get_user_by_username("bad name!")
            .unwrap()
            .is_none()
    );
}

#[test]
fn test_ensure_student_resets_password() {
    let mut persistence = seeded_persistence();

    let user = ensure_student(&mut persistence, TEST_DOMAIN_ID, "student2").unwrap();
    persistence.set_password(user.user_id, "drifted-by-a-scenario").unwrap();

    ensure_student(&mut persistence, TEST_DOMAIN_ID, "student2").unwrap();

    assert!(persistence.verify_password(user.user_id, TEST_PASSWORD).unwrap());
}

#[test]
fn test_ensure_student_role_grant_does_not_duplicate() {
    let mut persistence = seeded_persistence();

    let user = ensure_student(&mut persistence, TEST_DOMAIN_ID, "student2").unwrap();
    ensure_student(&mut persistence, TEST_DOMAIN_ID, "student2").unwrap();

    let grants = persistence.roles_for_user(user.user_id).unwrap();
    assert_eq!(grants.len(), 1);
    assert_eq!(grants[0].role, Role::Student.as_str());
    assert_eq!(grants[0].site_id, TEST_DOMAIN_ID);
}

#[test]
fn test_ensure_student_survives_process_restart() {
    // Two adapters sharing one database stand in for two processes.
    let mut persistence = seeded_persistence();
    let first = ensure_student(&mut persistence, TEST_DOMAIN_ID, "student2").unwrap();

    let mut second_process = persistence.connect_sibling().unwrap();
    let second = ensure_student(&mut second_process, TEST_DOMAIN_ID, "student2").unwrap();

    assert_eq!(first.user_id, second.user_id);
    assert_eq!(
        second_process.count_users_with_username("student2").unwrap(),
        1
    );
}

#[test]
fn test_repopulate_baseline_forces_site_ids() {
    let mut persistence = SqlitePersistence::new_in_memory().unwrap();

    repopulate_baseline(&mut persistence).unwrap();

    let site1 = persistence.get_site_by_id(1).unwrap().unwrap();
    let site2 = persistence.get_site_by_id(2).unwrap().unwrap();
    assert_eq!(site1.domain, TEST_DOMAIN);
    assert_eq!(site2.domain, ANOTHER_DOMAIN);
}

#[test]
fn test_repopulate_baseline_twice_is_stable() {
    let mut persistence = seeded_persistence();

    repopulate_baseline(&mut persistence).unwrap();

    let site1 = persistence.get_site_by_id(1).unwrap().unwrap();
    assert_eq!(site1.domain, TEST_DOMAIN);
    let types = persistence.list_notification_types().unwrap();
    assert_eq!(types.len(), 3);
}

#[test]
fn test_repopulate_baseline_wipes_course_rows() {
    let mut persistence = seeded_persistence();

    let enrollment = crate::factories::EnrollmentFactory::new()
        .create(&mut persistence)
        .unwrap();
    repopulate_baseline(&mut persistence).unwrap();

    assert!(
        persistence
            .courses_for_student(enrollment.student_id)
            .unwrap()
            .is_empty()
    );
}
