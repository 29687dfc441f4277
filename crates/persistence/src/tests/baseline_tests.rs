// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Tests for baseline repopulation and site sequence handling.

use crate::SqlitePersistence;
use crate::tests::create_test_user;

const SITES: &[(i64, &str, &str)] = &[
    (1, "test.example.com", "test.example.com"),
    (2, "another.example.com", "another.example.com"),
];

const NOTIFICATION_TYPES: &[(i64, &str)] = &[(1, "NEW_ASSIGNMENT"), (2, "NEW_COMMENT")];

#[test]
fn test_repopulate_baseline_is_idempotent() {
    let mut persistence = SqlitePersistence::new_in_memory().unwrap();

    persistence.repopulate_baseline(SITES, NOTIFICATION_TYPES).unwrap();
    persistence.repopulate_baseline(SITES, NOTIFICATION_TYPES).unwrap();

    let site = persistence.get_site_by_id(1).unwrap().unwrap();
    assert_eq!(site.domain, "test.example.com");

    let types = persistence.list_notification_types().unwrap();
    assert_eq!(types.len(), 2);
    assert_eq!(types[0].code, "NEW_ASSIGNMENT");
}

#[test]
fn test_sequence_reset_prevents_forced_id_collisions() {
    let mut persistence = SqlitePersistence::new_in_memory().unwrap();

    persistence.repopulate_baseline(SITES, NOTIFICATION_TYPES).unwrap();

    // A later autoincrement insert must not be handed a forced ID.
    persistence.upsert_site(3, "third.example.com", "third").unwrap();
    let site = persistence.get_site_by_id(3).unwrap().unwrap();
    assert_eq!(site.domain, "third.example.com");
}

#[test]
fn test_repopulate_baseline_clears_courses_but_keeps_users() {
    let mut persistence = SqlitePersistence::new_in_memory().unwrap();

    persistence.repopulate_baseline(SITES, NOTIFICATION_TYPES).unwrap();

    let semester_id = persistence.get_or_create_semester(2026, "autumn").unwrap();
    let course_id = persistence.create_course(semester_id, 1, "Rust 101").unwrap();
    let student_id = persistence.create_user(&create_test_user("student2")).unwrap();
    persistence.create_enrollment(student_id, course_id).unwrap();

    persistence.repopulate_baseline(SITES, NOTIFICATION_TYPES).unwrap();

    assert!(persistence.courses_for_student(student_id).unwrap().is_empty());
    // Seeded users survive: the idempotent actor invariant spans runs.
    assert!(persistence.get_user_by_username("student2").unwrap().is_some());
}
