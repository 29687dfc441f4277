// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Tests for the fixture factories.

use crate::error::FixtureError;
use crate::factories::{
    AssignmentFactory, CourseFactory, EnrollmentFactory, SemesterFactory, UserFactory,
};
use crate::seed::TEST_PASSWORD;
use crate::tests::seeded_persistence;

#[test]
fn test_user_factory_defaults_are_unique() {
    let mut persistence = seeded_persistence();

    let first = UserFactory::new().create(&mut persistence).unwrap();
    let second = UserFactory::new().create(&mut persistence).unwrap();

    assert_ne!(first.username, second.username);
    assert_ne!(first.user_id, second.user_id);
    assert!(first.email.contains('@'));
}

#[test]
fn test_user_factory_rejects_invalid_username_and_email() {
    let mut persistence = seeded_persistence();

    let result = UserFactory::new()
        .username("has spaces")
        .create(&mut persistence);
    assert!(matches!(result, Err(FixtureError::Validation(_))));

    let result = UserFactory::new()
        .email("not-an-address")
        .create(&mut persistence);
    assert!(matches!(result, Err(FixtureError::Validation(_))));
}

#[test]
fn test_user_factory_overrides() {
    let mut persistence = seeded_persistence();

    let user = UserFactory::new()
        .username("curator1")
        .email("curator1@studium.test")
        .first_name("Alma")
        .last_name("Mater")
        .staff()
        .superuser()
        .create(&mut persistence)
        .unwrap();

    assert_eq!(user.username, "curator1");
    assert_eq!(user.email, "curator1@studium.test");
    assert!(user.is_staff);
    assert!(user.is_superuser);
    assert!(
        persistence
            .verify_password(user.user_id, TEST_PASSWORD)
            .unwrap()
    );
}

#[test]
fn test_semester_factory_is_get_or_create() {
    let mut persistence = seeded_persistence();

    let first = SemesterFactory::new().year(2026).term("autumn").create(&mut persistence).unwrap();
    let second = SemesterFactory::new().year(2026).term("autumn").create(&mut persistence).unwrap();

    assert_eq!(first, second);
}

#[test]
fn test_enrollment_factory_creates_dependencies_on_demand() {
    let mut persistence = seeded_persistence();

    let enrollment = EnrollmentFactory::new().create(&mut persistence).unwrap();

    assert!(
        persistence
            .get_user_by_id(enrollment.student_id)
            .unwrap()
            .is_some()
    );
    let courses = persistence.courses_for_student(enrollment.student_id).unwrap();
    assert_eq!(courses.len(), 1);
    assert_eq!(courses[0].course_id, enrollment.course_id);
}

#[test]
fn test_assignment_factory_with_existing_course() {
    let mut persistence = seeded_persistence();

    let course_id = CourseFactory::new()
        .meta_name("Rust 101")
        .create(&mut persistence)
        .unwrap();
    let assignment_id = AssignmentFactory::new()
        .course_id(course_id)
        .title("E2E Assignment")
        .create(&mut persistence)
        .unwrap();

    let assignment = persistence.get_assignment(assignment_id).unwrap().unwrap();
    assert_eq!(assignment.course_id, course_id);
    assert_eq!(assignment.title, "E2E Assignment");
}
