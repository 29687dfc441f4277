// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Course, enrollment, assignment, comment, and profile mutations.

use diesel::prelude::*;
use tracing::{debug, info};

use crate::diesel_schema::{
    assignment_comments, assignments, courses, enrollments, semesters, student_profiles,
};
use crate::error::PersistenceError;
use crate::schema_init::get_last_insert_rowid;

/// Gets or creates a semester for (year, term).
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `year` - The calendar year
/// * `term` - The term label ("autumn", "spring")
///
/// # Errors
///
/// Returns an error if the lookup or insert fails.
pub fn get_or_create_semester(
    conn: &mut SqliteConnection,
    year: i32,
    term: &str,
) -> Result<i64, PersistenceError> {
    let existing: Option<i64> = semesters::table
        .filter(semesters::year.eq(year))
        .filter(semesters::term.eq(term))
        .select(semesters::semester_id)
        .first(conn)
        .optional()?;

    if let Some(semester_id) = existing {
        return Ok(semester_id);
    }

    debug!(year, term, "Creating semester");

    diesel::insert_into(semesters::table)
        .values((semesters::year.eq(year), semesters::term.eq(term)))
        .execute(conn)?;

    get_last_insert_rowid(conn)
}

/// Creates a course.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `semester_id` - The semester the course runs in
/// * `site_id` - The tenant site
/// * `meta_name` - The course name
///
/// # Errors
///
/// Returns an error if the course cannot be created.
pub fn create_course(
    conn: &mut SqliteConnection,
    semester_id: i64,
    site_id: i64,
    meta_name: &str,
) -> Result<i64, PersistenceError> {
    debug!(semester_id, site_id, meta_name, "Creating course");

    diesel::insert_into(courses::table)
        .values((
            courses::semester_id.eq(semester_id),
            courses::site_id.eq(site_id),
            courses::meta_name.eq(meta_name),
        ))
        .execute(conn)?;

    get_last_insert_rowid(conn)
}

/// Creates an enrollment linking a student to a course.
///
/// Enrollments are immutable once created within a run; re-creating the
/// same link is rejected by the (student, course) unique constraint.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `student_id` - The student's user ID
/// * `course_id` - The course ID
///
/// # Errors
///
/// Returns an error if the enrollment cannot be created.
pub fn create_enrollment(
    conn: &mut SqliteConnection,
    student_id: i64,
    course_id: i64,
) -> Result<i64, PersistenceError> {
    debug!(student_id, course_id, "Creating enrollment");

    diesel::insert_into(enrollments::table)
        .values((
            enrollments::student_id.eq(student_id),
            enrollments::course_id.eq(course_id),
        ))
        .execute(conn)?;

    get_last_insert_rowid(conn)
}

/// Creates an assignment in a course.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `course_id` - The course ID
/// * `title` - The assignment title (the UI-visible identifier)
///
/// # Errors
///
/// Returns an error if the assignment cannot be created.
pub fn create_assignment(
    conn: &mut SqliteConnection,
    course_id: i64,
    title: &str,
) -> Result<i64, PersistenceError> {
    debug!(course_id, title, "Creating assignment");

    diesel::insert_into(assignments::table)
        .values((
            assignments::course_id.eq(course_id),
            assignments::title.eq(title),
        ))
        .execute(conn)?;

    get_last_insert_rowid(conn)
}

/// Adds a comment to an assignment.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `assignment_id` - The assignment ID
/// * `author_id` - The commenting user's ID
/// * `body` - The comment text
///
/// # Errors
///
/// Returns an error if the comment cannot be created.
pub fn add_comment(
    conn: &mut SqliteConnection,
    assignment_id: i64,
    author_id: i64,
    body: &str,
) -> Result<i64, PersistenceError> {
    debug!(assignment_id, author_id, "Adding comment");

    diesel::insert_into(assignment_comments::table)
        .values((
            assignment_comments::assignment_id.eq(assignment_id),
            assignment_comments::author_id.eq(author_id),
            assignment_comments::body.eq(body),
        ))
        .execute(conn)?;

    get_last_insert_rowid(conn)
}

/// Upserts a student profile keyed by (user, profile type).
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `user_id` - The user ID
/// * `profile_type` - The profile type string
/// * `status` - The profile status string
/// * `year_of_admission` - Admission year
///
/// # Errors
///
/// Returns an error if the upsert fails.
pub fn upsert_student_profile(
    conn: &mut SqliteConnection,
    user_id: i64,
    profile_type: &str,
    status: &str,
    year_of_admission: i32,
) -> Result<(), PersistenceError> {
    debug!(user_id, profile_type, "Upserting student profile");

    diesel::insert_into(student_profiles::table)
        .values((
            student_profiles::user_id.eq(user_id),
            student_profiles::profile_type.eq(profile_type),
            student_profiles::status.eq(status),
            student_profiles::year_of_admission.eq(year_of_admission),
        ))
        .on_conflict((student_profiles::user_id, student_profiles::profile_type))
        .do_update()
        .set((
            student_profiles::status.eq(status),
            student_profiles::year_of_admission.eq(year_of_admission),
        ))
        .execute(conn)?;

    Ok(())
}

/// Deletes all course-linked rows.
///
/// Baseline repopulation starts from a clean slate for courses so stale
/// rows from earlier runs (or old data migrations) cannot leak into
/// assertions. Deletes run leaf-first to satisfy foreign keys.
///
/// # Arguments
///
/// * `conn` - The database connection
///
/// # Errors
///
/// Returns an error if any delete fails.
pub fn clear_courses(conn: &mut SqliteConnection) -> Result<(), PersistenceError> {
    info!("Clearing course-linked tables");

    diesel::delete(assignment_comments::table).execute(conn)?;
    diesel::delete(assignments::table).execute(conn)?;
    diesel::delete(enrollments::table).execute(conn)?;
    diesel::delete(courses::table).execute(conn)?;
    diesel::delete(semesters::table).execute(conn)?;

    Ok(())
}
