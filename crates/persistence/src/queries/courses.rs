// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Course, enrollment, assignment, comment, and profile queries.

use diesel::prelude::*;
use tracing::debug;

use crate::data_models::{
    AssignmentData, CommentData, CourseData, NotificationTypeData, SiteData, StudentProfileData,
};
use crate::diesel_schema::{
    assignment_comments, assignments, courses, enrollments, notification_types, sites,
    student_profiles,
};
use crate::error::PersistenceError;

/// Retrieves a site by ID.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `site_id` - The site ID
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the site is not found.
pub fn get_site_by_id(
    conn: &mut SqliteConnection,
    site_id: i64,
) -> Result<Option<SiteData>, PersistenceError> {
    let result: Option<(i64, String, String)> = sites::table
        .filter(sites::site_id.eq(site_id))
        .select((sites::site_id, sites::domain, sites::name))
        .first(conn)
        .optional()?;

    Ok(result.map(|(site_id, domain, name)| SiteData {
        site_id,
        domain,
        name,
    }))
}

/// Lists the courses a student is enrolled in, ordered by ID.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `student_id` - The student's user ID
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn courses_for_student(
    conn: &mut SqliteConnection,
    student_id: i64,
) -> Result<Vec<CourseData>, PersistenceError> {
    let course_ids: Vec<i64> = enrollments::table
        .filter(enrollments::student_id.eq(student_id))
        .select(enrollments::course_id)
        .load(conn)?;

    let rows: Vec<(i64, i64, i64, String)> = courses::table
        .filter(courses::course_id.eq_any(&course_ids))
        .order(courses::course_id.asc())
        .select((
            courses::course_id,
            courses::semester_id,
            courses::site_id,
            courses::meta_name,
        ))
        .load(conn)?;

    Ok(rows
        .into_iter()
        .map(|(course_id, semester_id, site_id, meta_name)| CourseData {
            course_id,
            semester_id,
            site_id,
            meta_name,
        })
        .collect())
}

/// Lists assignments visible to a student, optionally filtered by course.
///
/// Visibility follows enrollment: a student sees an assignment when they
/// are enrolled in its course. Filtering by a course the student is not
/// enrolled in yields an empty list, not an error.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `student_id` - The student's user ID
/// * `course_filter` - Restrict to one course when set
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn assignments_for_student(
    conn: &mut SqliteConnection,
    student_id: i64,
    course_filter: Option<i64>,
) -> Result<Vec<AssignmentData>, PersistenceError> {
    debug!(student_id, ?course_filter, "Listing assignments for student");

    let mut course_ids: Vec<i64> = enrollments::table
        .filter(enrollments::student_id.eq(student_id))
        .select(enrollments::course_id)
        .load(conn)?;

    if let Some(course_id) = course_filter {
        course_ids.retain(|id| *id == course_id);
    }

    let rows: Vec<(i64, i64, String)> = assignments::table
        .filter(assignments::course_id.eq_any(&course_ids))
        .order(assignments::assignment_id.asc())
        .select((
            assignments::assignment_id,
            assignments::course_id,
            assignments::title,
        ))
        .load(conn)?;

    Ok(rows
        .into_iter()
        .map(|(assignment_id, course_id, title)| AssignmentData {
            assignment_id,
            course_id,
            title,
        })
        .collect())
}

/// Retrieves an assignment by ID.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `assignment_id` - The assignment ID
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the assignment is not found.
pub fn get_assignment(
    conn: &mut SqliteConnection,
    assignment_id: i64,
) -> Result<Option<AssignmentData>, PersistenceError> {
    let result: Option<(i64, i64, String)> = assignments::table
        .filter(assignments::assignment_id.eq(assignment_id))
        .select((
            assignments::assignment_id,
            assignments::course_id,
            assignments::title,
        ))
        .first(conn)
        .optional()?;

    Ok(result.map(|(assignment_id, course_id, title)| AssignmentData {
        assignment_id,
        course_id,
        title,
    }))
}

/// Lists comments on an assignment in posting order.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `assignment_id` - The assignment ID
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn comments_for_assignment(
    conn: &mut SqliteConnection,
    assignment_id: i64,
) -> Result<Vec<CommentData>, PersistenceError> {
    let rows: Vec<(i64, i64, i64, String, Option<String>)> = assignment_comments::table
        .filter(assignment_comments::assignment_id.eq(assignment_id))
        .order(assignment_comments::comment_id.asc())
        .select((
            assignment_comments::comment_id,
            assignment_comments::assignment_id,
            assignment_comments::author_id,
            assignment_comments::body,
            assignment_comments::created_at,
        ))
        .load(conn)?;

    Ok(rows
        .into_iter()
        .map(
            |(comment_id, assignment_id, author_id, body, created_at)| CommentData {
                comment_id,
                assignment_id,
                author_id,
                body,
                created_at,
            },
        )
        .collect())
}

/// Retrieves a student profile by (user, profile type).
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `user_id` - The user ID
/// * `profile_type` - The profile type string
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if no such profile exists.
pub fn get_student_profile(
    conn: &mut SqliteConnection,
    user_id: i64,
    profile_type: &str,
) -> Result<Option<StudentProfileData>, PersistenceError> {
    let result: Option<(i64, i64, String, String, i32)> = student_profiles::table
        .filter(student_profiles::user_id.eq(user_id))
        .filter(student_profiles::profile_type.eq(profile_type))
        .select((
            student_profiles::profile_id,
            student_profiles::user_id,
            student_profiles::profile_type,
            student_profiles::status,
            student_profiles::year_of_admission,
        ))
        .first(conn)
        .optional()?;

    Ok(result.map(
        |(profile_id, user_id, profile_type, status, year_of_admission)| StudentProfileData {
            profile_id,
            user_id,
            profile_type,
            status,
            year_of_admission,
        },
    ))
}

/// Lists all notification-type lookup rows ordered by forced ID.
///
/// # Arguments
///
/// * `conn` - The database connection
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_notification_types(
    conn: &mut SqliteConnection,
) -> Result<Vec<NotificationTypeData>, PersistenceError> {
    let rows: Vec<(i64, String)> = notification_types::table
        .order(notification_types::type_id.asc())
        .select((notification_types::type_id, notification_types::code))
        .load(conn)?;

    Ok(rows
        .into_iter()
        .map(|(type_id, code)| NotificationTypeData { type_id, code })
        .collect())
}
