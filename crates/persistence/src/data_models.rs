// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use serde::{Deserialize, Serialize};

/// A user row as exposed to the fixture and server layers.
///
/// The password is stored as a bcrypt hash; the plain-text value is
/// write-only and never leaves the mutation that hashed it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserData {
    pub user_id: i64,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub gender: String,
    pub is_staff: bool,
    pub is_superuser: bool,
    pub is_active: bool,
    pub password_hash: String,
    pub created_at: Option<String>,
}

/// Field values applied when creating a user.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub gender: String,
    pub is_staff: bool,
    pub is_superuser: bool,
    pub password: String,
}

/// Mutable core fields normalized by upsert-style operations.
///
/// These are the fields the demo-account reconciliation command forces to
/// the desired state on every run.
#[derive(Debug, Clone)]
pub struct UserProfileUpdate {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub gender: String,
    pub is_staff: bool,
    pub is_superuser: bool,
    pub is_active: bool,
}

/// A role grant row, keyed by (user, site, role).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleGrantData {
    pub role_id: i64,
    pub user_id: i64,
    pub site_id: i64,
    pub role: String,
}

/// A server-side session row.
///
/// `auth_hash` ties the session to the credential that was current when the
/// session was created; rotating the password invalidates the session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionData {
    pub session_id: i64,
    pub session_key: String,
    pub user_id: i64,
    pub auth_hash: String,
    pub created_at: Option<String>,
    pub expires_at: String,
}

/// A site (tenant) row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteData {
    pub site_id: i64,
    pub domain: String,
    pub name: String,
}

/// A course row joined with its semester label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseData {
    pub course_id: i64,
    pub semester_id: i64,
    pub site_id: i64,
    pub meta_name: String,
}

/// An enrollment row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrollmentData {
    pub enrollment_id: i64,
    pub student_id: i64,
    pub course_id: i64,
}

/// An assignment row. The title is the UI-visible identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentData {
    pub assignment_id: i64,
    pub course_id: i64,
    pub title: String,
}

/// A comment posted on an assignment detail page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentData {
    pub comment_id: i64,
    pub assignment_id: i64,
    pub author_id: i64,
    pub body: String,
    pub created_at: Option<String>,
}

/// A student profile row, keyed by (user, profile type).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentProfileData {
    pub profile_id: i64,
    pub user_id: i64,
    pub profile_type: String,
    pub status: String,
    pub year_of_admission: i32,
}

/// A notification-type lookup row with a forced ID.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationTypeData {
    pub type_id: i64,
    pub code: String,
}
