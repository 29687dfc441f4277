// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Persistence layer for the Studium test harness.
//!
//! This crate provides `SQLite` persistence for the fixture factories, the
//! idempotent seeding protocol, session injection, and the demo-account
//! reconciliation command. It is built on Diesel with raw-SQL schema
//! initialization.
//!
//! ## Connections and test isolation
//!
//! - `new_in_memory()` creates a unique shared-cache in-memory database per
//!   call (atomic counter), so tests never collide.
//! - `connect_sibling()` opens a second connection to the same database.
//!   Live-server style tests need this: the page driver issues requests on
//!   its own connection, so only committed writes are visible to it.
//!   Transactional savepoints on the fixture connection are not enough.
//!
//! ## Concurrency
//!
//! Single-writer test execution is assumed. Races between parallel seed
//! calls for the same natural key are not guarded; the unique constraints
//! turn a lost race into a loud failure rather than duplicate rows.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

use diesel::prelude::*;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};

mod auth;
mod data_models;
mod diesel_schema;
mod error;
mod mutations;
mod queries;
mod schema_init;

#[cfg(test)]
mod tests;

pub use auth::session_auth_hash;
pub use data_models::{
    AssignmentData, CommentData, CourseData, EnrollmentData, NewUser, NotificationTypeData,
    RoleGrantData, SessionData, SiteData, StudentProfileData, UserData, UserProfileUpdate,
};
pub use error::PersistenceError;

/// Atomic counter for generating unique in-memory database names.
///
/// This ensures deterministic test isolation by eliminating time-based
/// collisions. Each call to `new_in_memory()` receives a unique ID.
static DB_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Persistence adapter for the harness database.
pub struct SqlitePersistence {
    conn: SqliteConnection,
    database_url: String,
}

impl SqlitePersistence {
    /// Creates a new persistence adapter with an in-memory `SQLite` database.
    ///
    /// Uses a uniquely named shared-cache in-memory database so that
    /// `connect_sibling()` can open additional connections to the same
    /// data while separate calls stay isolated from each other.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    pub fn new_in_memory() -> Result<Self, PersistenceError> {
        let db_id = DB_COUNTER.fetch_add(1, Ordering::SeqCst);
        let db_name = format!("memdb_harness_{db_id}");
        let shared_memory_url = format!("file:{db_name}?mode=memory&cache=shared");

        let mut conn: SqliteConnection = schema_init::initialize_database(&shared_memory_url)?;
        schema_init::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self {
            conn,
            database_url: shared_memory_url,
        })
    }

    /// Creates a new persistence adapter with a file-based `SQLite` database.
    ///
    /// Reusing an existing file is supported; schema creation is a no-op on
    /// an already-initialized database, which is what makes seeding across
    /// process restarts meaningful.
    ///
    /// # Arguments
    ///
    /// * `path` - The path to the `SQLite` database file
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or initialized.
    pub fn new_with_file<P: AsRef<Path>>(path: P) -> Result<Self, PersistenceError> {
        let path_str = path.as_ref().to_str().ok_or_else(|| {
            PersistenceError::InitializationError("Invalid database path".to_string())
        })?;

        let mut conn: SqliteConnection = schema_init::initialize_database(path_str)?;
        schema_init::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self {
            conn,
            database_url: path_str.to_string(),
        })
    }

    /// Opens a second connection to the same database.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection cannot be established.
    pub fn connect_sibling(&self) -> Result<Self, PersistenceError> {
        let conn: SqliteConnection = schema_init::open_sibling_connection(&self.database_url)?;

        Ok(Self {
            conn,
            database_url: self.database_url.clone(),
        })
    }

    /// Returns the database URL this adapter is connected to.
    #[must_use]
    pub fn database_url(&self) -> &str {
        &self.database_url
    }

    /// Repopulates baseline data in one committed transaction.
    ///
    /// Wipes course-linked rows, upserts the given sites with forced IDs,
    /// resets the `sites` autoincrement sequence, and upserts the
    /// notification-type lookup rows. All-or-nothing; on success the
    /// transaction is committed (not a savepoint) so sibling connections
    /// observe the writes.
    ///
    /// # Arguments
    ///
    /// * `sites` - `(site_id, domain, name)` tuples with forced IDs
    /// * `notification_types` - `(type_id, code)` tuples with forced IDs
    ///
    /// # Errors
    ///
    /// Returns an error if any step fails; the transaction is rolled back.
    pub fn repopulate_baseline(
        &mut self,
        sites: &[(i64, &str, &str)],
        notification_types: &[(i64, &str)],
    ) -> Result<(), PersistenceError> {
        self.conn.transaction(|conn| {
            mutations::courses::clear_courses(conn)?;

            for (site_id, domain, name) in sites {
                mutations::sites::upsert_site(conn, *site_id, domain, name)?;
            }
            mutations::sites::reset_site_sequence(conn)?;

            for (type_id, code) in notification_types {
                mutations::sites::upsert_notification_type(conn, *type_id, code)?;
            }

            Ok(())
        })
    }

    // ========================================================================
    // Users
    // ========================================================================

    /// Creates a new user. See [`mutations::users::create_user`].
    ///
    /// # Errors
    ///
    /// Returns an error if creation fails or the username already exists.
    pub fn create_user(&mut self, new_user: &NewUser) -> Result<i64, PersistenceError> {
        mutations::users::create_user(&mut self.conn, new_user)
    }

    /// Retrieves a user by username, `Ok(None)` on miss.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_user_by_username(
        &mut self,
        username: &str,
    ) -> Result<Option<UserData>, PersistenceError> {
        queries::users::get_user_by_username(&mut self.conn, username)
    }

    /// Retrieves a user by ID, `Ok(None)` on miss.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_user_by_id(&mut self, user_id: i64) -> Result<Option<UserData>, PersistenceError> {
        queries::users::get_user_by_id(&mut self.conn, user_id)
    }

    /// Counts user rows with the given username.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn count_users_with_username(
        &mut self,
        username: &str,
    ) -> Result<i64, PersistenceError> {
        queries::users::count_users_with_username(&mut self.conn, username)
    }

    /// Normalizes a user's mutable core fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the user does not exist or the update fails.
    pub fn update_user_profile(
        &mut self,
        user_id: i64,
        update: &UserProfileUpdate,
    ) -> Result<(), PersistenceError> {
        mutations::users::update_user_profile(&mut self.conn, user_id, update)
    }

    /// Resets a user's password.
    ///
    /// # Errors
    ///
    /// Returns an error if the user does not exist or hashing fails.
    pub fn set_password(&mut self, user_id: i64, password: &str) -> Result<(), PersistenceError> {
        mutations::users::set_password(&mut self.conn, user_id, password)
    }

    /// Verifies a candidate password against the stored hash.
    ///
    /// # Errors
    ///
    /// Returns an error if the user does not exist or verification fails
    /// structurally.
    pub fn verify_password(
        &mut self,
        user_id: i64,
        candidate: &str,
    ) -> Result<bool, PersistenceError> {
        queries::users::verify_password(&mut self.conn, user_id, candidate)
    }

    // ========================================================================
    // Role grants
    // ========================================================================

    /// Grants a role to a user on a site (idempotent).
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails for a non-conflict reason.
    pub fn grant_role(
        &mut self,
        user_id: i64,
        site_id: i64,
        role: &str,
    ) -> Result<(), PersistenceError> {
        mutations::roles::grant_role(&mut self.conn, user_id, site_id, role)
    }

    /// Revokes a role grant; absent grants are tolerated.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails.
    pub fn revoke_role(
        &mut self,
        user_id: i64,
        site_id: i64,
        role: &str,
    ) -> Result<(), PersistenceError> {
        mutations::roles::revoke_role(&mut self.conn, user_id, site_id, role)
    }

    /// Lists all role grants for a user.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn roles_for_user(&mut self, user_id: i64) -> Result<Vec<RoleGrantData>, PersistenceError> {
        queries::users::roles_for_user(&mut self.conn, user_id)
    }

    /// Checks whether a user holds a role on a site.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn has_role(
        &mut self,
        user_id: i64,
        site_id: i64,
        role: &str,
    ) -> Result<bool, PersistenceError> {
        queries::users::has_role(&mut self.conn, user_id, site_id, role)
    }

    // ========================================================================
    // Sessions
    // ========================================================================

    /// Creates a session row directly, bypassing the login flow.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be created.
    pub fn create_session(
        &mut self,
        session_key: &str,
        user_id: i64,
        auth_hash: &str,
        expires_at: &str,
    ) -> Result<i64, PersistenceError> {
        mutations::sessions::create_session(&mut self.conn, session_key, user_id, auth_hash, expires_at)
    }

    /// Retrieves a session by key, `Ok(None)` on miss.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_session_by_key(
        &mut self,
        session_key: &str,
    ) -> Result<Option<SessionData>, PersistenceError> {
        queries::sessions::get_session_by_key(&mut self.conn, session_key)
    }

    /// Counts sessions belonging to a user.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn count_sessions_for_user(&mut self, user_id: i64) -> Result<i64, PersistenceError> {
        queries::sessions::count_sessions_for_user(&mut self.conn, user_id)
    }

    /// Deletes a session by key.
    ///
    /// # Errors
    ///
    /// Returns an error if the session does not exist or the delete fails.
    pub fn delete_session(&mut self, session_key: &str) -> Result<(), PersistenceError> {
        mutations::sessions::delete_session(&mut self.conn, session_key)
    }

    /// Deletes every session belonging to a user, returning the count.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails.
    pub fn delete_sessions_for_user(&mut self, user_id: i64) -> Result<usize, PersistenceError> {
        mutations::sessions::delete_sessions_for_user(&mut self.conn, user_id)
    }

    // ========================================================================
    // Sites and notification types
    // ========================================================================

    /// Upserts a site with a forced ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the upsert fails.
    pub fn upsert_site(
        &mut self,
        site_id: i64,
        domain: &str,
        name: &str,
    ) -> Result<(), PersistenceError> {
        mutations::sites::upsert_site(&mut self.conn, site_id, domain, name)
    }

    /// Resets the `sites` autoincrement sequence after forced-ID inserts.
    ///
    /// # Errors
    ///
    /// Returns an error if the sequence update fails.
    pub fn reset_site_sequence(&mut self) -> Result<(), PersistenceError> {
        mutations::sites::reset_site_sequence(&mut self.conn)
    }

    /// Retrieves a site by ID, `Ok(None)` on miss.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_site_by_id(&mut self, site_id: i64) -> Result<Option<SiteData>, PersistenceError> {
        queries::courses::get_site_by_id(&mut self.conn, site_id)
    }

    /// Upserts a notification-type lookup row.
    ///
    /// # Errors
    ///
    /// Returns an error if the upsert fails.
    pub fn upsert_notification_type(
        &mut self,
        type_id: i64,
        code: &str,
    ) -> Result<(), PersistenceError> {
        mutations::sites::upsert_notification_type(&mut self.conn, type_id, code)
    }

    /// Lists all notification-type lookup rows.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_notification_types(
        &mut self,
    ) -> Result<Vec<NotificationTypeData>, PersistenceError> {
        queries::courses::list_notification_types(&mut self.conn)
    }

    // ========================================================================
    // Courses, enrollments, assignments, comments, profiles
    // ========================================================================

    /// Gets or creates a semester for (year, term).
    ///
    /// # Errors
    ///
    /// Returns an error if the lookup or insert fails.
    pub fn get_or_create_semester(
        &mut self,
        year: i32,
        term: &str,
    ) -> Result<i64, PersistenceError> {
        mutations::courses::get_or_create_semester(&mut self.conn, year, term)
    }

    /// Creates a course.
    ///
    /// # Errors
    ///
    /// Returns an error if the course cannot be created.
    pub fn create_course(
        &mut self,
        semester_id: i64,
        site_id: i64,
        meta_name: &str,
    ) -> Result<i64, PersistenceError> {
        mutations::courses::create_course(&mut self.conn, semester_id, site_id, meta_name)
    }

    /// Creates an enrollment linking a student to a course.
    ///
    /// # Errors
    ///
    /// Returns an error if the enrollment cannot be created.
    pub fn create_enrollment(
        &mut self,
        student_id: i64,
        course_id: i64,
    ) -> Result<i64, PersistenceError> {
        mutations::courses::create_enrollment(&mut self.conn, student_id, course_id)
    }

    /// Creates an assignment in a course.
    ///
    /// # Errors
    ///
    /// Returns an error if the assignment cannot be created.
    pub fn create_assignment(
        &mut self,
        course_id: i64,
        title: &str,
    ) -> Result<i64, PersistenceError> {
        mutations::courses::create_assignment(&mut self.conn, course_id, title)
    }

    /// Lists the courses a student is enrolled in.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn courses_for_student(
        &mut self,
        student_id: i64,
    ) -> Result<Vec<CourseData>, PersistenceError> {
        queries::courses::courses_for_student(&mut self.conn, student_id)
    }

    /// Lists assignments visible to a student, optionally filtered by course.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn assignments_for_student(
        &mut self,
        student_id: i64,
        course_filter: Option<i64>,
    ) -> Result<Vec<AssignmentData>, PersistenceError> {
        queries::courses::assignments_for_student(&mut self.conn, student_id, course_filter)
    }

    /// Retrieves an assignment by ID, `Ok(None)` on miss.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_assignment(
        &mut self,
        assignment_id: i64,
    ) -> Result<Option<AssignmentData>, PersistenceError> {
        queries::courses::get_assignment(&mut self.conn, assignment_id)
    }

    /// Adds a comment to an assignment.
    ///
    /// # Errors
    ///
    /// Returns an error if the comment cannot be created.
    pub fn add_comment(
        &mut self,
        assignment_id: i64,
        author_id: i64,
        body: &str,
    ) -> Result<i64, PersistenceError> {
        mutations::courses::add_comment(&mut self.conn, assignment_id, author_id, body)
    }

    /// Lists comments on an assignment in posting order.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn comments_for_assignment(
        &mut self,
        assignment_id: i64,
    ) -> Result<Vec<CommentData>, PersistenceError> {
        queries::courses::comments_for_assignment(&mut self.conn, assignment_id)
    }

    /// Upserts a student profile keyed by (user, profile type).
    ///
    /// # Errors
    ///
    /// Returns an error if the upsert fails.
    pub fn upsert_student_profile(
        &mut self,
        user_id: i64,
        profile_type: &str,
        status: &str,
        year_of_admission: i32,
    ) -> Result<(), PersistenceError> {
        mutations::courses::upsert_student_profile(
            &mut self.conn,
            user_id,
            profile_type,
            status,
            year_of_admission,
        )
    }

    /// Retrieves a student profile, `Ok(None)` on miss.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_student_profile(
        &mut self,
        user_id: i64,
        profile_type: &str,
    ) -> Result<Option<StudentProfileData>, PersistenceError> {
        queries::courses::get_student_profile(&mut self.conn, user_id, profile_type)
    }

    /// Deletes all course-linked rows (baseline repopulation step).
    ///
    /// # Errors
    ///
    /// Returns an error if any delete fails.
    pub fn clear_courses(&mut self) -> Result<(), PersistenceError> {
        mutations::courses::clear_courses(&mut self.conn)
    }
}
