// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! `SQLite`-specific initialization helpers.
//!
//! This module is limited to:
//! - Connection initialization and schema creation
//! - `SQLite`-specific configuration (PRAGMA statements)
//! - `SQLite`-specific workarounds (e.g., `last_insert_rowid()`)
//!
//! All domain queries and mutations live in `queries/` and `mutations/`.

use diesel::connection::SimpleConnection;
use diesel::dsl::sql;
use diesel::prelude::*;
use diesel::sql_types::{BigInt, Integer};
use diesel::{Connection, RunQueryDsl, SqliteConnection};
use tracing::info;

use crate::error::PersistenceError;

/// Schema for the harness database.
///
/// Every statement is `IF NOT EXISTS` so initializing an already-populated
/// database (the reuse-db workflow) is a no-op.
const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS users (
        user_id INTEGER PRIMARY KEY AUTOINCREMENT,
        username TEXT NOT NULL UNIQUE,
        email TEXT NOT NULL,
        first_name TEXT NOT NULL,
        last_name TEXT NOT NULL,
        gender TEXT NOT NULL CHECK(gender IN ('Male', 'Female', 'Other')),
        is_staff INTEGER NOT NULL DEFAULT 0 CHECK(is_staff IN (0, 1)),
        is_superuser INTEGER NOT NULL DEFAULT 0 CHECK(is_superuser IN (0, 1)),
        is_active INTEGER NOT NULL DEFAULT 1 CHECK(is_active IN (0, 1)),
        password_hash TEXT NOT NULL,
        created_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP
    );

    CREATE TABLE IF NOT EXISTS sites (
        site_id INTEGER PRIMARY KEY AUTOINCREMENT,
        domain TEXT NOT NULL UNIQUE,
        name TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS user_roles (
        role_id INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id INTEGER NOT NULL,
        site_id INTEGER NOT NULL,
        role TEXT NOT NULL CHECK(role IN ('Student', 'Teacher', 'Curator')),
        UNIQUE(user_id, site_id, role),
        FOREIGN KEY(user_id) REFERENCES users(user_id),
        FOREIGN KEY(site_id) REFERENCES sites(site_id)
    );

    CREATE TABLE IF NOT EXISTS sessions (
        session_id INTEGER PRIMARY KEY AUTOINCREMENT,
        session_key TEXT NOT NULL UNIQUE,
        user_id INTEGER NOT NULL,
        auth_hash TEXT NOT NULL,
        created_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP,
        expires_at DATETIME NOT NULL,
        FOREIGN KEY(user_id) REFERENCES users(user_id)
    );

    CREATE INDEX IF NOT EXISTS idx_sessions_key
        ON sessions(session_key);

    CREATE TABLE IF NOT EXISTS semesters (
        semester_id INTEGER PRIMARY KEY AUTOINCREMENT,
        year INTEGER NOT NULL,
        term TEXT NOT NULL,
        UNIQUE(year, term)
    );

    CREATE TABLE IF NOT EXISTS courses (
        course_id INTEGER PRIMARY KEY AUTOINCREMENT,
        semester_id INTEGER NOT NULL,
        site_id INTEGER NOT NULL,
        meta_name TEXT NOT NULL,
        UNIQUE(semester_id, site_id, meta_name),
        FOREIGN KEY(semester_id) REFERENCES semesters(semester_id),
        FOREIGN KEY(site_id) REFERENCES sites(site_id)
    );

    CREATE TABLE IF NOT EXISTS enrollments (
        enrollment_id INTEGER PRIMARY KEY AUTOINCREMENT,
        student_id INTEGER NOT NULL,
        course_id INTEGER NOT NULL,
        UNIQUE(student_id, course_id),
        FOREIGN KEY(student_id) REFERENCES users(user_id),
        FOREIGN KEY(course_id) REFERENCES courses(course_id)
    );

    CREATE TABLE IF NOT EXISTS assignments (
        assignment_id INTEGER PRIMARY KEY AUTOINCREMENT,
        course_id INTEGER NOT NULL,
        title TEXT NOT NULL,
        FOREIGN KEY(course_id) REFERENCES courses(course_id)
    );

    CREATE TABLE IF NOT EXISTS assignment_comments (
        comment_id INTEGER PRIMARY KEY AUTOINCREMENT,
        assignment_id INTEGER NOT NULL,
        author_id INTEGER NOT NULL,
        body TEXT NOT NULL,
        created_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP,
        FOREIGN KEY(assignment_id) REFERENCES assignments(assignment_id),
        FOREIGN KEY(author_id) REFERENCES users(user_id)
    );

    CREATE TABLE IF NOT EXISTS student_profiles (
        profile_id INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id INTEGER NOT NULL,
        profile_type TEXT NOT NULL CHECK(profile_type IN ('Regular', 'Invited')),
        status TEXT NOT NULL CHECK(status IN ('Normal', 'Expelled')),
        year_of_admission INTEGER NOT NULL,
        UNIQUE(user_id, profile_type),
        FOREIGN KEY(user_id) REFERENCES users(user_id)
    );

    CREATE TABLE IF NOT EXISTS notification_types (
        type_id INTEGER PRIMARY KEY,
        code TEXT NOT NULL UNIQUE
    );
";

/// Helper row struct for PRAGMA queries.
///
/// This is a justified use of raw SQL as Diesel has no PRAGMA DSL.
#[derive(QueryableByName)]
struct PragmaRow {
    #[diesel(sql_type = Integer)]
    foreign_keys: i32,
}

/// Helper function to get the last inserted row ID.
///
/// `SQLite` doesn't support `RETURNING` clauses in all contexts,
/// so we must query `last_insert_rowid()`.
///
/// # Arguments
///
/// * `conn` - The database connection
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn get_last_insert_rowid(conn: &mut SqliteConnection) -> Result<i64, PersistenceError> {
    Ok(diesel::select(sql::<BigInt>("last_insert_rowid()")).get_result(conn)?)
}

/// Verifies that foreign key enforcement is enabled.
///
/// If foreign keys are not enabled, the database cannot guarantee the
/// referential integrity the fixture layer relies on.
///
/// # Arguments
///
/// * `conn` - The database connection to check
///
/// # Errors
///
/// Returns an error if foreign key enforcement is not enabled.
pub fn verify_foreign_key_enforcement(conn: &mut SqliteConnection) -> Result<(), PersistenceError> {
    // NOTE: PRAGMA is raw SQL (justified - Diesel has no PRAGMA DSL)
    let foreign_keys_enabled: i32 = diesel::sql_query("PRAGMA foreign_keys")
        .get_result::<PragmaRow>(conn)?
        .foreign_keys;

    if foreign_keys_enabled == 0 {
        return Err(PersistenceError::ForeignKeyEnforcementNotEnabled);
    }

    Ok(())
}

/// Initialize a `SQLite` database at the given URL and create the schema.
///
/// # Arguments
///
/// * `database_url` - The `SQLite` database URL (shared-memory URL or file path)
///
/// # Errors
///
/// Returns an error if connection or schema creation fails.
pub fn initialize_database(database_url: &str) -> Result<SqliteConnection, PersistenceError> {
    info!("Initializing SQLite database at: {}", database_url);

    let mut conn: SqliteConnection = SqliteConnection::establish(database_url)?;

    conn.batch_execute("PRAGMA foreign_keys = ON")
        .map_err(|e| PersistenceError::InitializationError(e.to_string()))?;

    conn.batch_execute(SCHEMA)
        .map_err(|e| PersistenceError::InitializationError(e.to_string()))?;

    Ok(conn)
}

/// Opens a second connection to an already-initialized database.
///
/// Live-server style tests drive HTTP requests over a connection separate
/// from the one the fixtures write through, so committed writes (not
/// transactional savepoints) are what the second connection observes.
///
/// # Arguments
///
/// * `database_url` - The database URL of the existing database
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub fn open_sibling_connection(database_url: &str) -> Result<SqliteConnection, PersistenceError> {
    let mut conn: SqliteConnection = SqliteConnection::establish(database_url)?;

    conn.batch_execute("PRAGMA foreign_keys = ON")
        .map_err(|e| PersistenceError::InitializationError(e.to_string()))?;

    verify_foreign_key_enforcement(&mut conn)?;

    Ok(conn)
}
