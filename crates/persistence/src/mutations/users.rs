// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! User mutations.

use diesel::prelude::*;
use tracing::{debug, info};

use crate::data_models::{NewUser, UserProfileUpdate};
use crate::diesel_schema::users;
use crate::error::PersistenceError;
use crate::schema_init::get_last_insert_rowid;

/// Creates a new user.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `new_user` - The field values; the plain-text password is hashed with
///   bcrypt before it touches the database
///
/// # Errors
///
/// Returns an error if the user cannot be created or if the username
/// already exists.
pub fn create_user(conn: &mut SqliteConnection, new_user: &NewUser) -> Result<i64, PersistenceError> {
    info!(username = %new_user.username, "Creating user");

    let password_hash: String = bcrypt::hash(&new_user.password, bcrypt::DEFAULT_COST)
        .map_err(|e| PersistenceError::Other(format!("Failed to hash password: {e}")))?;

    diesel::insert_into(users::table)
        .values((
            users::username.eq(&new_user.username),
            users::email.eq(&new_user.email),
            users::first_name.eq(&new_user.first_name),
            users::last_name.eq(&new_user.last_name),
            users::gender.eq(&new_user.gender),
            users::is_staff.eq(i32::from(new_user.is_staff)),
            users::is_superuser.eq(i32::from(new_user.is_superuser)),
            users::is_active.eq(1),
            users::password_hash.eq(&password_hash),
        ))
        .execute(conn)?;

    let user_id: i64 = get_last_insert_rowid(conn)?;

    info!(user_id, "User created successfully");

    Ok(user_id)
}

/// Normalizes a user's mutable core fields to the given values.
///
/// This is the "unconditional update" half of the update-or-create pattern:
/// it never touches the username (the natural key) or the password.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `user_id` - The user ID
/// * `update` - The desired field values
///
/// # Errors
///
/// Returns an error if the user does not exist or the update fails.
pub fn update_user_profile(
    conn: &mut SqliteConnection,
    user_id: i64,
    update: &UserProfileUpdate,
) -> Result<(), PersistenceError> {
    debug!(user_id, "Normalizing user core fields");

    let rows_affected: usize = diesel::update(users::table)
        .filter(users::user_id.eq(user_id))
        .set((
            users::email.eq(&update.email),
            users::first_name.eq(&update.first_name),
            users::last_name.eq(&update.last_name),
            users::gender.eq(&update.gender),
            users::is_staff.eq(i32::from(update.is_staff)),
            users::is_superuser.eq(i32::from(update.is_superuser)),
            users::is_active.eq(i32::from(update.is_active)),
        ))
        .execute(conn)?;

    if rows_affected == 0 {
        return Err(PersistenceError::UserNotFound(format!(
            "User with ID {user_id} not found"
        )));
    }

    Ok(())
}

/// Resets a user's password to the given plain-text value.
///
/// The seeding protocol calls this unconditionally on every run so reused
/// databases always hold the known test credential. Rotating the password
/// also invalidates outstanding sessions, whose auth-hash was derived from
/// the previous password hash.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `user_id` - The user ID
/// * `password` - The plain-text password (will be hashed)
///
/// # Errors
///
/// Returns an error if the user does not exist or hashing fails.
pub fn set_password(
    conn: &mut SqliteConnection,
    user_id: i64,
    password: &str,
) -> Result<(), PersistenceError> {
    debug!(user_id, "Resetting password");

    let password_hash: String = bcrypt::hash(password, bcrypt::DEFAULT_COST)
        .map_err(|e| PersistenceError::Other(format!("Failed to hash password: {e}")))?;

    let rows_affected: usize = diesel::update(users::table)
        .filter(users::user_id.eq(user_id))
        .set(users::password_hash.eq(&password_hash))
        .execute(conn)?;

    if rows_affected == 0 {
        return Err(PersistenceError::UserNotFound(format!(
            "User with ID {user_id} not found"
        )));
    }

    Ok(())
}
