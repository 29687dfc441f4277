// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Role grant mutations.

use diesel::prelude::*;
use tracing::debug;

use crate::diesel_schema::user_roles;
use crate::error::PersistenceError;

/// Grants a role to a user on a site.
///
/// The grant is an idempotent upsert keyed by (user, site, role): granting
/// a role the user already holds is a no-op, never a duplicate row and
/// never a constraint violation.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `user_id` - The user ID
/// * `site_id` - The site scoping the grant
/// * `role` - The role string (validated by the CHECK constraint)
///
/// # Errors
///
/// Returns an error if the insert fails for a reason other than the
/// (user, site, role) uniqueness conflict.
pub fn grant_role(
    conn: &mut SqliteConnection,
    user_id: i64,
    site_id: i64,
    role: &str,
) -> Result<(), PersistenceError> {
    debug!(user_id, site_id, role, "Granting role");

    diesel::insert_into(user_roles::table)
        .values((
            user_roles::user_id.eq(user_id),
            user_roles::site_id.eq(site_id),
            user_roles::role.eq(role),
        ))
        .on_conflict((user_roles::user_id, user_roles::site_id, user_roles::role))
        .do_nothing()
        .execute(conn)?;

    Ok(())
}

/// Revokes a role grant.
///
/// Absent grants are tolerated so teardown paths stay idempotent too.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `user_id` - The user ID
/// * `site_id` - The site scoping the grant
/// * `role` - The role string
///
/// # Errors
///
/// Returns an error if the delete fails.
pub fn revoke_role(
    conn: &mut SqliteConnection,
    user_id: i64,
    site_id: i64,
    role: &str,
) -> Result<(), PersistenceError> {
    debug!(user_id, site_id, role, "Revoking role");

    diesel::delete(user_roles::table)
        .filter(user_roles::user_id.eq(user_id))
        .filter(user_roles::site_id.eq(site_id))
        .filter(user_roles::role.eq(role))
        .execute(conn)?;

    Ok(())
}
