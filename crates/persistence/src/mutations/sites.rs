// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Site and notification-type mutations.
//!
//! Baseline repopulation forces stable site IDs so every test run sees the
//! same tenants; the autoincrement sequence is reset afterwards so later
//! factory-created sites do not collide with the forced IDs.

use diesel::prelude::*;
use tracing::{debug, info};

use crate::diesel_schema::{notification_types, sites};
use crate::error::PersistenceError;

/// Upserts a site with a forced ID.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `site_id` - The forced site ID
/// * `domain` - The site domain (unique)
/// * `name` - The human-readable site name
///
/// # Errors
///
/// Returns an error if the upsert fails.
pub fn upsert_site(
    conn: &mut SqliteConnection,
    site_id: i64,
    domain: &str,
    name: &str,
) -> Result<(), PersistenceError> {
    info!(site_id, domain, "Upserting site");

    diesel::insert_into(sites::table)
        .values((
            sites::site_id.eq(site_id),
            sites::domain.eq(domain),
            sites::name.eq(name),
        ))
        .on_conflict(sites::site_id)
        .do_update()
        .set((sites::domain.eq(domain), sites::name.eq(name)))
        .execute(conn)?;

    Ok(())
}

/// Resets the `sites` autoincrement sequence to the current maximum ID.
///
/// Required after inserting rows with forced IDs: without the reset, a
/// later autoincrement insert can be handed an ID that is already taken.
///
/// # Arguments
///
/// * `conn` - The database connection
///
/// # Errors
///
/// Returns an error if the sequence update fails.
pub fn reset_site_sequence(conn: &mut SqliteConnection) -> Result<(), PersistenceError> {
    debug!("Resetting sites autoincrement sequence");

    // NOTE: sqlite_sequence is raw SQL (justified - Diesel has no DSL for it)
    diesel::sql_query(
        "UPDATE sqlite_sequence
         SET seq = (SELECT COALESCE(MAX(site_id), 0) FROM sites)
         WHERE name = 'sites'",
    )
    .execute(conn)?;

    Ok(())
}

/// Upserts a notification-type lookup row with a forced ID.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `type_id` - The forced type ID
/// * `code` - The notification-type code
///
/// # Errors
///
/// Returns an error if the upsert fails.
pub fn upsert_notification_type(
    conn: &mut SqliteConnection,
    type_id: i64,
    code: &str,
) -> Result<(), PersistenceError> {
    debug!(type_id, code, "Upserting notification type");

    diesel::insert_into(notification_types::table)
        .values((
            notification_types::type_id.eq(type_id),
            notification_types::code.eq(code),
        ))
        .on_conflict(notification_types::type_id)
        .do_update()
        .set(notification_types::code.eq(code))
        .execute(conn)?;

    Ok(())
}
