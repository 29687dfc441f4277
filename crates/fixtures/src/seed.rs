// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Idempotent seeding.
//!
//! `ensure_student` converges: however many times it runs, and across
//! process restarts sharing one database file, there is exactly one user
//! row per logical username afterwards, its password reset to the known
//! constant and its role grant in place. Concurrent calls for the same
//! username are not guarded; the runner is single-writer, and the unique
//! constraint turns a lost race into a loud failure instead of a
//! duplicate row.

use studium_domain::{Role, validate_username};
use studium_persistence::{SqlitePersistence, UserData};
use tracing::{debug, info};

use crate::error::FixtureError;
use crate::factories::UserFactory;

/// The password every ensured test account ends up with.
pub const TEST_PASSWORD: &str = "test123foobar@!";

/// Domain of the primary baseline site (forced ID 1).
pub const TEST_DOMAIN: &str = "studium.test";

/// Domain of the secondary baseline site (forced ID 2).
pub const ANOTHER_DOMAIN: &str = "another.studium.test";

/// Forced ID of the primary baseline site.
pub const TEST_DOMAIN_ID: i64 = 1;

/// Forced ID of the secondary baseline site.
pub const ANOTHER_DOMAIN_ID: i64 = 2;

/// Notification-type lookup rows the application expects to exist.
const NOTIFICATION_TYPES: &[(i64, &str)] = &[
    (1, "LOG"),
    (2, "EMAIL"),
    (3, "WEB"),
];

/// Ensures a student account exists with the test password and role.
///
/// Lookup by username; factory-create on miss; unconditional password
/// reset; idempotent `Student` role grant on the given site. The password
/// reset happens even when the row already existed, so a stale hash from
/// an earlier run can never leak into a scenario.
///
/// # Errors
///
/// Returns an error if the username fails validation or any persistence
/// step fails.
pub fn ensure_student(
    persistence: &mut SqlitePersistence,
    site_id: i64,
    username: &str,
) -> Result<UserData, FixtureError> {
    validate_username(username)?;

    let user_id = persistence.get_user_by_username(username)?.map_or_else(
        || {
            info!(username, "Creating student");
            UserFactory::new()
                .username(username)
                .create(persistence)
                .map(|user| user.user_id)
        },
        |user| {
            debug!(username, "Student already present");
            Ok(user.user_id)
        },
    )?;

    persistence.set_password(user_id, TEST_PASSWORD)?;
    persistence.grant_role(user_id, site_id, Role::Student.as_str())?;

    persistence
        .get_user_by_id(user_id)?
        .ok_or_else(|| FixtureError::UserVanished(username.to_string()))
}

/// Restores the baseline rows every scenario assumes exist.
///
/// In one committed transaction: wipes course-linked rows, upserts the two
/// fixed sites with forced IDs, resets the `sites` autoincrement sequence
/// (forced-ID inserts leave it behind the MAX otherwise), and upserts the
/// notification-type lookup rows.
///
/// # Errors
///
/// Returns an error if any step fails; nothing is committed.
pub fn repopulate_baseline(persistence: &mut SqlitePersistence) -> Result<(), FixtureError> {
    info!("Repopulating baseline sites and lookup tables");

    persistence.repopulate_baseline(
        &[
            (TEST_DOMAIN_ID, TEST_DOMAIN, TEST_DOMAIN),
            (ANOTHER_DOMAIN_ID, ANOTHER_DOMAIN, ANOTHER_DOMAIN),
        ],
        NOTIFICATION_TYPES,
    )?;

    Ok(())
}
