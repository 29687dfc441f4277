// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! `ensure_testaccounts` - demo-account reconciliation.
//!
//! Converges the database on a fixed table of demo accounts: core fields
//! upserted, password reset to the fixed demo constant, role grants and
//! profiles ensured idempotently. Accounts outside the table are never
//! touched, let alone deleted.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]
#![allow(clippy::multiple_crate_versions)]

use clap::Parser;
use studium_domain::{Gender, Role, StudentStatus, StudentType, validate_username};
use studium_fixtures::{TEST_DOMAIN, TEST_DOMAIN_ID};
use studium_persistence::{NewUser, SqlitePersistence, UserProfileUpdate};
use tracing::{debug, info};

/// The password every demo account is reset to.
const DEMO_PASSWORD: &str = "Keklol123";

/// One row of the fixed demo-account table.
struct DemoAccount {
    username: &'static str,
    first_name: &'static str,
    last_name: &'static str,
    is_staff: bool,
    is_superuser: bool,
    roles: &'static [Role],
    invited_student_profile: bool,
}

/// The fixed demo-account table. Reconciliation never deletes anything,
/// so accounts outside this table survive untouched.
const DEMO_ACCOUNTS: &[DemoAccount] = &[
    DemoAccount {
        username: "microvanuta",
        first_name: "Micro",
        last_name: "Vanuta",
        is_staff: true,
        is_superuser: true,
        roles: &[Role::Curator],
        invited_student_profile: false,
    },
    DemoAccount {
        username: "microstudent",
        first_name: "Micro",
        last_name: "Student",
        is_staff: false,
        is_superuser: false,
        roles: &[Role::Student],
        invited_student_profile: true,
    },
];

/// Ensure Test Accounts - reconciles the fixed demo accounts
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the `SQLite` database file. If not provided, uses in-memory database.
    #[arg(short, long)]
    database: Option<String>,
}

/// Reconciles one account: upsert core fields, reset password, ensure
/// role grants and the student profile where flagged.
fn reconcile_account(
    persistence: &mut SqlitePersistence,
    account: &DemoAccount,
) -> Result<(), Box<dyn std::error::Error>> {
    validate_username(account.username)?;
    let email = format!("{}@{TEST_DOMAIN}", account.username);

    let user_id = match persistence.get_user_by_username(account.username)? {
        Some(user) => {
            debug!(username = account.username, "Normalizing existing account");
            persistence.update_user_profile(
                user.user_id,
                &UserProfileUpdate {
                    email,
                    first_name: account.first_name.to_string(),
                    last_name: account.last_name.to_string(),
                    gender: Gender::Other.as_str().to_string(),
                    is_staff: account.is_staff,
                    is_superuser: account.is_superuser,
                    is_active: true,
                },
            )?;
            user.user_id
        }
        None => {
            info!(username = account.username, "Creating demo account");
            persistence.create_user(&NewUser {
                username: account.username.to_string(),
                email,
                first_name: account.first_name.to_string(),
                last_name: account.last_name.to_string(),
                gender: Gender::Other.as_str().to_string(),
                is_staff: account.is_staff,
                is_superuser: account.is_superuser,
                password: DEMO_PASSWORD.to_string(),
            })?
        }
    };

    persistence.set_password(user_id, DEMO_PASSWORD)?;

    for role in account.roles {
        persistence.grant_role(user_id, TEST_DOMAIN_ID, role.as_str())?;
    }

    if account.invited_student_profile {
        persistence.upsert_student_profile(
            user_id,
            StudentType::Invited.as_str(),
            StudentStatus::Normal.as_str(),
            2026,
        )?;
    }

    Ok(())
}

/// Reconciles the whole demo table, returning the number of accounts.
fn ensure_testaccounts(
    persistence: &mut SqlitePersistence,
) -> Result<usize, Box<dyn std::error::Error>> {
    // The role grants reference the primary site; make sure it exists
    // without disturbing anything else in the database.
    if persistence.get_site_by_id(TEST_DOMAIN_ID)?.is_none() {
        persistence.upsert_site(TEST_DOMAIN_ID, TEST_DOMAIN, TEST_DOMAIN)?;
    }

    for account in DEMO_ACCOUNTS {
        reconcile_account(persistence, account)?;
    }

    Ok(DEMO_ACCOUNTS.len())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let mut persistence: SqlitePersistence = if let Some(db_path) = &args.database {
        info!("Using file-based database at: {}", db_path);
        SqlitePersistence::new_with_file(db_path)?
    } else {
        info!("Using in-memory database");
        SqlitePersistence::new_in_memory()?
    };

    let count = ensure_testaccounts(&mut persistence)?;

    println!("Ensured {count} test accounts exist (password reset to '{DEMO_PASSWORD}').");

    Ok(())
}
