// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;

/// Maximum length of a username, matching the `users.username` column.
const MAX_USERNAME_LEN: usize = 150;

/// Validates a username for seeding and account reconciliation.
///
/// Usernames are natural keys for the idempotent seeding protocol, so they
/// must be non-empty, bounded, and restricted to a stable character set.
///
/// # Arguments
///
/// * `username` - The username to validate
///
/// # Errors
///
/// Returns an error if:
/// - The username is empty
/// - The username exceeds 150 characters
/// - The username contains characters outside `[A-Za-z0-9@.+_-]`
pub fn validate_username(username: &str) -> Result<(), DomainError> {
    if username.is_empty() {
        return Err(DomainError::InvalidUsername(String::from(
            "Username cannot be empty",
        )));
    }

    if username.len() > MAX_USERNAME_LEN {
        return Err(DomainError::InvalidUsername(format!(
            "Username must be at most {MAX_USERNAME_LEN} characters"
        )));
    }

    let valid_chars = |c: char| c.is_ascii_alphanumeric() || matches!(c, '@' | '.' | '+' | '_' | '-');
    if !username.chars().all(valid_chars) {
        return Err(DomainError::InvalidUsername(format!(
            "Username may only contain letters, digits, and @.+_- (got '{username}')"
        )));
    }

    Ok(())
}

/// Validates an email address for seeding and account reconciliation.
///
/// This is deliberately shallow: the harness never delivers mail, it only
/// needs addresses that the application's own form layer would accept.
///
/// # Arguments
///
/// * `email` - The email address to validate
///
/// # Errors
///
/// Returns an error if the address is empty or lacks an `@` with a
/// non-empty local part and domain.
pub fn validate_email(email: &str) -> Result<(), DomainError> {
    if email.is_empty() {
        return Err(DomainError::InvalidEmail(String::from(
            "Email cannot be empty",
        )));
    }

    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && domain.contains('.') => Ok(()),
        _ => Err(DomainError::InvalidEmail(format!(
            "Email must look like 'user@host.tld' (got '{email}')"
        ))),
    }
}
