// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use studium_domain::DomainError;
use studium_persistence::PersistenceError;

/// Errors that can occur while building fixtures or injecting sessions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FixtureError {
    /// The underlying persistence operation failed.
    Persistence(PersistenceError),
    /// A username or email failed domain validation.
    Validation(DomainError),
    /// A timestamp could not be formatted.
    TimestampFormat(String),
    /// A user that was just ensured could not be read back.
    UserVanished(String),
}

impl std::fmt::Display for FixtureError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Persistence(err) => write!(f, "Persistence error: {err}"),
            Self::Validation(err) => write!(f, "Validation error: {err}"),
            Self::TimestampFormat(msg) => write!(f, "Timestamp formatting failed: {msg}"),
            Self::UserVanished(username) => {
                write!(f, "User '{username}' vanished after being ensured")
            }
        }
    }
}

impl std::error::Error for FixtureError {}

impl From<PersistenceError> for FixtureError {
    fn from(err: PersistenceError) -> Self {
        Self::Persistence(err)
    }
}

impl From<DomainError> for FixtureError {
    fn from(err: DomainError) -> Self {
        Self::Validation(err)
    }
}
