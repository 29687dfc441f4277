// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

/// Errors that can occur during domain validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Username is empty or contains disallowed characters.
    InvalidUsername(String),
    /// Email address is missing required structure.
    InvalidEmail(String),
    /// Role string does not name a known role.
    InvalidRole(String),
    /// Student type string does not name a known type.
    InvalidStudentType(String),
    /// Student status string does not name a known status.
    InvalidStudentStatus(String),
    /// Gender string does not name a known gender.
    InvalidGender(String),
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidUsername(msg) => write!(f, "Invalid username: {msg}"),
            Self::InvalidEmail(msg) => write!(f, "Invalid email: {msg}"),
            Self::InvalidRole(value) => write!(f, "Invalid role: {value}"),
            Self::InvalidStudentType(value) => write!(f, "Invalid student type: {value}"),
            Self::InvalidStudentStatus(value) => {
                write!(f, "Invalid student status: {value}")
            }
            Self::InvalidGender(value) => write!(f, "Invalid gender: {value}"),
        }
    }
}

impl std::error::Error for DomainError {}
