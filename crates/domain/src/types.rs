// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Role grants scoped to a site.
///
/// A role grant connects a user to a site with one of these roles. Grants
/// are idempotent upserts keyed by (user, site, role); granting the same
/// role twice must not create a duplicate row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// Student role: may view assignments and submit comments.
    Student,
    /// Teacher role: owns courses and reviews submissions.
    Teacher,
    /// Curator role: site-wide administrative access.
    Curator,
}

impl FromStr for Role {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Student" => Ok(Self::Student),
            "Teacher" => Ok(Self::Teacher),
            "Curator" => Ok(Self::Curator),
            _ => Err(DomainError::InvalidRole(s.to_string())),
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Role {
    /// Converts this role to its string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Student => "Student",
            Self::Teacher => "Teacher",
            Self::Curator => "Curator",
        }
    }
}

/// Classification of a student profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum StudentType {
    /// Regular student admitted through the standard intake.
    #[default]
    Regular,
    /// Invited student (demo and partner-program accounts).
    Invited,
}

impl FromStr for StudentType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Regular" => Ok(Self::Regular),
            "Invited" => Ok(Self::Invited),
            _ => Err(DomainError::InvalidStudentType(s.to_string())),
        }
    }
}

impl std::fmt::Display for StudentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl StudentType {
    /// Converts this student type to its string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Regular => "Regular",
            Self::Invited => "Invited",
        }
    }
}

/// Lifecycle status of a student profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum StudentStatus {
    /// Active student in good standing.
    #[default]
    Normal,
    /// Student removed from the program.
    Expelled,
}

impl FromStr for StudentStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Normal" => Ok(Self::Normal),
            "Expelled" => Ok(Self::Expelled),
            _ => Err(DomainError::InvalidStudentStatus(s.to_string())),
        }
    }
}

impl std::fmt::Display for StudentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl StudentStatus {
    /// Converts this student status to its string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Normal => "Normal",
            Self::Expelled => "Expelled",
        }
    }
}

/// Gender of a user record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Gender {
    /// Male.
    Male,
    /// Female.
    Female,
    /// Not specified; the default for seeded accounts.
    #[default]
    Other,
}

impl FromStr for Gender {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Male" => Ok(Self::Male),
            "Female" => Ok(Self::Female),
            "Other" => Ok(Self::Other),
            _ => Err(DomainError::InvalidGender(s.to_string())),
        }
    }
}

impl std::fmt::Display for Gender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Gender {
    /// Converts this gender to its string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Male => "Male",
            Self::Female => "Female",
            Self::Other => "Other",
        }
    }
}
