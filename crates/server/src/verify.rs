// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Verification checkpoints and the bypass shim.
//!
//! The login flow consults a named checkpoint before touching
//! credentials. Production registers [`ChallengeVerification`], a
//! fixed-token check standing in for an external bot-check; the harness
//! calls [`VerificationRegistry::bypass_all`] to swap every known
//! checkpoint for [`AlwaysPass`] so scenarios never solve challenges.

use std::collections::HashMap;

use tracing::{debug, warn};

/// Every checkpoint name the application consults.
///
/// `bypass_all` walks this list, so a checkpoint that was never
/// registered is still overridden rather than skipped.
pub const KNOWN_CHECKPOINTS: &[&str] = &["login_form", "api_login"];

/// A pluggable verification check.
pub trait VerificationCheck: Send + Sync {
    /// Checks a submitted verification token.
    fn verify(&self, token: Option<&str>) -> bool;
}

/// Fixed-token verification, the production check.
pub struct ChallengeVerification {
    expected: String,
}

impl ChallengeVerification {
    /// Creates a check expecting the given token.
    #[must_use]
    pub fn new(expected: &str) -> Self {
        Self {
            expected: expected.to_string(),
        }
    }
}

impl VerificationCheck for ChallengeVerification {
    fn verify(&self, token: Option<&str>) -> bool {
        token == Some(self.expected.as_str())
    }
}

/// A check that accepts everything. The bypass shim.
pub struct AlwaysPass;

impl VerificationCheck for AlwaysPass {
    fn verify(&self, _token: Option<&str>) -> bool {
        true
    }
}

/// One verification slot per named checkpoint.
#[derive(Default)]
pub struct VerificationRegistry {
    slots: HashMap<String, Box<dyn VerificationCheck>>,
}

impl VerificationRegistry {
    /// Creates an empty registry. Unregistered checkpoints pass.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry with the challenge check on every checkpoint.
    #[must_use]
    pub fn with_challenge(token: &str) -> Self {
        let mut registry = Self::new();
        for checkpoint in KNOWN_CHECKPOINTS {
            registry.register(checkpoint, Box::new(ChallengeVerification::new(token)));
        }
        registry
    }

    /// Installs a check on a checkpoint, replacing any existing one.
    pub fn register(&mut self, checkpoint: &str, check: Box<dyn VerificationCheck>) {
        self.slots.insert(checkpoint.to_string(), check);
    }

    /// Runs the checkpoint's check against a submitted token.
    ///
    /// A checkpoint with no registered check passes; the checkpoint
    /// existing at all is an application decision, not a registry one.
    #[must_use]
    pub fn check(&self, checkpoint: &str, token: Option<&str>) -> bool {
        self.slots.get(checkpoint).map_or_else(
            || {
                debug!(checkpoint, "No verification registered; passing");
                true
            },
            |check| {
                let passed = check.verify(token);
                if !passed {
                    warn!(checkpoint, "Verification failed");
                }
                passed
            },
        )
    }

    /// Overrides every known checkpoint with [`AlwaysPass`].
    ///
    /// Checkpoints that were never registered are overridden too, so the
    /// bypass holds even when the application wires up a new check before
    /// the harness learns about it.
    pub fn bypass_all(&mut self) {
        for checkpoint in KNOWN_CHECKPOINTS {
            self.register(checkpoint, Box::new(AlwaysPass));
        }
    }
}
