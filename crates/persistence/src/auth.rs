// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Session tamper-detection hash.
//!
//! Both the login flow and the session-injection protocol mint sessions;
//! the hash construction lives here so the two can never drift apart.

use sha2::{Digest, Sha256};

/// Computes the session auth-hash for a stored password hash.
///
/// The hash is bound to the credential: rotating the password changes the
/// stored bcrypt hash, so every session minted before the rotation stops
/// validating.
#[must_use]
pub fn session_auth_hash(password_hash: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(password_hash.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::session_auth_hash;

    #[test]
    fn test_hash_is_hex_sha256() {
        let hash = session_auth_hash("$2b$04$abcdefgh");
        assert_eq!(hash.len(), 64);
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_different_password_hashes_diverge() {
        assert_ne!(session_auth_hash("one"), session_auth_hash("two"));
    }
}
