// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Inkpost

//! Password hashing with Argon2id.
//!
//! Hashing and verification are CPU-bound, so both hop to the blocking pool;
//! a burst of logins must not stall unrelated requests on the async runtime.

use argon2::password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, SaltString};
use argon2::{Argon2, PasswordVerifier};

/// Password hashing failures. These are infrastructure errors, not part of
/// the credential taxonomy; callers surface them as a generic 500.
#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    #[error("password hashing failed: {0}")]
    Hash(String),

    #[error("hashing task was cancelled")]
    TaskJoin,
}

/// Hash a plaintext password into an Argon2id PHC string with a fresh salt.
pub async fn hash_password(password: String) -> Result<String, PasswordError> {
    tokio::task::spawn_blocking(move || {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| PasswordError::Hash(e.to_string()))
    })
    .await
    .map_err(|_| PasswordError::TaskJoin)?
}

/// Verify a candidate password against a stored PHC string.
///
/// A mismatch is `Ok(false)`; only an unparseable stored hash or a crashed
/// worker is an error.
pub async fn verify_password(password: String, hash: String) -> Result<bool, PasswordError> {
    tokio::task::spawn_blocking(move || {
        let parsed = PasswordHash::new(&hash).map_err(|e| PasswordError::Hash(e.to_string()))?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok())
    })
    .await
    .map_err(|_| PasswordError::TaskJoin)?
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn hash_and_verify_round_trip() {
        let hash = hash_password("correct horse".to_string()).await.unwrap();
        assert!(hash.starts_with("$argon2id$"));

        assert!(verify_password("correct horse".to_string(), hash.clone())
            .await
            .unwrap());
        assert!(!verify_password("wrong horse".to_string(), hash)
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn same_password_hashes_differently() {
        let first = hash_password("hunter2".to_string()).await.unwrap();
        let second = hash_password("hunter2".to_string()).await.unwrap();
        // Fresh salt per hash.
        assert_ne!(first, second);
    }

    #[tokio::test]
    async fn unparseable_stored_hash_is_an_error() {
        let result = verify_password("pw".to_string(), "not-a-phc-string".to_string()).await;
        assert!(matches!(result, Err(PasswordError::Hash(_))));
    }
}
