// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Inkpost

//! # Token Codec
//!
//! Signs and verifies bearer tokens with RS256 under two independent key
//! pairs, one per [`TokenPurpose`]. The codec is the only place key material
//! is held; callers deal in opaque token strings and [`Claims`].
//!
//! `decode_unsafe` extracts claims without checking signature or expiry. It
//! exists for exactly one caller: the refresh-reuse detection path, which
//! needs a hint of whose registry to revoke. Its output must never feed an
//! authorization decision.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

use super::claims::{Claims, TokenPurpose};
use crate::config::AuthSettings;
use crate::models::AccountId;

/// Token verification/signing failures.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TokenError {
    /// Structurally invalid encoding
    #[error("token is malformed")]
    Malformed,
    /// Signed under the wrong key, or payload tampered
    #[error("token signature is invalid")]
    SignatureInvalid,
    /// Past its expiry
    #[error("token has expired")]
    Expired,
    /// Key material rejected at construction or signing time
    #[error("token key error: {0}")]
    InvalidKey(String),
}

struct PurposeKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl PurposeKeys {
    fn new(private_pem: &str, public_pem: &str, ttl_seconds: i64) -> Result<Self, TokenError> {
        Ok(Self {
            encoding: EncodingKey::from_rsa_pem(private_pem.as_bytes())
                .map_err(|e| TokenError::InvalidKey(e.to_string()))?,
            decoding: DecodingKey::from_rsa_pem(public_pem.as_bytes())
                .map_err(|e| TokenError::InvalidKey(e.to_string()))?,
            ttl: Duration::seconds(ttl_seconds),
        })
    }
}

/// RS256 signer/verifier over the two token purposes.
pub struct TokenCodec {
    access: PurposeKeys,
    refresh: PurposeKeys,
}

impl TokenCodec {
    /// Build a codec from loaded settings.
    ///
    /// Fails fast on unparseable key material so a misconfigured deployment
    /// never starts serving.
    pub fn new(settings: &AuthSettings) -> Result<Self, TokenError> {
        Ok(Self {
            access: PurposeKeys::new(
                &settings.access_private_pem,
                &settings.access_public_pem,
                settings.access_ttl_seconds,
            )?,
            refresh: PurposeKeys::new(
                &settings.refresh_private_pem,
                &settings.refresh_public_pem,
                settings.refresh_ttl_seconds,
            )?,
        })
    }

    fn keys(&self, purpose: TokenPurpose) -> &PurposeKeys {
        match purpose {
            TokenPurpose::Access => &self.access,
            TokenPurpose::Refresh => &self.refresh,
        }
    }

    /// Sign a token for `subject` under the given purpose's private key.
    ///
    /// Embeds the current instant as `iat`; expiry is `iat` plus the
    /// configured TTL for the purpose.
    pub fn sign(&self, subject: &AccountId, purpose: TokenPurpose) -> Result<String, TokenError> {
        let keys = self.keys(purpose);
        let now = Utc::now();
        let claims = Claims {
            sub: subject.to_string(),
            jti: uuid::Uuid::new_v4().to_string(),
            iat: now.timestamp(),
            exp: (now + keys.ttl).timestamp(),
        };
        encode(&Header::new(Algorithm::RS256), &claims, &keys.encoding)
            .map_err(|e| TokenError::InvalidKey(e.to_string()))
    }

    /// Verify a token under the given purpose's public key.
    ///
    /// Rejects tokens signed under any other key (including the sibling
    /// purpose's), structurally invalid tokens, and expired tokens.
    pub fn verify(&self, token: &str, purpose: TokenPurpose) -> Result<Claims, TokenError> {
        let mut validation = Validation::new(Algorithm::RS256);
        validation.validate_aud = false;

        decode::<Claims>(token, &self.keys(purpose).decoding, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenError::Expired,
                jsonwebtoken::errors::ErrorKind::InvalidSignature => TokenError::SignatureInvalid,
                _ => TokenError::Malformed,
            })
    }

    /// Extract claims without checking signature or expiry.
    ///
    /// The result identifies a *claimed* subject only. It is used solely to
    /// pick the revoke-all target when a retired refresh token resurfaces.
    pub fn decode_unsafe(&self, token: &str) -> Option<Claims> {
        jsonwebtoken::dangerous::insecure_decode::<Claims>(token)
            .ok()
            .map(|data| data.claims)
    }
}
