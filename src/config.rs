// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Inkpost

//! # Runtime Configuration
//!
//! This module defines environment variable names, default values, and the
//! loader for token-signing configuration. Configuration is loaded from the
//! environment at startup.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `ACCESS_TOKEN_PRIVATE_KEY` | Base64-encoded RSA private key PEM (access purpose) | Required |
//! | `ACCESS_TOKEN_PUBLIC_KEY` | Base64-encoded RSA public key PEM (access purpose) | Required |
//! | `REFRESH_TOKEN_PRIVATE_KEY` | Base64-encoded RSA private key PEM (refresh purpose) | Required |
//! | `REFRESH_TOKEN_PUBLIC_KEY` | Base64-encoded RSA public key PEM (refresh purpose) | Required |
//! | `ACCESS_TOKEN_TTL_SECONDS` | Access token lifetime | `900` |
//! | `REFRESH_TOKEN_TTL_SECONDS` | Refresh token lifetime | `86400` |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |
//!
//! The access and refresh purposes must use distinct key pairs; a token
//! signed for one purpose never verifies under the other's key.

use std::env;

use base64ct::{Base64, Encoding};

/// Environment variable names for the four key inputs.
pub const ACCESS_PRIVATE_KEY_ENV: &str = "ACCESS_TOKEN_PRIVATE_KEY";
pub const ACCESS_PUBLIC_KEY_ENV: &str = "ACCESS_TOKEN_PUBLIC_KEY";
pub const REFRESH_PRIVATE_KEY_ENV: &str = "REFRESH_TOKEN_PRIVATE_KEY";
pub const REFRESH_PUBLIC_KEY_ENV: &str = "REFRESH_TOKEN_PUBLIC_KEY";

/// Environment variable names for token lifetimes.
pub const ACCESS_TTL_ENV: &str = "ACCESS_TOKEN_TTL_SECONDS";
pub const REFRESH_TTL_ENV: &str = "REFRESH_TOKEN_TTL_SECONDS";

/// Default access token lifetime (15 minutes).
pub const DEFAULT_ACCESS_TTL_SECONDS: i64 = 900;

/// Default refresh token lifetime (24 hours).
pub const DEFAULT_REFRESH_TTL_SECONDS: i64 = 86_400;

/// Errors raised while loading configuration from the environment.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("environment variable {0} is not valid base64")]
    InvalidBase64(&'static str),

    #[error("environment variable {0} is not valid UTF-8 PEM")]
    InvalidPem(&'static str),

    #[error("environment variable {0} is not a valid number")]
    InvalidNumber(&'static str),
}

/// Token-signing configuration: two independent RSA key pairs plus lifetimes.
#[derive(Debug, Clone)]
pub struct AuthSettings {
    /// PEM-encoded RSA private key for signing access tokens.
    pub access_private_pem: String,
    /// PEM-encoded RSA public key for verifying access tokens.
    pub access_public_pem: String,
    /// PEM-encoded RSA private key for signing refresh tokens.
    pub refresh_private_pem: String,
    /// PEM-encoded RSA public key for verifying refresh tokens.
    pub refresh_public_pem: String,
    /// Access token lifetime in seconds.
    pub access_ttl_seconds: i64,
    /// Refresh token lifetime in seconds.
    pub refresh_ttl_seconds: i64,
}

impl AuthSettings {
    /// Load settings from the environment.
    ///
    /// Keys are provided base64-encoded so PEM newlines survive environment
    /// injection (docker-compose, systemd unit files, CI secrets).
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            access_private_pem: pem_from_env(ACCESS_PRIVATE_KEY_ENV)?,
            access_public_pem: pem_from_env(ACCESS_PUBLIC_KEY_ENV)?,
            refresh_private_pem: pem_from_env(REFRESH_PRIVATE_KEY_ENV)?,
            refresh_public_pem: pem_from_env(REFRESH_PUBLIC_KEY_ENV)?,
            access_ttl_seconds: ttl_from_env(ACCESS_TTL_ENV, DEFAULT_ACCESS_TTL_SECONDS)?,
            refresh_ttl_seconds: ttl_from_env(REFRESH_TTL_ENV, DEFAULT_REFRESH_TTL_SECONDS)?,
        })
    }
}

fn pem_from_env(name: &'static str) -> Result<String, ConfigError> {
    let encoded = env::var(name).map_err(|_| ConfigError::MissingVar(name))?;
    let decoded =
        Base64::decode_vec(encoded.trim()).map_err(|_| ConfigError::InvalidBase64(name))?;
    String::from_utf8(decoded).map_err(|_| ConfigError::InvalidPem(name))
}

fn ttl_from_env(name: &'static str, default: i64) -> Result<i64, ConfigError> {
    match env::var(name) {
        Ok(value) => value
            .trim()
            .parse::<i64>()
            .map_err(|_| ConfigError::InvalidNumber(name)),
        Err(_) => Ok(default),
    }
}
