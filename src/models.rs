// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Inkpost

//! # API Data Models
//!
//! This module defines the request and response data structures used by
//! the REST API. All types derive `Serialize`, `Deserialize`, and `ToSchema`
//! for automatic JSON handling and OpenAPI documentation.
//!
//! ## Account ID Type
//!
//! The [`AccountId`] newtype wraps the UUID string that identifies an
//! account. It is the `sub` claim of every issued token and the key of the
//! account record store.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// =============================================================================
// Account ID Type
// =============================================================================

/// Opaque account identifier (UUID string).
///
/// Provides type safety for account identifiers throughout the API and the
/// credential subsystem.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AccountId(pub String);

impl AccountId {
    /// Generate a fresh random account identifier.
    pub fn generate() -> Self {
        AccountId(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for AccountId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<String> for AccountId {
    fn from(value: String) -> Self {
        AccountId(value)
    }
}

impl From<&str> for AccountId {
    fn from(value: &str) -> Self {
        AccountId(value.to_string())
    }
}

impl From<AccountId> for String {
    fn from(value: AccountId) -> Self {
        value.0
    }
}

// =============================================================================
// Auth Requests
// =============================================================================

/// Request body for account registration.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RegisterRequest {
    /// Given name (also seeds the generated username).
    pub first_name: String,
    /// Family name (also seeds the generated username).
    pub last_name: String,
    /// Email address; unique per account, matched case-insensitively.
    pub email: String,
    /// Plaintext password; hashed before it ever reaches the store.
    pub password: String,
}

/// Request body for login.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Request body for changing the current account's password.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ChangePasswordRequest {
    /// The password currently on file; must match before anything changes.
    pub current_password: String,
    /// The replacement password.
    pub new_password: String,
}

// =============================================================================
// Responses
// =============================================================================

/// Generic status/message response for auth operations.
///
/// Token material travels in HttpOnly cookies, never in response bodies.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct MessageResponse {
    pub status: String,
    pub message: String,
}

impl MessageResponse {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            status: "success".to_string(),
            message: message.into(),
        }
    }
}
