// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Inkpost

//! Credential subsystem errors.
//!
//! Responses are deliberately coarse: a 401/403 body never distinguishes
//! "no such account" from "wrong password" from "banned", and every refresh
//! failure reads the same. The precise internal reason goes to the tracing
//! log, not the wire.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use super::password::PasswordError;
use crate::store::StoreError;

/// Credential and session-lifecycle failures.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum AuthError {
    /// Unknown email or password mismatch at login
    #[error("incorrect email or password")]
    InvalidCredentials,

    /// Account is banned
    #[error("this account is not allowed to sign in")]
    AccountBanned,

    /// No usable session on the refresh/logout path
    #[error("could not refresh access token")]
    NoSession,

    /// Access token malformed, expired, signed with the wrong key, or
    /// invalidated by a later password change
    #[error("invalid or expired access token")]
    TokenInvalid,

    /// A retired refresh token was presented again; the owning account's
    /// whole registry has been revoked
    #[error("could not refresh access token")]
    ReplayDetected,

    /// Username already taken
    #[error("username has already been taken")]
    UsernameConflict,

    /// Email already registered
    #[error("an account with this email already exists")]
    EmailConflict,

    /// Current password did not match at password change
    #[error("current password is incorrect")]
    PasswordMismatch,

    /// The authenticated account's record vanished mid-session
    #[error("current account no longer exists")]
    AccountNotFound,

    /// Admin-only route reached by a non-admin
    #[error("insufficient permissions for this operation")]
    InsufficientPermissions,

    /// Store or hashing infrastructure failure; never retried here
    #[error("internal error")]
    Internal(String),
}

#[derive(Serialize)]
struct AuthErrorBody {
    error: String,
    error_code: String,
}

impl AuthError {
    /// Get the error code for this error.
    ///
    /// `NoSession` and `ReplayDetected` share one code on purpose: every
    /// refresh-path failure must produce the same body, so a caller probing
    /// with stolen tokens cannot tell whether the token was registry-resident
    /// or whether a mass revoke fired. The variants stay distinct internally
    /// for tracing only.
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::InvalidCredentials => "invalid_credentials",
            AuthError::AccountBanned => "account_banned",
            AuthError::NoSession | AuthError::ReplayDetected => "forbidden",
            AuthError::TokenInvalid => "token_invalid",
            AuthError::UsernameConflict => "username_conflict",
            AuthError::EmailConflict => "email_conflict",
            AuthError::PasswordMismatch => "password_mismatch",
            AuthError::AccountNotFound => "not_found",
            AuthError::InsufficientPermissions => "insufficient_permissions",
            AuthError::Internal(_) => "internal_error",
        }
    }

    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::InvalidCredentials
            | AuthError::AccountBanned
            | AuthError::TokenInvalid => StatusCode::UNAUTHORIZED,
            AuthError::NoSession
            | AuthError::ReplayDetected
            | AuthError::InsufficientPermissions => StatusCode::FORBIDDEN,
            AuthError::UsernameConflict | AuthError::EmailConflict => StatusCode::CONFLICT,
            AuthError::PasswordMismatch => StatusCode::BAD_REQUEST,
            AuthError::AccountNotFound => StatusCode::NOT_FOUND,
            AuthError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        if let AuthError::Internal(ref detail) = self {
            tracing::error!(%detail, "auth infrastructure failure");
        }
        let status = self.status_code();
        let body = Json(AuthErrorBody {
            error: self.to_string(),
            error_code: self.error_code().to_string(),
        });
        (status, body).into_response()
    }
}

impl From<StoreError> for AuthError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::DuplicateEmail => AuthError::EmailConflict,
            StoreError::DuplicateUsername => AuthError::UsernameConflict,
        }
    }
}

impl From<PasswordError> for AuthError {
    fn from(e: PasswordError) -> Self {
        AuthError::Internal(e.to_string())
    }
}
