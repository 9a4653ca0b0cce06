// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Inkpost

//! Axum extractors for authenticated accounts.
//!
//! Use the `Auth` extractor in handlers to require authentication:
//!
//! ```rust,ignore
//! async fn my_handler(Auth(account): Auth) -> impl IntoResponse {
//!     // account is AuthenticatedAccount
//! }
//! ```

use axum::{extract::FromRequestParts, http::request::Parts};
use axum_extra::extract::cookie::CookieJar;

use super::{cookies, AuthError, AuthenticatedAccount};
use crate::state::AppState;

/// Extractor for authenticated accounts.
///
/// Reads the access-token cookie and resolves it to an identity through the
/// session service: signature, expiry, account existence, ban state, and
/// password-change cutoff are all checked before the handler runs.
///
/// # Example
///
/// ```rust,ignore
/// async fn me(
///     Auth(account): Auth,
///     State(state): State<AppState>,
/// ) -> Result<Json<AccountResponse>, ApiError> {
///     // account.account_id identifies the caller
/// }
/// ```
pub struct Auth(pub AuthenticatedAccount);

impl FromRequestParts<AppState> for Auth {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        // A layer upstream may already have resolved the identity.
        if let Some(account) = parts.extensions.get::<AuthenticatedAccount>().cloned() {
            return Ok(Auth(account));
        }

        let jar = CookieJar::from_headers(&parts.headers);
        let token = cookies::access_token(&jar).ok_or(AuthError::TokenInvalid)?;

        let account = state.auth.authenticate(&token).await?;
        Ok(Auth(account))
    }
}

/// Extractor that requires the admin role.
pub struct AdminOnly(pub AuthenticatedAccount);

impl FromRequestParts<AppState> for AdminOnly {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Auth(account) = Auth::from_request_parts(parts, state).await?;

        if !account.is_admin() {
            return Err(AuthError::InsufficientPermissions);
        }

        Ok(AdminOnly(account))
    }
}
