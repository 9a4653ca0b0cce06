// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Inkpost

//! Admin-only endpoints for account moderation.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    auth::AdminOnly,
    error::ApiError,
    models::AccountId,
    state::AppState,
};

/// Result of a ban toggle.
#[derive(Debug, Serialize, ToSchema)]
pub struct ToggleBanResponse {
    pub account_id: AccountId,
    /// The ban state after the flip.
    pub is_banned: bool,
}

/// Flip an account's ban flag.
///
/// Banning does not eagerly revoke sessions: outstanding access tokens die
/// at the `authenticate` ban check, and refresh is useless because login and
/// authenticate both refuse banned accounts.
#[utoipa::path(
    put,
    path = "/v1/admin/users/{account_id}/toggleban",
    params(
        ("account_id" = String, Path, description = "Account to ban or unban")
    ),
    tag = "Admin",
    responses(
        (status = 200, description = "New ban state", body = ToggleBanResponse),
        (status = 403, description = "Caller is not an admin"),
        (status = 404, description = "No such account")
    )
)]
pub async fn toggle_ban(
    AdminOnly(admin): AdminOnly,
    Path(account_id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<ToggleBanResponse>, ApiError> {
    let account_id = AccountId::from(account_id);
    let is_banned = state
        .accounts
        .toggle_ban(&account_id)
        .await
        .ok_or_else(|| ApiError::not_found("no account with that id"))?;

    tracing::info!(
        admin = %admin.account_id,
        target = %account_id,
        is_banned,
        "ban flag toggled"
    );

    Ok(Json(ToggleBanResponse {
        account_id,
        is_banned,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{AuthenticatedAccount, Role};
    use crate::models::RegisterRequest;

    fn admin_identity() -> AuthenticatedAccount {
        AuthenticatedAccount {
            account_id: AccountId::from("admin-1"),
            username: "root".to_string(),
            role: Role::Admin,
        }
    }

    #[tokio::test]
    async fn toggle_ban_flips_and_reports_state() {
        let state = AppState::for_tests();
        let pair = state
            .auth
            .register(RegisterRequest {
                first_name: "Ada".to_string(),
                last_name: "Lovelace".to_string(),
                email: "ada@example.com".to_string(),
                password: "correct horse".to_string(),
            })
            .await
            .unwrap();
        let target = state.auth.authenticate(&pair.access_token).await.unwrap();

        let Json(first) = toggle_ban(
            AdminOnly(admin_identity()),
            Path(target.account_id.to_string()),
            State(state.clone()),
        )
        .await
        .unwrap();
        assert!(first.is_banned);

        let Json(second) = toggle_ban(
            AdminOnly(admin_identity()),
            Path(target.account_id.to_string()),
            State(state),
        )
        .await
        .unwrap();
        assert!(!second.is_banned);
    }

    #[tokio::test]
    async fn toggle_ban_unknown_account_is_404() {
        let state = AppState::for_tests();
        let result = toggle_ban(
            AdminOnly(admin_identity()),
            Path("missing".to_string()),
            State(state),
        )
        .await;
        assert!(result.is_err());
    }
}
