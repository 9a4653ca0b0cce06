// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Inkpost

//! Account endpoints for the signed-in user.

use axum::{
    extract::State,
    response::{IntoResponse, Response},
    Json,
};
use axum_extra::extract::cookie::CookieJar;
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    auth::{cookies, Auth, Role},
    error::ApiError,
    models::{AccountId, ChangePasswordRequest, MessageResponse},
    state::AppState,
};

/// Public view of an account. The password hash and the refresh-token
/// registry never leave the store.
#[derive(Debug, Serialize, ToSchema)]
pub struct AccountResponse {
    pub id: AccountId,
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub email: String,
    pub role: Role,
    pub created_at: String,
}

#[utoipa::path(
    get,
    path = "/v1/users/me",
    tag = "Users",
    responses(
        (status = 200, description = "The signed-in account", body = AccountResponse),
        (status = 401, description = "Missing or invalid access token")
    )
)]
pub async fn me(
    Auth(identity): Auth,
    State(state): State<AppState>,
) -> Result<Json<AccountResponse>, ApiError> {
    let account = state
        .accounts
        .find_by_id(&identity.account_id)
        .await
        .ok_or_else(|| ApiError::not_found("account no longer exists"))?;

    Ok(Json(AccountResponse {
        id: account.id,
        first_name: account.first_name,
        last_name: account.last_name,
        username: account.username,
        email: account.email,
        role: account.role,
        created_at: account.created_at.to_rfc3339(),
    }))
}

#[utoipa::path(
    put,
    path = "/v1/users/me/password",
    request_body = ChangePasswordRequest,
    tag = "Users",
    responses(
        (status = 200, description = "Password changed, fresh session cookies set", body = MessageResponse),
        (status = 400, description = "Current password is incorrect"),
        (status = 401, description = "Missing or invalid access token"),
        (status = 404, description = "Account no longer exists")
    )
)]
pub async fn change_password(
    Auth(identity): Auth,
    State(state): State<AppState>,
    jar: CookieJar,
    Json(request): Json<ChangePasswordRequest>,
) -> Response {
    match state
        .auth
        .change_password(
            &identity.account_id,
            &request.current_password,
            &request.new_password,
        )
        .await
    {
        Ok(pair) => {
            // Every other session just lost its registry entry; this response
            // carries the only credentials that still work.
            let jar = cookies::issue_pair(jar, &pair);
            (jar, Json(MessageResponse::success("password changed"))).into_response()
        }
        Err(e) => e.into_response(),
    }
}
