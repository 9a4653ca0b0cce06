// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Inkpost

use axum::{
    http::{header::CONTENT_TYPE, Method},
    routing::{get, post, put},
    Router,
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    auth::{AuthenticatedAccount, Role},
    models::{
        AccountId, ChangePasswordRequest, LoginRequest, MessageResponse, RegisterRequest,
    },
    state::AppState,
};

pub mod admin;
pub mod auth;
pub mod health;
pub mod users;

pub fn router(state: AppState) -> Router {
    let v1_routes = Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", post(auth::logout))
        .route("/auth/refresh", get(auth::refresh))
        .route("/users/me", get(users::me))
        .route("/users/me/password", put(users::change_password))
        .route(
            "/admin/users/{account_id}/toggleban",
            put(admin::toggle_ban),
        )
        .with_state(state);

    // Cookie auth means credentialed CORS; wildcard origins are not allowed
    // with credentials, so the request origin is mirrored back instead.
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::mirror_request())
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([CONTENT_TYPE])
        .allow_credentials(true);

    Router::new()
        .nest("/v1", v1_routes)
        .route("/health", get(health::health))
        .route("/health/live", get(health::liveness))
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(cors)
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
}

#[derive(OpenApi)]
#[openapi(
    paths(
        auth::register,
        auth::login,
        auth::logout,
        auth::refresh,
        users::me,
        users::change_password,
        admin::toggle_ban,
        health::health,
        health::liveness
    ),
    components(
        schemas(
            AccountId,
            Role,
            AuthenticatedAccount,
            RegisterRequest,
            LoginRequest,
            ChangePasswordRequest,
            MessageResponse,
            users::AccountResponse,
            admin::ToggleBanResponse,
            health::ReadyResponse,
            health::HealthChecks,
            health::HealthResponse
        )
    ),
    tags(
        (name = "Auth", description = "Registration and session lifecycle"),
        (name = "Users", description = "Signed-in account management"),
        (name = "Admin", description = "Account moderation"),
        (name = "Health", description = "Service probes")
    )
)]
struct ApiDoc;
