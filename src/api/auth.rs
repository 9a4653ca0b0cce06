// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Inkpost

//! Session-lifecycle endpoints.
//!
//! Token material only ever travels in HttpOnly cookies; response bodies are
//! status messages. The refresh endpoint clears the presented refresh cookie
//! before anything else, so a token is single-presentation at the transport
//! layer as well as in the registry.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use axum_extra::extract::cookie::CookieJar;

use crate::{
    auth::cookies,
    models::{LoginRequest, MessageResponse, RegisterRequest},
    state::AppState,
};

#[utoipa::path(
    post,
    path = "/v1/auth/register",
    request_body = RegisterRequest,
    tag = "Auth",
    responses(
        (status = 201, description = "Account created, session cookies set", body = MessageResponse),
        (status = 409, description = "Email or username already registered")
    )
)]
pub async fn register(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(request): Json<RegisterRequest>,
) -> Response {
    match state.auth.register(request).await {
        Ok(pair) => {
            let jar = cookies::issue_pair(jar, &pair);
            (
                StatusCode::CREATED,
                jar,
                Json(MessageResponse::success("account registered")),
            )
                .into_response()
        }
        Err(e) => e.into_response(),
    }
}

#[utoipa::path(
    post,
    path = "/v1/auth/login",
    request_body = LoginRequest,
    tag = "Auth",
    responses(
        (status = 200, description = "Session opened, cookies set", body = MessageResponse),
        (status = 401, description = "Incorrect email or password")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(request): Json<LoginRequest>,
) -> Response {
    match state.auth.login(&request.email, &request.password).await {
        Ok(pair) => {
            let jar = cookies::issue_pair(jar, &pair);
            (jar, Json(MessageResponse::success("logged in"))).into_response()
        }
        Err(e) => e.into_response(),
    }
}

#[utoipa::path(
    get,
    path = "/v1/auth/refresh",
    tag = "Auth",
    responses(
        (status = 200, description = "New token pair issued", body = MessageResponse),
        (status = 403, description = "No usable session; sign in again")
    )
)]
pub async fn refresh(State(state): State<AppState>, jar: CookieJar) -> Response {
    let presented = cookies::refresh_token(&jar);
    // The presented cookie is spent whatever happens next.
    let jar = cookies::clear_refresh(jar);

    match state.auth.refresh(presented).await {
        Ok(pair) => {
            let jar = cookies::issue_pair(jar, &pair);
            (jar, Json(MessageResponse::success("access token refreshed"))).into_response()
        }
        Err(e) => {
            let jar = cookies::clear_access(jar);
            (jar, e).into_response()
        }
    }
}

#[utoipa::path(
    post,
    path = "/v1/auth/logout",
    tag = "Auth",
    responses(
        (status = 200, description = "Session closed, cookies cleared", body = MessageResponse)
    )
)]
pub async fn logout(State(state): State<AppState>, jar: CookieJar) -> Response {
    let presented = cookies::refresh_token(&jar);
    let jar = cookies::clear_access(cookies::clear_refresh(jar));

    match state.auth.logout(presented).await {
        Ok(()) => (jar, Json(MessageResponse::success("logged out"))).into_response(),
        Err(e) => (jar, e).into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::cookies::{ACCESS_TOKEN_COOKIE, REFRESH_TOKEN_COOKIE};
    use axum::http::header::SET_COOKIE;

    fn register_request() -> RegisterRequest {
        RegisterRequest {
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            password: "correct horse".to_string(),
        }
    }

    fn set_cookie_values(response: &Response) -> Vec<String> {
        response
            .headers()
            .get_all(SET_COOKIE)
            .iter()
            .map(|v| v.to_str().unwrap().to_string())
            .collect()
    }

    fn jar_with_refresh(token: &str) -> CookieJar {
        CookieJar::new().add((REFRESH_TOKEN_COOKIE, token.to_string()))
    }

    #[tokio::test]
    async fn register_sets_both_cookies() {
        let state = AppState::for_tests();

        let response = register(State(state), CookieJar::new(), Json(register_request())).await;
        assert_eq!(response.status(), StatusCode::CREATED);

        let cookies = set_cookie_values(&response);
        assert!(cookies.iter().any(|c| c.starts_with(ACCESS_TOKEN_COOKIE)));
        assert!(cookies.iter().any(|c| c.starts_with(REFRESH_TOKEN_COOKIE)));
        // Hardened attributes on every session cookie.
        for cookie in &cookies {
            assert!(cookie.contains("HttpOnly"));
            assert!(cookie.contains("Secure"));
            assert!(cookie.contains("SameSite=None"));
        }
    }

    #[tokio::test]
    async fn login_with_bad_password_returns_401_without_cookies() {
        let state = AppState::for_tests();
        state.auth.register(register_request()).await.unwrap();

        let response = login(
            State(state),
            CookieJar::new(),
            Json(LoginRequest {
                email: "ada@example.com".to_string(),
                password: "wrong horse".to_string(),
            }),
        )
        .await;

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(set_cookie_values(&response).is_empty());
    }

    #[tokio::test]
    async fn refresh_rotates_cookies() {
        let state = AppState::for_tests();
        let pair = state.auth.register(register_request()).await.unwrap();

        let response = refresh(State(state), jar_with_refresh(&pair.refresh_token)).await;
        assert_eq!(response.status(), StatusCode::OK);

        let cookies = set_cookie_values(&response);
        let refresh_cookie = cookies
            .iter()
            .find(|c| c.starts_with(&format!("{REFRESH_TOKEN_COOKIE}=")) && !c.contains("Max-Age=0"))
            .expect("fresh refresh cookie");
        assert!(!refresh_cookie.contains(&pair.refresh_token));
    }

    #[tokio::test]
    async fn refresh_without_cookie_is_403() {
        let state = AppState::for_tests();

        let response = refresh(State(state), CookieJar::new()).await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        // No fresh credentials are handed out on the failure path.
        assert!(set_cookie_values(&response)
            .iter()
            .all(|c| c.contains("Max-Age=0") || !c.contains("=ey")));
    }

    #[tokio::test]
    async fn refresh_failure_clears_request_cookies() {
        use axum::http::{header::COOKIE, HeaderMap};

        let state = AppState::for_tests();

        // Cookies arriving on the request are "original", so clearing them
        // emits removal Set-Cookie headers.
        let mut headers = HeaderMap::new();
        headers.insert(
            COOKIE,
            format!("{ACCESS_TOKEN_COOKIE}=stale; {REFRESH_TOKEN_COOKIE}=stolen")
                .parse()
                .unwrap(),
        );
        let jar = CookieJar::from_headers(&headers);

        let response = refresh(State(state), jar).await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let cookies = set_cookie_values(&response);
        assert!(cookies
            .iter()
            .any(|c| c.starts_with(&format!("{ACCESS_TOKEN_COOKIE}=")) && c.contains("Max-Age=0")));
        assert!(cookies
            .iter()
            .any(|c| c.starts_with(&format!("{REFRESH_TOKEN_COOKIE}=")) && c.contains("Max-Age=0")));
    }

    #[tokio::test]
    async fn logout_clears_cookies_even_without_session() {
        use axum::http::{header::COOKIE, HeaderMap};

        let state = AppState::for_tests();

        let mut headers = HeaderMap::new();
        headers.insert(
            COOKIE,
            format!("{ACCESS_TOKEN_COOKIE}=whatever; {REFRESH_TOKEN_COOKIE}=gone")
                .parse()
                .unwrap(),
        );
        let jar = CookieJar::from_headers(&headers);

        let response = logout(State(state), jar).await;
        assert_eq!(response.status(), StatusCode::OK);

        let cookies = set_cookie_values(&response);
        assert!(cookies
            .iter()
            .any(|c| c.starts_with(ACCESS_TOKEN_COOKIE) && c.contains("Max-Age=0")));
        assert!(cookies
            .iter()
            .any(|c| c.starts_with(REFRESH_TOKEN_COOKIE) && c.contains("Max-Age=0")));
    }
}
