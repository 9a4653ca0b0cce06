// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Inkpost

//! Cookie transport for issued tokens.
//!
//! Both tokens travel as HttpOnly cookies, never in response bodies.
//! `SameSite=None; Secure` keeps them working for the cross-site frontend
//! while staying off-limits to script and non-HTTPS contexts. Lifetime is
//! enforced by the token signature itself, so the cookies carry no Max-Age;
//! an outlived cookie simply stops verifying.

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

use super::service::TokenPair;

/// Cookie holding the short-lived access token.
pub const ACCESS_TOKEN_COOKIE: &str = "accessToken";

/// Cookie holding the rotating refresh token.
pub const REFRESH_TOKEN_COOKIE: &str = "refreshToken";

fn session_cookie(name: &'static str, value: String) -> Cookie<'static> {
    Cookie::build((name, value))
        .http_only(true)
        .secure(true)
        .same_site(SameSite::None)
        .path("/")
        .build()
}

fn removal_cookie(name: &'static str) -> Cookie<'static> {
    Cookie::build(name).path("/").build()
}

/// Set both token cookies on the response jar.
pub fn issue_pair(jar: CookieJar, pair: &TokenPair) -> CookieJar {
    jar.add(session_cookie(
        ACCESS_TOKEN_COOKIE,
        pair.access_token.clone(),
    ))
    .add(session_cookie(
        REFRESH_TOKEN_COOKIE,
        pair.refresh_token.clone(),
    ))
}

/// Clear the access-token cookie.
pub fn clear_access(jar: CookieJar) -> CookieJar {
    jar.remove(removal_cookie(ACCESS_TOKEN_COOKIE))
}

/// Clear the refresh-token cookie.
pub fn clear_refresh(jar: CookieJar) -> CookieJar {
    jar.remove(removal_cookie(REFRESH_TOKEN_COOKIE))
}

/// Read the access token from the request jar, if present.
pub fn access_token(jar: &CookieJar) -> Option<String> {
    jar.get(ACCESS_TOKEN_COOKIE).map(|c| c.value().to_string())
}

/// Read the refresh token from the request jar, if present.
pub fn refresh_token(jar: &CookieJar) -> Option<String> {
    jar.get(REFRESH_TOKEN_COOKIE).map(|c| c.value().to_string())
}
