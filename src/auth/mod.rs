// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Inkpost

//! # Credential and Session Subsystem
//!
//! Issues RS256 token pairs, tracks live sessions per account, and enforces
//! the session lifecycle for the Inkpost API.
//!
//! ## Session Flow
//!
//! 1. `register`/`login` mint an access/refresh pair and record the refresh
//!    token in the account's session registry
//! 2. Tokens travel as HttpOnly cookies; protected handlers extract identity
//!    with the [`Auth`] extractor, which runs `authenticate` on the access
//!    token
//! 3. When the access token expires, the client calls refresh; the presented
//!    refresh token is atomically rotated for a new pair
//! 4. A refresh token presented after it was rotated away is treated as
//!    stolen: every session of the claimed account is revoked
//!
//! ## Security
//!
//! - Access and refresh tokens are signed under independent key pairs
//! - Registry membership, not signature validity, decides whether a refresh
//!   token is live
//! - Password changes invalidate all outstanding tokens at once
//! - Clock skew tolerance is 60 seconds (the verifier's default leeway)

pub mod claims;
pub mod codec;
pub mod cookies;
pub mod error;
pub mod extractor;
pub mod password;
pub mod registry;
pub mod roles;
pub mod service;

pub use claims::AuthenticatedAccount;
pub use error::AuthError;
pub use extractor::{AdminOnly, Auth};
pub use roles::Role;
pub use service::{AuthSessionService, TokenPair};
