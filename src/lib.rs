// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Inkpost

//! Inkpost - Blog Platform API
//!
//! This crate provides the Inkpost HTTP API. Its engineered core is the
//! credential subsystem: RS256 token pairs under independent key pairs,
//! refresh-token rotation with stolen-token reuse detection, and mass
//! session revocation on password change.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers (Axum)
//! - `auth` - Token issuance, session lifecycle, extractors
//! - `store` - Account records with the per-account session registry
//! - `config` - Environment-driven configuration

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod state;
pub mod store;
