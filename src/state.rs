// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Inkpost

use std::sync::Arc;

use crate::auth::codec::{TokenCodec, TokenError};
use crate::auth::AuthSessionService;
use crate::config::AuthSettings;
use crate::store::AccountStore;

/// Shared application state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    /// Session-lifecycle orchestrator (register, login, refresh, ...).
    pub auth: AuthSessionService,
    /// Account records, shared with the session service.
    pub accounts: AccountStore,
}

impl AppState {
    /// Build state from loaded settings.
    ///
    /// Fails when the configured key material cannot back a token codec, so
    /// a misconfigured deployment is caught at startup.
    pub fn new(settings: &AuthSettings) -> Result<Self, TokenError> {
        let codec = Arc::new(TokenCodec::new(settings)?);
        let accounts = AccountStore::new();
        let auth = AuthSessionService::new(accounts.clone(), codec);
        Ok(Self { auth, accounts })
    }

    /// State backed by freshly generated test keys.
    #[cfg(test)]
    pub fn for_tests() -> Self {
        Self::new(crate::auth::codec::testkeys::test_settings()).expect("test state")
    }
}
