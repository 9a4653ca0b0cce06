// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Inkpost

//! # Session Registry
//!
//! Set-membership view over the per-account refresh-token registry. This is
//! the only surface through which the registry field is ever manipulated;
//! handlers and the session service never touch the collection directly.
//!
//! Each operation maps to a single atomic store operation. Rotation uses the
//! store's compare-and-swap so two concurrent refreshes presenting the same
//! token can never both succeed.

use std::sync::Arc;

use super::claims::TokenPurpose;
use super::codec::{TokenCodec, TokenError};
use crate::models::AccountId;
use crate::store::{Account, AccountStore};

/// Registry operations over one account's live refresh tokens.
#[derive(Clone)]
pub struct SessionRegistry {
    store: AccountStore,
    codec: Arc<TokenCodec>,
}

impl SessionRegistry {
    pub fn new(store: AccountStore, codec: Arc<TokenCodec>) -> Self {
        Self { store, codec }
    }

    /// Register a freshly minted refresh token as a live session.
    ///
    /// Before appending, entries that no longer verify under the refresh key
    /// are dropped, so expired-but-unused sessions do not accumulate forever.
    /// Each removal is its own atomic operation; a concurrent rotation of a
    /// pruned token would fail its swap anyway since the token is dead.
    pub async fn add(&self, account_id: &AccountId, token: &str) -> bool {
        if let Some(existing) = self.store.refresh_tokens(account_id).await {
            for stale in existing
                .iter()
                .filter(|t| self.is_dead(t))
            {
                self.store.pull_refresh_token(account_id, stale).await;
            }
        }
        self.store.push_refresh_token(account_id, token).await
    }

    /// Remove one session; no-op if the token is not a member.
    pub async fn remove(&self, account_id: &AccountId, token: &str) -> bool {
        self.store.pull_refresh_token(account_id, token).await
    }

    /// Revoke every session for the account.
    pub async fn revoke_all(&self, account_id: &AccountId) -> bool {
        self.store.clear_refresh_tokens(account_id).await
    }

    /// Replace every session with exactly one new token (password change).
    pub async fn replace_with(&self, account_id: &AccountId, token: &str) -> bool {
        self.store.replace_refresh_tokens(account_id, token).await
    }

    /// Resolve the account whose registry contains `token`.
    pub async fn find_owner(&self, token: &str) -> Option<Account> {
        self.store.find_by_refresh_token(token).await
    }

    /// Atomically swap a presented token for its replacement.
    ///
    /// Returns `false` when the presented token is no longer a member,
    /// meaning a concurrent refresh already rotated it.
    pub async fn rotate(&self, account_id: &AccountId, old: &str, new: &str) -> bool {
        self.store.rotate_refresh_token(account_id, old, new).await
    }

    fn is_dead(&self, token: &str) -> bool {
        matches!(
            self.codec.verify(token, TokenPurpose::Refresh),
            Err(TokenError::Expired) | Err(TokenError::Malformed) | Err(TokenError::SignatureInvalid)
        )
    }
}
