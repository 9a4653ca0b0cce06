// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Inkpost

//! # Session Service
//!
//! Orchestrates the credential lifecycle: register, login, refresh, logout,
//! change-password, and the `authenticate` precondition every protected
//! operation runs through.
//!
//! ## Refresh-token states
//!
//! A refresh token is *Issued* while it is a registry member. Membership is
//! the whole validity predicate: rotation and revocation remove it, and a
//! syntactically valid, unexpired token that is absent from the registry is
//! treated as a replay signal, never as a credential. A replay triggers mass
//! revocation of the claimed account's entire registry, so one stolen token
//! costs the attacker - and the legitimate owner - every session.

use std::sync::Arc;

use uuid::Uuid;

use super::claims::{AuthenticatedAccount, TokenPurpose};
use super::codec::TokenCodec;
use super::error::AuthError;
use super::password::{hash_password, verify_password};
use super::registry::SessionRegistry;
use crate::models::{AccountId, RegisterRequest};
use crate::store::{Account, AccountStore};

/// A freshly minted access/refresh pair, ready for the cookie transport.
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Stateless session-lifecycle orchestrator.
///
/// All session state lives in the shared [`AccountStore`]; clones of the
/// service observe the same sessions, so it scales across handler tasks.
#[derive(Clone)]
pub struct AuthSessionService {
    accounts: AccountStore,
    sessions: SessionRegistry,
    codec: Arc<TokenCodec>,
}

impl AuthSessionService {
    pub fn new(accounts: AccountStore, codec: Arc<TokenCodec>) -> Self {
        let sessions = SessionRegistry::new(accounts.clone(), codec.clone());
        Self {
            accounts,
            sessions,
            codec,
        }
    }

    fn mint_pair(&self, account_id: &AccountId) -> Result<TokenPair, AuthError> {
        let access_token = self
            .codec
            .sign(account_id, TokenPurpose::Access)
            .map_err(|e| AuthError::Internal(e.to_string()))?;
        let refresh_token = self
            .codec
            .sign(account_id, TokenPurpose::Refresh)
            .map_err(|e| AuthError::Internal(e.to_string()))?;
        Ok(TokenPair {
            access_token,
            refresh_token,
        })
    }

    /// Derive a free username from the account's name, appending a numeric
    /// suffix until no collision remains.
    async fn generate_username(&self, first_name: &str, last_name: &str) -> String {
        let mut username: String = format!("{first_name}{last_name}")
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect();
        while self.accounts.username_taken(&username).await {
            let suffix = Uuid::new_v4().as_u128() % 100;
            username.push_str(&format!("{suffix:02}"));
        }
        username
    }

    /// Create an account and open its first session.
    pub async fn register(&self, request: RegisterRequest) -> Result<TokenPair, AuthError> {
        let username = self
            .generate_username(&request.first_name, &request.last_name)
            .await;
        let password_hash = hash_password(request.password).await?;

        let account_id = AccountId::generate();
        self.accounts
            .create(Account {
                id: account_id.clone(),
                first_name: request.first_name,
                last_name: request.last_name,
                username,
                email: request.email.to_lowercase(),
                password_hash,
                role: Default::default(),
                is_banned: false,
                password_changed_at: None,
                refresh_tokens: Vec::new(),
                created_at: chrono::Utc::now(),
            })
            .await?;

        let pair = self.mint_pair(&account_id)?;
        self.sessions.add(&account_id, &pair.refresh_token).await;

        tracing::info!(account_id = %account_id, "account registered");
        Ok(pair)
    }

    /// Open a new session for an existing account.
    ///
    /// Login appends to the registry; it never clears other sessions, so an
    /// account can stay signed in on several devices concurrently.
    pub async fn login(&self, email: &str, password: &str) -> Result<TokenPair, AuthError> {
        let Some(account) = self.accounts.find_by_email(email).await else {
            return Err(AuthError::InvalidCredentials);
        };
        if !verify_password(password.to_string(), account.password_hash.clone()).await? {
            return Err(AuthError::InvalidCredentials);
        }
        if account.is_banned {
            tracing::warn!(account_id = %account.id, "banned account attempted login");
            return Err(AuthError::AccountBanned);
        }

        let pair = self.mint_pair(&account.id)?;
        self.sessions.add(&account.id, &pair.refresh_token).await;

        tracing::info!(account_id = %account.id, "session opened");
        Ok(pair)
    }

    /// Resolve an access token to an identity.
    ///
    /// Beyond signature and expiry, the token must predate no password
    /// change and the account must exist and be unbanned.
    pub async fn authenticate(&self, access_token: &str) -> Result<AuthenticatedAccount, AuthError> {
        let claims = self
            .codec
            .verify(access_token, TokenPurpose::Access)
            .map_err(|e| {
                tracing::debug!(reason = %e, "access token rejected");
                AuthError::TokenInvalid
            })?;

        let Some(account) = self.accounts.find_by_id(&claims.account_id()).await else {
            tracing::debug!(subject = %claims.sub, "access token for missing account");
            return Err(AuthError::TokenInvalid);
        };
        if account.is_banned {
            return Err(AuthError::AccountBanned);
        }
        if account.password_changed_after(claims.iat) {
            tracing::debug!(account_id = %account.id, "access token predates password change");
            return Err(AuthError::TokenInvalid);
        }

        Ok(AuthenticatedAccount {
            account_id: account.id,
            username: account.username,
            role: account.role,
        })
    }

    /// Rotate a presented refresh token for a new access/refresh pair.
    ///
    /// The caller clears the refresh cookie before anything else, whatever
    /// the outcome; every failure on this path forces re-authentication.
    pub async fn refresh(&self, presented: Option<String>) -> Result<TokenPair, AuthError> {
        let Some(presented) = presented else {
            return Err(AuthError::NoSession);
        };

        let Some(owner) = self.sessions.find_owner(&presented).await else {
            return Err(self.handle_replay(&presented).await);
        };

        if let Err(e) = self.codec.verify(&presented, TokenPurpose::Refresh) {
            // Registered but no longer verifiable: retire the entry.
            tracing::debug!(account_id = %owner.id, reason = %e, "registered refresh token failed verification");
            self.sessions.remove(&owner.id, &presented).await;
            return Err(AuthError::NoSession);
        }

        let pair = self.mint_pair(&owner.id)?;
        if !self
            .sessions
            .rotate(&owner.id, &presented, &pair.refresh_token)
            .await
        {
            // A concurrent refresh won the swap; this presentation is spent.
            tracing::debug!(account_id = %owner.id, "refresh lost rotation race");
            return Err(AuthError::NoSession);
        }

        Ok(pair)
    }

    /// A token with no registry owner was presented: treat as theft.
    ///
    /// The unverified decode only picks the revoke target; it never
    /// authenticates anyone. Revocation happens solely when the claimed
    /// subject is structurally plausible.
    async fn handle_replay(&self, presented: &str) -> AuthError {
        if let Some(claims) = self.codec.decode_unsafe(presented) {
            if Uuid::parse_str(&claims.sub).is_ok() {
                let target = claims.account_id();
                self.sessions.revoke_all(&target).await;
                tracing::warn!(
                    account_id = %target,
                    "retired refresh token replayed; all sessions revoked"
                );
                return AuthError::ReplayDetected;
            }
        }
        tracing::warn!("unattributable refresh token presented");
        AuthError::ReplayDetected
    }

    /// Close the session for the presented refresh token, if any.
    ///
    /// Idempotent: logging out with no refresh token, or with one that is
    /// already gone, succeeds without side effects.
    pub async fn logout(&self, presented: Option<String>) -> Result<(), AuthError> {
        if let Some(token) = presented {
            if let Some(owner) = self.sessions.find_owner(&token).await {
                self.sessions.remove(&owner.id, &token).await;
                tracing::info!(account_id = %owner.id, "session closed");
            }
        }
        Ok(())
    }

    /// Change the account's password and cut every other session loose.
    ///
    /// On success the registry holds exactly the one new refresh token;
    /// access tokens minted before the change stop authenticating via the
    /// `password_changed_at` check even though their expiry has not elapsed.
    pub async fn change_password(
        &self,
        account_id: &AccountId,
        current_password: &str,
        new_password: &str,
    ) -> Result<TokenPair, AuthError> {
        let Some(account) = self.accounts.find_by_id(account_id).await else {
            return Err(AuthError::AccountNotFound);
        };
        if !verify_password(current_password.to_string(), account.password_hash.clone()).await? {
            return Err(AuthError::PasswordMismatch);
        }

        let new_hash = hash_password(new_password.to_string()).await?;
        self.accounts
            .set_password(account_id, &new_hash, chrono::Utc::now())
            .await;

        let pair = self.mint_pair(account_id)?;
        self.sessions
            .replace_with(account_id, &pair.refresh_token)
            .await;

        tracing::info!(account_id = %account_id, "password changed; other sessions revoked");
        Ok(pair)
    }
}
