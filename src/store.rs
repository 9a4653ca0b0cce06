// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Inkpost

//! # Account Record Store
//!
//! Key-addressed store holding one [`Account`] record per registered user.
//! Every mutation takes the single write lock for its whole critical section,
//! so each operation is atomic with respect to concurrent requests. The
//! refresh-token registry field is only ever touched through the operations
//! here; nothing else in the system manipulates the collection directly.
//!
//! A secondary index maps each live refresh token to its owning account, so
//! owner lookup is a hash probe rather than a scan over all records.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::auth::Role;
use crate::models::AccountId;

/// Errors surfaced by account creation.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("an account with this email already exists")]
    DuplicateEmail,

    #[error("an account with this username already exists")]
    DuplicateUsername,
}

/// One account record.
///
/// `refresh_tokens` has set semantics: one entry per live session/device,
/// order irrelevant. Every entry was minted by the token codec for this
/// account and has not yet been rotated away or revoked.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: AccountId,
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    /// Stored lowercased; lookups lowercase the query.
    pub email: String,
    /// Argon2id PHC string.
    pub password_hash: String,
    pub role: Role,
    pub is_banned: bool,
    pub password_changed_at: Option<DateTime<Utc>>,
    pub refresh_tokens: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl Account {
    /// Whether the password was changed after a token with the given
    /// issued-at was minted. One second of skew is tolerated so a token
    /// minted in the same instant as the change still passes.
    pub fn password_changed_after(&self, token_iat: i64) -> bool {
        match self.password_changed_at {
            Some(changed_at) => changed_at.timestamp() - 1 > token_iat,
            None => false,
        }
    }
}

#[derive(Default)]
struct StoreInner {
    accounts: HashMap<AccountId, Account>,
    /// Live refresh token -> owning account.
    token_index: HashMap<String, AccountId>,
}

/// Shared handle to the account records.
///
/// Cloning is cheap; all clones observe the same records.
#[derive(Clone, Default)]
pub struct AccountStore {
    inner: Arc<RwLock<StoreInner>>,
}

impl AccountStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a new account, enforcing email and username uniqueness.
    pub async fn create(&self, mut account: Account) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;

        account.email = account.email.to_lowercase();
        if inner.accounts.values().any(|a| a.email == account.email) {
            return Err(StoreError::DuplicateEmail);
        }
        if inner
            .accounts
            .values()
            .any(|a| a.username == account.username)
        {
            return Err(StoreError::DuplicateUsername);
        }

        for token in &account.refresh_tokens {
            inner.token_index.insert(token.clone(), account.id.clone());
        }
        inner.accounts.insert(account.id.clone(), account);
        Ok(())
    }

    pub async fn find_by_id(&self, id: &AccountId) -> Option<Account> {
        self.inner.read().await.accounts.get(id).cloned()
    }

    pub async fn find_by_email(&self, email: &str) -> Option<Account> {
        let email = email.to_lowercase();
        self.inner
            .read()
            .await
            .accounts
            .values()
            .find(|a| a.email == email)
            .cloned()
    }

    pub async fn username_taken(&self, username: &str) -> bool {
        self.inner
            .read()
            .await
            .accounts
            .values()
            .any(|a| a.username == username)
    }

    /// Resolve the account whose registry contains `token`, via the index.
    pub async fn find_by_refresh_token(&self, token: &str) -> Option<Account> {
        let inner = self.inner.read().await;
        let id = inner.token_index.get(token)?;
        inner.accounts.get(id).cloned()
    }

    /// Snapshot of an account's registry, for lazy pruning.
    pub async fn refresh_tokens(&self, id: &AccountId) -> Option<Vec<String>> {
        self.inner
            .read()
            .await
            .accounts
            .get(id)
            .map(|a| a.refresh_tokens.clone())
    }

    /// Atomically append a refresh token to an account's registry.
    ///
    /// Returns `false` if the account does not exist. Appending a token that
    /// is already a member is a no-op.
    pub async fn push_refresh_token(&self, id: &AccountId, token: &str) -> bool {
        let mut guard = self.inner.write().await;
        let inner = &mut *guard;
        let Some(account) = inner.accounts.get_mut(id) else {
            return false;
        };
        if !account.refresh_tokens.iter().any(|t| t == token) {
            account.refresh_tokens.push(token.to_string());
            inner.token_index.insert(token.to_string(), id.clone());
        }
        true
    }

    /// Atomically remove a refresh token; no-op if absent.
    pub async fn pull_refresh_token(&self, id: &AccountId, token: &str) -> bool {
        let mut guard = self.inner.write().await;
        let inner = &mut *guard;
        let Some(account) = inner.accounts.get_mut(id) else {
            return false;
        };
        let before = account.refresh_tokens.len();
        account.refresh_tokens.retain(|t| t != token);
        let removed = account.refresh_tokens.len() < before;
        if removed {
            inner.token_index.remove(token);
        }
        removed
    }

    /// Atomically clear an account's entire registry (mass revocation).
    pub async fn clear_refresh_tokens(&self, id: &AccountId) -> bool {
        let mut guard = self.inner.write().await;
        let inner = &mut *guard;
        let Some(account) = inner.accounts.get_mut(id) else {
            return false;
        };
        let revoked = std::mem::take(&mut account.refresh_tokens);
        for token in &revoked {
            inner.token_index.remove(token);
        }
        true
    }

    /// Atomically replace the registry with exactly one token.
    pub async fn replace_refresh_tokens(&self, id: &AccountId, token: &str) -> bool {
        let mut guard = self.inner.write().await;
        let inner = &mut *guard;
        let Some(account) = inner.accounts.get_mut(id) else {
            return false;
        };
        let revoked = std::mem::replace(&mut account.refresh_tokens, vec![token.to_string()]);
        for old in &revoked {
            inner.token_index.remove(old);
        }
        inner.token_index.insert(token.to_string(), id.clone());
        true
    }

    /// Compare-and-swap rotation: remove `old` and insert `new` in one
    /// critical section, succeeding only if `old` is still a member.
    ///
    /// A `false` return means a concurrent rotation already consumed `old`
    /// (or the account vanished); the caller must treat the presented token
    /// as spent.
    pub async fn rotate_refresh_token(&self, id: &AccountId, old: &str, new: &str) -> bool {
        let mut guard = self.inner.write().await;
        let inner = &mut *guard;
        let Some(account) = inner.accounts.get_mut(id) else {
            return false;
        };
        let before = account.refresh_tokens.len();
        account.refresh_tokens.retain(|t| t != old);
        if account.refresh_tokens.len() == before {
            return false;
        }
        account.refresh_tokens.push(new.to_string());
        inner.token_index.remove(old);
        inner.token_index.insert(new.to_string(), id.clone());
        true
    }

    /// Atomically set a new password hash and stamp `password_changed_at`.
    pub async fn set_password(&self, id: &AccountId, hash: &str, changed_at: DateTime<Utc>) -> bool {
        let mut inner = self.inner.write().await;
        let Some(account) = inner.accounts.get_mut(id) else {
            return false;
        };
        account.password_hash = hash.to_string();
        account.password_changed_at = Some(changed_at);
        true
    }

    /// Flip the ban flag; returns the new state.
    pub async fn toggle_ban(&self, id: &AccountId) -> Option<bool> {
        let mut inner = self.inner.write().await;
        let account = inner.accounts.get_mut(id)?;
        account.is_banned = !account.is_banned;
        Some(account.is_banned)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_account(id: &str, email: &str, username: &str) -> Account {
        Account {
            id: AccountId::from(id),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            username: username.to_string(),
            email: email.to_string(),
            password_hash: "$argon2id$fake".to_string(),
            role: Role::User,
            is_banned: false,
            password_changed_at: None,
            refresh_tokens: Vec::new(),
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn create_rejects_duplicate_email_and_username() {
        let store = AccountStore::new();
        store
            .create(test_account("a1", "ada@example.com", "AdaLovelace"))
            .await
            .unwrap();

        let dup_email = store
            .create(test_account("a2", "ADA@example.com", "Other"))
            .await;
        assert_eq!(dup_email, Err(StoreError::DuplicateEmail));

        let dup_username = store
            .create(test_account("a3", "other@example.com", "AdaLovelace"))
            .await;
        assert_eq!(dup_username, Err(StoreError::DuplicateUsername));
    }

    #[tokio::test]
    async fn push_pull_and_index_stay_consistent() {
        let store = AccountStore::new();
        let id = AccountId::from("a1");
        store
            .create(test_account("a1", "ada@example.com", "Ada"))
            .await
            .unwrap();

        assert!(store.push_refresh_token(&id, "rt1").await);
        assert!(store.push_refresh_token(&id, "rt2").await);
        // Duplicate append is a no-op.
        assert!(store.push_refresh_token(&id, "rt1").await);
        assert_eq!(store.refresh_tokens(&id).await.unwrap().len(), 2);

        let owner = store.find_by_refresh_token("rt1").await.unwrap();
        assert_eq!(owner.id, id);

        assert!(store.pull_refresh_token(&id, "rt1").await);
        assert!(store.find_by_refresh_token("rt1").await.is_none());
        // Pulling an absent token is a no-op, not an error.
        assert!(!store.pull_refresh_token(&id, "rt1").await);
    }

    #[tokio::test]
    async fn rotate_is_compare_and_swap() {
        let store = AccountStore::new();
        let id = AccountId::from("a1");
        store
            .create(test_account("a1", "ada@example.com", "Ada"))
            .await
            .unwrap();
        store.push_refresh_token(&id, "rt1").await;

        assert!(store.rotate_refresh_token(&id, "rt1", "rt2").await);
        assert_eq!(store.refresh_tokens(&id).await.unwrap(), vec!["rt2"]);
        assert!(store.find_by_refresh_token("rt1").await.is_none());
        assert!(store.find_by_refresh_token("rt2").await.is_some());

        // Second rotation of the consumed token fails the swap.
        assert!(!store.rotate_refresh_token(&id, "rt1", "rt3").await);
        assert_eq!(store.refresh_tokens(&id).await.unwrap(), vec!["rt2"]);
    }

    #[tokio::test]
    async fn clear_and_replace_update_the_index() {
        let store = AccountStore::new();
        let id = AccountId::from("a1");
        store
            .create(test_account("a1", "ada@example.com", "Ada"))
            .await
            .unwrap();
        store.push_refresh_token(&id, "rt1").await;
        store.push_refresh_token(&id, "rt2").await;

        assert!(store.replace_refresh_tokens(&id, "rt3").await);
        assert_eq!(store.refresh_tokens(&id).await.unwrap(), vec!["rt3"]);
        assert!(store.find_by_refresh_token("rt1").await.is_none());
        assert!(store.find_by_refresh_token("rt2").await.is_none());

        assert!(store.clear_refresh_tokens(&id).await);
        assert!(store.refresh_tokens(&id).await.unwrap().is_empty());
        assert!(store.find_by_refresh_token("rt3").await.is_none());
    }

    #[tokio::test]
    async fn set_password_stamps_changed_at() {
        let store = AccountStore::new();
        let id = AccountId::from("a1");
        store
            .create(test_account("a1", "ada@example.com", "Ada"))
            .await
            .unwrap();

        let changed_at = Utc::now();
        assert!(store.set_password(&id, "$argon2id$new", changed_at).await);

        let account = store.find_by_id(&id).await.unwrap();
        assert_eq!(account.password_hash, "$argon2id$new");
        assert_eq!(account.password_changed_at, Some(changed_at));
    }

    #[test]
    fn password_changed_after_tolerates_one_second_skew() {
        let mut account = test_account("a1", "ada@example.com", "Ada");
        assert!(!account.password_changed_after(0));

        let now = Utc::now();
        account.password_changed_at = Some(now);
        // Token minted in the same second as the change still passes.
        assert!(!account.password_changed_after(now.timestamp()));
        // Token minted well before the change does not.
        assert!(account.password_changed_after(now.timestamp() - 60));
    }

    #[tokio::test]
    async fn toggle_ban_flips_state() {
        let store = AccountStore::new();
        let id = AccountId::from("a1");
        store
            .create(test_account("a1", "ada@example.com", "Ada"))
            .await
            .unwrap();

        assert_eq!(store.toggle_ban(&id).await, Some(true));
        assert_eq!(store.toggle_ban(&id).await, Some(false));
        assert_eq!(store.toggle_ban(&AccountId::from("nope")).await, None);
    }
}
