// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Inkpost

//! Token claims and the authenticated-account representation.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::roles::Role;
use crate::models::AccountId;

/// The two disjoint token purposes.
///
/// Each purpose signs and verifies with its own key pair; a token minted for
/// one purpose never verifies under the other's key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenPurpose {
    /// Short-lived bearer credential presented per request.
    Access,
    /// Longer-lived credential whose sole job is minting new pairs.
    Refresh,
}

impl std::fmt::Display for TokenPurpose {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenPurpose::Access => write!(f, "access"),
            TokenPurpose::Refresh => write!(f, "refresh"),
        }
    }
}

/// Signed token payload: subject account plus issue and expiry instants.
///
/// Claims are ephemeral; they are never persisted standalone. The refresh
/// token's raw signed string, not its claims, is the registry membership key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (account ID)
    pub sub: String,
    /// Unique token ID. RS256 signing is deterministic, so without this two
    /// tokens minted for the same subject in the same second would be
    /// byte-identical and collapse into one registry member.
    #[serde(default)]
    pub jti: String,
    /// Issued at (Unix seconds)
    pub iat: i64,
    /// Expiration (Unix seconds)
    pub exp: i64,
}

impl Claims {
    pub fn account_id(&self) -> AccountId {
        AccountId::from(self.sub.as_str())
    }
}

/// Identity yielded by `authenticate`, carried through request extensions.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuthenticatedAccount {
    /// Canonical account ID (token `sub` claim)
    pub account_id: AccountId,
    /// Public handle
    pub username: String,
    /// Account's role
    pub role: Role,
}

impl AuthenticatedAccount {
    /// Check if the account holds the required role.
    pub fn has_role(&self, required: Role) -> bool {
        self.role.has_privilege(required)
    }

    /// Check if this account is an admin.
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn claims_expose_account_id() {
        let claims = Claims {
            sub: "acct_123".to_string(),
            jti: "t1".to_string(),
            iat: 1700000000,
            exp: 1700000900,
        };
        assert_eq!(claims.account_id(), AccountId::from("acct_123"));
    }

    #[test]
    fn admin_check_follows_role() {
        let admin = AuthenticatedAccount {
            account_id: AccountId::from("a"),
            username: "root".to_string(),
            role: Role::Admin,
        };
        assert!(admin.is_admin());
        assert!(admin.has_role(Role::User));

        let user = AuthenticatedAccount {
            account_id: AccountId::from("b"),
            username: "reader".to_string(),
            role: Role::User,
        };
        assert!(!user.is_admin());
        assert!(!user.has_role(Role::Admin));
    }
}
