// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Identity resolution contract.

use async_trait::async_trait;

use super::claims::AuthenticatedMember;

#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    #[error("no member registered under {0}")]
    NotFound(String),
    #[error("identity backend unavailable: {0}")]
    Unavailable(String),
}

/// Resolves the identity carried by a token into a full principal.
#[async_trait]
pub trait IdentityLookup: Send + Sync {
    async fn lookup_identity(&self, email: &str) -> Result<AuthenticatedMember, LookupError>;
}
