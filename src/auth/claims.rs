// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Token claims and the authenticated member representation.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Claims carried by a gateway bearer token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject: the member's email, used for identity lookup
    pub sub: String,

    /// Numeric member id at issuance time
    pub member_id: u64,

    /// Issued at (Unix seconds)
    pub iat: i64,

    /// Expiration (Unix seconds)
    pub exp: i64,
}

/// The principal attached to a request once the gate has authenticated it.
///
/// Built fresh for every request from the identity lookup and dropped with
/// the request; handlers read it through the [`Auth`](super::Auth) extractor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticatedMember {
    /// Numeric member id
    pub member_id: u64,

    /// Login email (the token subject)
    pub email: String,

    /// Authorities granted by the member directory
    pub authorities: Vec<String>,
}

impl AuthenticatedMember {
    pub fn new(member_id: u64, email: impl Into<String>, authorities: Vec<String>) -> Self {
        Self {
            member_id,
            email: email.into(),
            authorities,
        }
    }
}
