// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # API Data Models
//!
//! Request and response bodies of the member API. Field names are camelCase
//! on the wire. All types derive `ToSchema` for the OpenAPI document.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::store::Member;

// =============================================================================
// Service
// =============================================================================

/// Response of `GET /`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct ServiceInfo {
    /// Service name.
    pub service: String,
    /// Always "ok" while the process is serving.
    pub status: String,
}

// =============================================================================
// Member Models
// =============================================================================

/// Registration request.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[schema(example = "traveler@example.com")]
    pub email: String,
    #[schema(example = "password123")]
    pub password: String,
    /// Whether the member accepted marketing messages.
    #[serde(default)]
    pub marketing_agreed: bool,
}

/// Login request.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoginRequest {
    #[schema(example = "traveler@example.com")]
    pub email: String,
    #[schema(example = "password123")]
    pub password: String,
}

/// Public view of a member.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MemberResponse {
    pub id: u64,
    pub email: String,
    pub marketing_agreed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Member> for MemberResponse {
    fn from(member: Member) -> Self {
        Self {
            id: member.id,
            email: member.email,
            marketing_agreed: member.marketing_agreed,
            created_at: member.created_at,
            updated_at: member.updated_at,
        }
    }
}

/// Successful login: bearer token plus the member view.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    /// Send as `Authorization: Bearer <token>`.
    pub token: String,
    pub id: u64,
    pub email: String,
    pub marketing_agreed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl LoginResponse {
    pub fn new(token: String, member: Member) -> Self {
        Self {
            token,
            id: member.id,
            email: member.email,
            marketing_agreed: member.marketing_agreed,
            created_at: member.created_at,
            updated_at: member.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_request_defaults_marketing_flag() {
        let req: RegisterRequest =
            serde_json::from_str(r#"{"email":"a@b.com","password":"pw"}"#).unwrap();
        assert!(!req.marketing_agreed);

        let req: RegisterRequest = serde_json::from_str(
            r#"{"email":"a@b.com","password":"pw","marketingAgreed":true}"#,
        )
        .unwrap();
        assert!(req.marketing_agreed);
    }
}
