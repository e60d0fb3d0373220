// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Axum extractors for the member attached by the gate.
//!
//! Use the `Auth` extractor in handlers behind protected paths:
//!
//! ```rust,ignore
//! async fn my_handler(Auth(member): Auth) -> impl IntoResponse {
//!     // member is AuthenticatedMember
//! }
//! ```

use axum::{extract::FromRequestParts, http::request::Parts};

use super::{AuthError, AuthenticatedMember};

/// Extractor for the authenticated member.
///
/// The gate middleware has already done all token work; this only reads the
/// request extensions. A handler mounted on a public path gets a
/// `MissingCredential` rejection, never a partially authenticated member.
pub struct Auth(pub AuthenticatedMember);

impl<S> FromRequestParts<S> for Auth
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedMember>()
            .cloned()
            .map(Auth)
            .ok_or(AuthError::MissingCredential)
    }
}
