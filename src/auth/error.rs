// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication errors.

use axum::{
    http::{header::CONTENT_TYPE, StatusCode},
    response::{IntoResponse, Response},
};

/// Content type of every rejection written by the gate.
pub const REJECTION_CONTENT_TYPE: &str = "application/json; charset=UTF-8";

/// Wire message for a missing or malformed `Authorization` header.
pub const AUTHENTICATION_REQUIRED: &str = "Authentication required.";

/// Wire message for every other authentication failure.
pub const INVALID_TOKEN: &str = "Invalid token.";

/// Why the gate rejected a request.
///
/// The variants exist for diagnostics only. On the wire every variant is a
/// 403 with one of two messages, so callers learn nothing about revocation
/// or the member directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// No `Authorization` header, or it lacks the `Bearer ` prefix
    MissingCredential,
    /// Structure or signature check failed
    InvalidCredential,
    /// Token expiry is in the past
    ExpiredCredential,
    /// Token was revoked by logout
    RevokedCredential,
    /// The token's identity could not be resolved to a member
    IdentityResolutionFailure(String),
}

impl AuthError {
    /// Diagnostic code, used as the `reason` field in logs.
    pub fn code(&self) -> &'static str {
        match self {
            AuthError::MissingCredential => "missing_credential",
            AuthError::InvalidCredential => "invalid_credential",
            AuthError::ExpiredCredential => "expired_credential",
            AuthError::RevokedCredential => "revoked_credential",
            AuthError::IdentityResolutionFailure(_) => "identity_resolution_failure",
        }
    }

    /// HTTP status code. Every authentication failure is a 403.
    pub fn status_code(&self) -> StatusCode {
        StatusCode::FORBIDDEN
    }

    /// Message exposed to the caller.
    pub fn public_message(&self) -> &'static str {
        match self {
            AuthError::MissingCredential => AUTHENTICATION_REQUIRED,
            AuthError::InvalidCredential
            | AuthError::ExpiredCredential
            | AuthError::RevokedCredential
            | AuthError::IdentityResolutionFailure(_) => INVALID_TOKEN,
        }
    }
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthError::MissingCredential => {
                write!(f, "Authorization header missing or not a Bearer credential")
            }
            AuthError::InvalidCredential => write!(f, "Token failed structural validation"),
            AuthError::ExpiredCredential => write!(f, "Token has expired"),
            AuthError::RevokedCredential => write!(f, "Token has been revoked"),
            AuthError::IdentityResolutionFailure(msg) => {
                write!(f, "Token identity could not be resolved: {msg}")
            }
        }
    }
}

impl std::error::Error for AuthError {}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let body = serde_json::json!({ "error": self.public_message() }).to_string();
        (
            self.status_code(),
            [(CONTENT_TYPE, REJECTION_CONTENT_TYPE)],
            body,
        )
            .into_response()
    }
}
