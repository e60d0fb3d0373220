// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication gate middleware for Axum.
//!
//! Every request passes through [`auth_middleware`] once, before any handler:
//!
//! 1. **Classify** with the [`PathClassifier`]. Public requests go straight
//!    to the next stage with no identity attached.
//! 2. **Extract** the `Bearer ` credential from `Authorization`.
//! 3. **Verify** signature/structure and expiry.
//! 4. **Check revocation** against the [`RevocationStore`].
//! 5. **Resolve identity** through the [`IdentityLookup`].
//! 6. **Allow**: insert the [`AuthenticatedMember`] into request extensions.
//!
//! Any failure short-circuits with a 403 written by [`AuthError`].
//!
//! ## Usage
//!
//! ```rust,ignore
//! let app = Router::new()
//!     .route("/api/members/me", get(current_member))
//!     .layer(axum::middleware::from_fn_with_state(
//!         auth_state.clone(),
//!         auth_middleware,
//!     ));
//! ```

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::{debug, warn};

use super::{
    AuthError, AuthenticatedMember, CredentialVerifier, IdentityLookup, PathClassifier,
    RevocationStore,
};

/// Case-sensitive scheme prefix of the `Authorization` header.
const BEARER_PREFIX: &str = "Bearer ";

/// Collaborators consulted by the gate.
#[derive(Clone)]
pub struct AuthState {
    pub classifier: PathClassifier,
    pub verifier: Arc<dyn CredentialVerifier>,
    pub revocations: Arc<RevocationStore>,
    pub identities: Arc<dyn IdentityLookup>,
}

impl AuthState {
    pub fn new(
        verifier: Arc<dyn CredentialVerifier>,
        revocations: Arc<RevocationStore>,
        identities: Arc<dyn IdentityLookup>,
    ) -> Self {
        Self {
            classifier: PathClassifier::default(),
            verifier,
            revocations,
            identities,
        }
    }

    /// Run the protected-path pipeline on a request's headers.
    pub async fn authenticate(&self, headers: &HeaderMap) -> Result<AuthenticatedMember, AuthError> {
        let token = bearer_token(headers)?;

        let verification = self.verifier.verify(token);
        if !verification.is_usable() {
            debug!(
                token = %fingerprint(token),
                valid = verification.valid,
                expired = verification.expired,
                "Token verification failed"
            );
            return Err(if verification.valid {
                AuthError::ExpiredCredential
            } else {
                AuthError::InvalidCredential
            });
        }

        if self.revocations.is_revoked(token) {
            return Err(AuthError::RevokedCredential);
        }

        let email = verification.identity.ok_or_else(|| {
            AuthError::IdentityResolutionFailure("token carries no subject".to_string())
        })?;

        self.identities
            .lookup_identity(&email)
            .await
            .map_err(|e| AuthError::IdentityResolutionFailure(e.to_string()))
    }
}

/// Pull the raw token out of `Authorization: Bearer <token>`.
///
/// The value after the prefix is returned untrimmed; an empty token is left
/// for the verifier to reject.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    headers
        .get(AUTHORIZATION)
        .ok_or(AuthError::MissingCredential)?
        .to_str()
        .map_err(|_| AuthError::MissingCredential)?
        .strip_prefix(BEARER_PREFIX)
        .ok_or(AuthError::MissingCredential)
}

/// Short, log-safe prefix of a token.
pub(crate) fn fingerprint(token: &str) -> String {
    match token.get(..8) {
        Some(head) if token.len() > 8 => format!("{head}…"),
        _ => "…".to_string(),
    }
}

/// Authentication gate middleware function.
pub async fn auth_middleware(
    State(auth): State<AuthState>,
    mut request: Request,
    next: Next,
) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_owned();

    if auth.classifier.is_public(&method, &path) {
        debug!(%method, %path, "Public path, skipping authentication");
        return next.run(request).await;
    }

    let outcome = auth.authenticate(request.headers()).await;
    match outcome {
        Ok(member) => {
            debug!(%method, %path, member_id = member.member_id, "Request authenticated");
            request.extensions_mut().insert(member);
            next.run(request).await
        }
        Err(e) => {
            warn!(
                %method,
                %path,
                reason = e.code(),
                detail = %e,
                "Rejecting unauthenticated request"
            );
            e.into_response()
        }
    }
}
