// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Bearer token issuance and verification.
//!
//! The gate only depends on the [`CredentialVerifier`] contract; [`JwtCodec`]
//! is the HS256 implementation used by the service. Verification is a pure
//! function of the token, the shared secret and the clock. It never looks at
//! the revocation store.

use chrono::{DateTime, TimeDelta, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

use super::claims::TokenClaims;

/// Outcome of verifying a bearer token.
///
/// `valid` and `expired` are computed independently so both can be logged
/// and checked even when one already fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verification {
    /// Structure and signature are sound.
    pub valid: bool,
    /// The embedded expiry is in the past, or cannot be read.
    pub expired: bool,
    /// Subject carried by a valid token.
    pub identity: Option<String>,
}

impl Verification {
    /// Whether the token may be used for authentication.
    pub fn is_usable(&self) -> bool {
        self.valid && !self.expired
    }
}

/// Stateless token verification.
pub trait CredentialVerifier: Send + Sync {
    fn verify(&self, token: &str) -> Verification;
}

/// Token issuance, used by login.
pub trait TokenIssuer: Send + Sync {
    fn issue(&self, email: &str, member_id: u64) -> Result<String, TokenError>;
}

#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("failed to sign token: {0}")]
    Signing(#[from] jsonwebtoken::errors::Error),
    #[error("token lifetime out of range")]
    LifetimeOutOfRange,
}

/// HS256 JWT issuer and verifier sharing one secret.
#[derive(Clone)]
pub struct JwtCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: TimeDelta,
}

impl JwtCodec {
    /// Create a codec signing with `secret`, issuing tokens valid for `ttl`.
    pub fn new(secret: &[u8], ttl: TimeDelta) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is evaluated separately in `is_expired`.
        validation.validate_exp = false;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            ttl,
        }
    }

    /// Sign a token with explicit issue and expiry instants.
    pub fn issue_with_times(
        &self,
        email: &str,
        member_id: u64,
        issued_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> Result<String, TokenError> {
        let claims = TokenClaims {
            sub: email.to_string(),
            member_id,
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
        };
        Ok(encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)?)
    }

    /// Signature and structure check, ignoring expiry.
    fn decode_verified(&self, token: &str) -> Option<TokenClaims> {
        decode::<TokenClaims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .ok()
    }

    /// Expiry check on the unverified payload.
    ///
    /// A token whose expiry cannot be read counts as expired.
    fn is_expired(token: &str, now: DateTime<Utc>) -> bool {
        match jsonwebtoken::dangerous::insecure_decode::<TokenClaims>(token) {
            Ok(data) => data.claims.exp <= now.timestamp(),
            Err(_) => true,
        }
    }

    /// Verify against an explicit clock.
    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Verification {
        let claims = self.decode_verified(token);
        let expired = Self::is_expired(token, now);

        Verification {
            valid: claims.is_some(),
            expired,
            identity: claims.map(|c| c.sub),
        }
    }
}

impl CredentialVerifier for JwtCodec {
    fn verify(&self, token: &str) -> Verification {
        self.verify_at(token, Utc::now())
    }
}

impl TokenIssuer for JwtCodec {
    fn issue(&self, email: &str, member_id: u64) -> Result<String, TokenError> {
        let now = Utc::now();
        let expires_at = now
            .checked_add_signed(self.ttl)
            .ok_or(TokenError::LifetimeOutOfRange)?;
        self.issue_with_times(email, member_id, now, expires_at)
    }
}

impl std::fmt::Debug for JwtCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtCodec")
            .field("algorithm", &Algorithm::HS256)
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}
