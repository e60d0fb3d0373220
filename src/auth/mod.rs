// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! Bearer-token authentication for the trip shop API.
//!
//! ## Auth Flow
//!
//! 1. A member logs in with email and password and receives an HS256 JWT
//! 2. The client sends `Authorization: Bearer <token>` on later requests
//! 3. The gate middleware:
//!    - classifies the request as public or protected
//!    - verifies signature and expiry of protected requests
//!    - rejects tokens revoked by logout
//!    - resolves the token subject (email) to a member
//! 4. Logout revokes the token until its retention window passes
//!
//! ## Security
//!
//! - Every authentication failure is a 403 with a generic message
//! - Revocation status is never distinguished on the wire
//! - Tokens are never logged in full

pub mod claims;
pub mod error;
pub mod extractor;
pub mod identity;
pub mod middleware;
pub mod revocation;
pub mod routes;
pub mod verifier;

pub use claims::{AuthenticatedMember, TokenClaims};
pub use error::AuthError;
pub use extractor::Auth;
pub use identity::{IdentityLookup, LookupError};
pub use middleware::{auth_middleware, bearer_token, AuthState};
pub use revocation::RevocationStore;
pub use routes::PathClassifier;
pub use verifier::{CredentialVerifier, JwtCodec, TokenError, TokenIssuer, Verification};
