// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! In-memory member directory.
//!
//! Holds registered members and answers the gate's identity lookups. Passwords
//! are stored as Argon2 PHC strings and never leave this module.

use std::collections::{BTreeMap, HashMap};

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::auth::{AuthenticatedMember, IdentityLookup, LookupError};

/// Authority granted to every registered member.
pub const MEMBER_AUTHORITY: &str = "ROLE_USER";

/// A registered member.
#[derive(Debug, Clone)]
pub struct Member {
    pub id: u64,
    pub email: String,
    password_hash: String,
    pub marketing_agreed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Member {
    fn principal(&self) -> AuthenticatedMember {
        AuthenticatedMember::new(self.id, &self.email, vec![MEMBER_AUTHORITY.to_string()])
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Email already exists: {0}")]
    EmailTaken(String),
    #[error("User not found.")]
    MemberNotFound,
    #[error("Bad credentials")]
    BadCredentials,
    #[error("password hashing failed: {0}")]
    PasswordHash(String),
}

#[derive(Default)]
struct Members {
    by_id: BTreeMap<u64, Member>,
    /// Email to id; kept in step with `by_id` on every insert.
    id_by_email: HashMap<String, u64>,
    next_id: u64,
}

impl Members {
    fn by_email(&self, email: &str) -> Option<&Member> {
        self.id_by_email
            .get(email)
            .and_then(|id| self.by_id.get(id))
    }
}

#[derive(Default)]
pub struct MemberStore {
    members: RwLock<Members>,
}

impl MemberStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new member. Ids are assigned sequentially from 1.
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        marketing_agreed: bool,
    ) -> Result<Member, StoreError> {
        if self.members.read().await.by_email(email).is_some() {
            return Err(StoreError::EmailTaken(email.to_string()));
        }

        let password_hash = hash_password(password)?;

        let mut members = self.members.write().await;
        // Re-check under the write lock; another registration may have won.
        if members.by_email(email).is_some() {
            return Err(StoreError::EmailTaken(email.to_string()));
        }

        members.next_id += 1;
        let now = Utc::now();
        let member = Member {
            id: members.next_id,
            email: email.to_string(),
            password_hash,
            marketing_agreed,
            created_at: now,
            updated_at: now,
        };
        members.id_by_email.insert(member.email.clone(), member.id);
        members.by_id.insert(member.id, member.clone());

        tracing::info!(member_id = member.id, "Member registered");
        Ok(member)
    }

    /// Check an email/password pair.
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<Member, StoreError> {
        let member = self
            .find_by_email(email)
            .await
            .ok_or(StoreError::MemberNotFound)?;

        let parsed =
            PasswordHash::new(&member.password_hash).map_err(|e| StoreError::PasswordHash(e.to_string()))?;
        Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .map_err(|_| StoreError::BadCredentials)?;

        Ok(member)
    }

    pub async fn find_by_id(&self, id: u64) -> Option<Member> {
        self.members.read().await.by_id.get(&id).cloned()
    }

    pub async fn find_by_email(&self, email: &str) -> Option<Member> {
        self.members.read().await.by_email(email).cloned()
    }

    /// All members in id order.
    pub async fn list(&self) -> Vec<Member> {
        self.members.read().await.by_id.values().cloned().collect()
    }
}

fn hash_password(password: &str) -> Result<String, StoreError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| StoreError::PasswordHash(e.to_string()))
}

#[async_trait]
impl IdentityLookup for MemberStore {
    async fn lookup_identity(&self, email: &str) -> Result<AuthenticatedMember, LookupError> {
        self.find_by_email(email)
            .await
            .map(|member| member.principal())
            .ok_or_else(|| LookupError::NotFound(email.to_string()))
    }
}
