// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::{path::PathBuf, sync::Arc};

use crate::{
    auth::{AuthState, JwtCodec, RevocationStore},
    config::AppConfig,
    store::MemberStore,
};

/// Shared application state.
///
/// Owns the single revocation store of the process; the gate and the logout
/// handler receive clones of the same `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub members: Arc<MemberStore>,
    pub tokens: Arc<JwtCodec>,
    pub revocations: Arc<RevocationStore>,
    pub upload_dir: PathBuf,
    pub cors_allowed_origins: Vec<String>,
}

impl AppState {
    pub fn new(members: MemberStore, tokens: JwtCodec, revocations: Arc<RevocationStore>) -> Self {
        Self {
            members: Arc::new(members),
            tokens: Arc::new(tokens),
            revocations,
            upload_dir: PathBuf::from("./uploads"),
            cors_allowed_origins: Vec::new(),
        }
    }

    /// Build the state described by `config`.
    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            MemberStore::new(),
            JwtCodec::new(&config.jwt_secret, config.token_ttl),
            Arc::new(RevocationStore::new()),
        )
        .with_upload_dir(config.upload_dir.clone())
        .with_cors_allowed_origins(config.cors_allowed_origins.clone())
    }

    pub fn with_upload_dir(mut self, upload_dir: PathBuf) -> Self {
        self.upload_dir = upload_dir;
        self
    }

    pub fn with_cors_allowed_origins(mut self, origins: Vec<String>) -> Self {
        self.cors_allowed_origins = origins;
        self
    }

    /// Collaborators for the authentication gate, sharing this state's stores.
    pub fn auth_state(&self) -> AuthState {
        AuthState::new(
            self.tokens.clone(),
            self.revocations.clone(),
            self.members.clone(),
        )
    }
}

#[cfg(test)]
impl Default for AppState {
    fn default() -> Self {
        Self::new(
            MemberStore::new(),
            JwtCodec::new(b"development-secret-development-secret", chrono::TimeDelta::hours(24)),
            Arc::new(RevocationStore::new()),
        )
    }
}
