// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! Configuration is loaded from the environment once at startup.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `HOST` | Server bind IP (IPv4 or IPv6 literal) | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `JWT_SECRET` | HS256 signing secret, at least 32 bytes | Required |
//! | `JWT_EXPIRATION_SECS` | Lifetime of issued tokens | `86400` |
//! | `UPLOAD_DIR` | Directory served under `/uploads` | `./uploads` |
//! | `CORS_ALLOWED_ORIGINS` | Comma-separated allowed origins | `http://localhost:3000` |
//! | `REVOCATION_PRUNE_INTERVAL_SECS` | Interval between revocation sweeps | `3600` |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::{
    net::{IpAddr, SocketAddr},
    path::PathBuf,
    time::Duration,
};

use chrono::TimeDelta;

pub const HOST_ENV: &str = "HOST";
pub const PORT_ENV: &str = "PORT";
pub const JWT_SECRET_ENV: &str = "JWT_SECRET";
pub const JWT_EXPIRATION_ENV: &str = "JWT_EXPIRATION_SECS";
pub const UPLOAD_DIR_ENV: &str = "UPLOAD_DIR";
pub const CORS_ALLOWED_ORIGINS_ENV: &str = "CORS_ALLOWED_ORIGINS";
pub const PRUNE_INTERVAL_ENV: &str = "REVOCATION_PRUNE_INTERVAL_SECS";
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

/// Minimum HS256 secret length in bytes.
pub const MIN_SECRET_LEN: usize = 32;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_JWT_EXPIRATION_SECS: i64 = 86_400;
const DEFAULT_UPLOAD_DIR: &str = "./uploads";
const DEFAULT_CORS_ORIGIN: &str = "http://localhost:3000";
const DEFAULT_PRUNE_INTERVAL_SECS: u64 = 3_600;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{name} has an invalid value: {value}")]
    Invalid { name: &'static str, value: String },
    #[error("JWT_SECRET must be at least {} bytes", MIN_SECRET_LEN)]
    SecretTooShort,
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub jwt_secret: Vec<u8>,
    pub token_ttl: TimeDelta,
    pub upload_dir: PathBuf,
    pub cors_allowed_origins: Vec<String>,
    pub prune_interval: Duration,
    pub log_format: LogFormat,
}

impl AppConfig {
    /// Load from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load using an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup(HOST_ENV).unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = parse_or(&lookup, PORT_ENV, DEFAULT_PORT)?;
        let ip: IpAddr = host.trim().parse().map_err(|_| ConfigError::Invalid {
            name: HOST_ENV,
            value: host.clone(),
        })?;
        let bind_addr = SocketAddr::new(ip, port);

        let jwt_secret = lookup(JWT_SECRET_ENV)
            .ok_or(ConfigError::Missing(JWT_SECRET_ENV))?
            .into_bytes();
        if jwt_secret.len() < MIN_SECRET_LEN {
            return Err(ConfigError::SecretTooShort);
        }

        let ttl_secs = parse_or(&lookup, JWT_EXPIRATION_ENV, DEFAULT_JWT_EXPIRATION_SECS)?;
        let token_ttl = TimeDelta::try_seconds(ttl_secs)
            .filter(|ttl| *ttl > TimeDelta::zero())
            .ok_or(ConfigError::Invalid {
                name: JWT_EXPIRATION_ENV,
                value: ttl_secs.to_string(),
            })?;

        let upload_dir = PathBuf::from(
            lookup(UPLOAD_DIR_ENV).unwrap_or_else(|| DEFAULT_UPLOAD_DIR.to_string()),
        );

        let cors_allowed_origins = lookup(CORS_ALLOWED_ORIGINS_ENV)
            .unwrap_or_else(|| DEFAULT_CORS_ORIGIN.to_string())
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(str::to_string)
            .collect();

        let prune_secs = parse_or(&lookup, PRUNE_INTERVAL_ENV, DEFAULT_PRUNE_INTERVAL_SECS)?;
        if prune_secs == 0 {
            return Err(ConfigError::Invalid {
                name: PRUNE_INTERVAL_ENV,
                value: prune_secs.to_string(),
            });
        }

        let log_format = match lookup(LOG_FORMAT_ENV).as_deref() {
            None | Some("pretty") => LogFormat::Pretty,
            Some("json") => LogFormat::Json,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    name: LOG_FORMAT_ENV,
                    value: other.to_string(),
                })
            }
        };

        Ok(Self {
            bind_addr,
            jwt_secret,
            token_ttl,
            upload_dir,
            cors_allowed_origins,
            prune_interval: Duration::from_secs(prune_secs),
            log_format,
        })
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("bind_addr", &self.bind_addr)
            .field("jwt_secret", &"<redacted>")
            .field("token_ttl", &self.token_ttl)
            .field("upload_dir", &self.upload_dir)
            .field("cors_allowed_origins", &self.cors_allowed_origins)
            .field("prune_interval", &self.prune_interval)
            .field("log_format", &self.log_format)
            .finish()
    }
}

fn parse_or<F, T>(lookup: &F, name: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(name) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value: raw }),
    }
}
