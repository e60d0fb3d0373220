// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Trip Gateway - Request Authentication Gateway
//!
//! Bearer-token authentication in front of the trip shop HTTP API.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers and router (Axum)
//! - `auth` - Path classification, token verification, revocation and the gate
//! - `store` - In-memory member directory
//! - `revocation_pruner` - Background sweep of stale revocations

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod revocation_pruner;
pub mod state;
pub mod store;
