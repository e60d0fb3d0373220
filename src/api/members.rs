// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Member endpoints: registration, login, logout and lookups.

use axum::{
    extract::{Path, State},
    http::HeaderMap,
    Json,
};
use tracing::info;

use crate::{
    auth::{
        bearer_token, middleware::fingerprint, Auth, AuthenticatedMember, CredentialVerifier,
        TokenIssuer,
    },
    error::ApiError,
    models::{LoginRequest, LoginResponse, MemberResponse, RegisterRequest},
    state::AppState,
};

/// List all members.
#[utoipa::path(
    get,
    path = "/api/members",
    tag = "Members",
    responses(
        (status = 200, description = "All registered members", body = [MemberResponse])
    )
)]
pub async fn list_members(State(state): State<AppState>) -> Json<Vec<MemberResponse>> {
    let members = state.members.list().await;
    Json(members.into_iter().map(MemberResponse::from).collect())
}

/// Register a new member.
#[utoipa::path(
    post,
    path = "/api/members/register",
    tag = "Members",
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "Member registered", body = MemberResponse),
        (status = 400, description = "Missing email or password"),
        (status = 409, description = "Email already registered")
    )
)]
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<Json<MemberResponse>, ApiError> {
    if request.email.trim().is_empty() || request.password.is_empty() {
        return Err(ApiError::bad_request("Email and password are required."));
    }

    let member = state
        .members
        .register(&request.email, &request.password, request.marketing_agreed)
        .await?;
    Ok(Json(member.into()))
}

/// Log in and receive a bearer token.
#[utoipa::path(
    post,
    path = "/api/members/login",
    tag = "Members",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login succeeded", body = LoginResponse),
        (status = 400, description = "Unknown email or wrong password")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let member = state
        .members
        .authenticate(&request.email, &request.password)
        .await?;

    let token = state.tokens.issue(&member.email, member.id).map_err(|e| {
        tracing::error!(error = %e, "Token issuance failed");
        ApiError::internal("Internal server error occurred.")
    })?;

    info!(member_id = member.id, "Member logged in");
    Ok(Json(LoginResponse::new(token, member)))
}

/// Revoke the presented bearer token.
///
/// The token must still be valid and unexpired; it stays rejected until the
/// revocation entry is pruned, by which time it has expired anyway.
#[utoipa::path(
    post,
    path = "/api/members/logout",
    tag = "Members",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Token revoked", body = String),
        (status = 400, description = "Malformed header or unusable token"),
        (status = 403, description = "Authentication required or invalid token")
    )
)]
pub async fn logout(
    State(state): State<AppState>,
    Auth(member): Auth,
    headers: HeaderMap,
) -> Result<&'static str, ApiError> {
    let token = bearer_token(&headers)
        .map_err(|_| ApiError::bad_request("Valid token format required."))?;

    if !state.tokens.verify(token).is_usable() {
        return Err(ApiError::bad_request("Invalid token."));
    }

    state.revocations.revoke(token);
    info!(
        member_id = member.member_id,
        token = %fingerprint(token),
        "Token revoked on logout"
    );
    Ok("Logged out successfully.")
}

/// The member behind the presented token.
#[utoipa::path(
    get,
    path = "/api/members/me",
    tag = "Members",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Authenticated member", body = AuthenticatedMember),
        (status = 403, description = "Authentication required or invalid token")
    )
)]
pub async fn current_member(Auth(member): Auth) -> Json<AuthenticatedMember> {
    Json(member)
}

/// Look up a member by numeric id.
#[utoipa::path(
    get,
    path = "/api/members/{id}",
    tag = "Members",
    params(("id" = u64, Path, description = "Member id")),
    responses(
        (status = 200, description = "Member found", body = MemberResponse),
        (status = 404, description = "Member not found")
    )
)]
pub async fn get_member(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<MemberResponse>, ApiError> {
    state
        .members
        .find_by_id(id)
        .await
        .map(|member| Json(member.into()))
        .ok_or_else(|| ApiError::not_found(format!("Member not found. ID: {id}")))
}

/// Look up a member by email.
#[utoipa::path(
    get,
    path = "/api/members/email/{email}",
    tag = "Members",
    params(("email" = String, Path, description = "Member email")),
    responses(
        (status = 200, description = "Member found", body = MemberResponse),
        (status = 404, description = "Member not found")
    )
)]
pub async fn get_member_by_email(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> Result<Json<MemberResponse>, ApiError> {
    state
        .members
        .find_by_email(&email)
        .await
        .map(|member| Json(member.into()))
        .ok_or_else(|| ApiError::not_found(format!("Member not found. Email: {email}")))
}
