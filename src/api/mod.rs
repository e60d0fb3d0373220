// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::time::Duration;

use axum::{
    http::HeaderValue,
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    auth::{auth_middleware, AuthenticatedMember},
    models::{LoginRequest, LoginResponse, MemberResponse, RegisterRequest, ServiceInfo},
    state::AppState,
};

pub mod index;
pub mod members;

/// Build the application router.
///
/// Every request, including static uploads, docs and unmatched paths, passes
/// through the authentication gate before reaching a handler.
pub fn router(state: AppState) -> Router {
    let auth = state.auth_state();
    let cors = cors_layer(&state.cors_allowed_origins);
    let upload_dir = state.upload_dir.clone();

    let api_routes = Router::new()
        .route("/", get(index::index))
        .route("/api/members", get(members::list_members))
        .route("/api/members/register", post(members::register))
        .route("/api/members/login", post(members::login))
        .route("/api/members/logout", post(members::logout))
        .route("/api/members/me", get(members::current_member))
        .route("/api/members/{id}", get(members::get_member))
        .route(
            "/api/members/email/{email}",
            get(members::get_member_by_email),
        )
        .with_state(state);

    Router::new()
        .merge(api_routes)
        .nest_service("/uploads", ServeDir::new(upload_dir))
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(middleware::from_fn_with_state(auth, auth_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(%origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any)
        .max_age(Duration::from_secs(3600))
}

/// Registers the bearer scheme referenced by protected operations.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        index::index,
        members::list_members,
        members::register,
        members::login,
        members::logout,
        members::current_member,
        members::get_member,
        members::get_member_by_email
    ),
    components(
        schemas(
            ServiceInfo,
            RegisterRequest,
            LoginRequest,
            LoginResponse,
            MemberResponse,
            AuthenticatedMember
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Service", description = "Service status"),
        (name = "Members", description = "Member registration, login and lookup")
    )
)]
struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{to_bytes, Body},
        http::{header, Method, Request, StatusCode},
        response::Response,
    };
    use serde_json::{json, Value};
    use tempfile::TempDir;
    use tower::ServiceExt;

    async fn call(
        app: &Router,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> Response {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };
        app.clone().oneshot(builder.body(body).unwrap()).await.unwrap()
    }

    async fn text(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    async fn json_body(response: Response) -> Value {
        serde_json::from_str(&text(response).await).unwrap()
    }

    async fn register_and_login(app: &Router, email: &str) -> String {
        let credentials = json!({ "email": email, "password": "hunter2-long" });
        let response = call(
            app,
            Method::POST,
            "/api/members/register",
            None,
            Some(credentials.clone()),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);

        let response = call(app, Method::POST, "/api/members/login", None, Some(credentials)).await;
        assert_eq!(response.status(), StatusCode::OK);
        json_body(response).await["token"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn router_builds_with_all_routes() {
        let app = router(AppState::default());
        let _ = app.into_make_service();
    }

    #[tokio::test]
    async fn root_is_public() {
        let app = router(AppState::default());
        let response = call(&app, Method::GET, "/", None, None).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["status"], "ok");
    }

    #[tokio::test]
    async fn login_logout_lifecycle() {
        let app = router(AppState::default());
        let token = register_and_login(&app, "traveler@example.com").await;

        let response = call(&app, Method::GET, "/api/members/me", Some(&token), None).await;
        assert_eq!(response.status(), StatusCode::OK);
        let me = json_body(response).await;
        assert_eq!(me["email"], "traveler@example.com");
        assert_eq!(me["memberId"], 1);

        let response = call(&app, Method::POST, "/api/members/logout", Some(&token), None).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(text(response).await, "Logged out successfully.");

        let response = call(&app, Method::GET, "/api/members/me", Some(&token), None).await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "application/json; charset=UTF-8"
        );
        assert_eq!(text(response).await, r#"{"error":"Invalid token."}"#);

        // A second logout with the same token never reaches the handler.
        let response = call(&app, Method::POST, "/api/members/logout", Some(&token), None).await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn protected_route_without_token_is_forbidden() {
        let app = router(AppState::default());
        let response = call(&app, Method::GET, "/api/members/me", None, None).await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert_eq!(
            text(response).await,
            r#"{"error":"Authentication required."}"#
        );
    }

    #[tokio::test]
    async fn member_lookups_follow_classification() {
        let app = router(AppState::default());
        let token = register_and_login(&app, "a@example.com").await;

        let response = call(&app, Method::GET, "/api/members/1", None, None).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["email"], "a@example.com");

        let response = call(&app, Method::GET, "/api/members/99", None, None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = call(&app, Method::GET, "/api/members/email/a@example.com", None, None).await;
        assert_eq!(response.status(), StatusCode::OK);

        let response = call(&app, Method::GET, "/api/members", None, None).await;
        assert_eq!(json_body(response).await.as_array().unwrap().len(), 1);

        let response = call(&app, Method::GET, "/api/members/abc", None, None).await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        // Authenticated, the non-numeric id reaches routing and fails to parse.
        let response = call(&app, Method::GET, "/api/members/abc", Some(&token), None).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn duplicate_registration_conflicts() {
        let app = router(AppState::default());
        register_and_login(&app, "a@example.com").await;

        let response = call(
            &app,
            Method::POST,
            "/api/members/register",
            None,
            Some(json!({ "email": "a@example.com", "password": "other-password" })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CONFLICT);
        assert_eq!(
            json_body(response).await["error"],
            "Email already exists: a@example.com"
        );
    }

    #[tokio::test]
    async fn wrong_password_is_rejected() {
        let app = router(AppState::default());
        register_and_login(&app, "a@example.com").await;

        let response = call(
            &app,
            Method::POST,
            "/api/members/login",
            None,
            Some(json!({ "email": "a@example.com", "password": "nope" })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["error"], "Bad credentials");
    }

    #[tokio::test]
    async fn token_of_deleted_identity_is_invalid() {
        let issuing = AppState::default();
        let token = {
            let app = router(issuing.clone());
            register_and_login(&app, "a@example.com").await
        };

        // Same secret, empty directory: the subject no longer resolves.
        let fresh = AppState::default();
        let app = router(fresh);
        let response = call(&app, Method::GET, "/api/members/me", Some(&token), None).await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert_eq!(text(response).await, r#"{"error":"Invalid token."}"#);
    }

    #[tokio::test]
    async fn uploads_are_served_without_credentials() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("hello.txt"), "hi").unwrap();
        let app = router(AppState::default().with_upload_dir(dir.path().to_path_buf()));

        let response = call(&app, Method::GET, "/uploads/hello.txt", None, None).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(text(response).await, "hi");

        let response = call(&app, Method::GET, "/uploads/missing.txt", None, None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn unmatched_paths_are_gated() {
        let app = router(AppState::default());
        let response = call(&app, Method::GET, "/docs", None, None).await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let response = call(&app, Method::GET, "/api/orders", None, None).await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn openapi_registers_bearer_scheme() {
        let doc = ApiDoc::openapi();
        let components = doc.components.unwrap();
        assert!(components.security_schemes.contains_key("bearer"));
    }
}
