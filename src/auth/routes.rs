// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Public path classification.
//!
//! Every inbound request is classified exactly once, before any token work,
//! by walking an ordered rule table. The first rule whose method guard and
//! path matcher both accept the request decides; requests matching no rule
//! require authentication.
//!
//! ## Rule Order
//!
//! | # | Method | Path | Access |
//! |---|--------|------|--------|
//! | 1 | any | `/uploads`, `/uploads/**` | public |
//! | 2 | GET | `/` | public |
//! | 3 | POST | `/api/members/register`, `/api/members/login` | public |
//! | 4 | any | `/h2-console`, `/h2-console/**` | public (operational console) |
//! | 5 | non-GET | any | protected |
//! | 6 | GET | collection listings, `{collection}/{digits}`, `/api/members/email/**` | public |
//! | 7 | any | any | protected |
//!
//! Only all-digit id segments are public: `GET /api/members/42` is public,
//! `GET /api/members/abc` falls through to rule 7.

use axum::http::Method;

/// Which HTTP methods a rule applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MethodGuard {
    /// Every method.
    Any,
    /// `GET` only.
    Get,
    /// `POST` only.
    Post,
    /// Every method except `GET`.
    NonGet,
}

impl MethodGuard {
    /// Whether `method` passes this guard.
    pub fn admits(&self, method: &Method) -> bool {
        match self {
            MethodGuard::Any => true,
            MethodGuard::Get => method == Method::GET,
            MethodGuard::Post => method == Method::POST,
            MethodGuard::NonGet => method != Method::GET,
        }
    }
}

/// How a rule matches the request path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathMatcher {
    /// Every path.
    AnyPath,
    /// The path equals the pattern.
    Exact(&'static str),
    /// The path starts with the pattern.
    Prefix(&'static str),
    /// The path equals the base, or continues it with `/`.
    ExactOrPrefix(&'static str),
    /// `{base}/{id}` where `id` is a non-empty run of ASCII digits.
    NumericIdSuffix(&'static str),
}

impl PathMatcher {
    /// Whether `path` matches this pattern.
    pub fn matches(&self, path: &str) -> bool {
        match *self {
            PathMatcher::AnyPath => true,
            PathMatcher::Exact(pattern) => path == pattern,
            PathMatcher::Prefix(pattern) => path.starts_with(pattern),
            PathMatcher::ExactOrPrefix(base) => path
                .strip_prefix(base)
                .is_some_and(|rest| rest.is_empty() || rest.starts_with('/')),
            PathMatcher::NumericIdSuffix(base) => path
                .strip_prefix(base)
                .and_then(|rest| rest.strip_prefix('/'))
                .is_some_and(is_numeric_segment),
        }
    }
}

fn is_numeric_segment(segment: &str) -> bool {
    !segment.is_empty() && segment.bytes().all(|b| b.is_ascii_digit())
}

/// Access decision attached to a rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Public,
    Protected,
}

/// One entry of the classification table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteRule {
    pub name: &'static str,
    pub method: MethodGuard,
    pub path: PathMatcher,
    pub access: Access,
}

impl RouteRule {
    const fn new(
        name: &'static str,
        method: MethodGuard,
        path: PathMatcher,
        access: Access,
    ) -> Self {
        Self {
            name,
            method,
            path,
            access,
        }
    }

    /// Whether this rule decides the given request.
    pub fn applies(&self, method: &Method, path: &str) -> bool {
        self.method.admits(method) && self.path.matches(path)
    }
}

/// The gateway's rule table, evaluated top to bottom.
pub static DEFAULT_RULES: &[RouteRule] = &[
    RouteRule::new(
        "uploads",
        MethodGuard::Any,
        PathMatcher::ExactOrPrefix("/uploads"),
        Access::Public,
    ),
    RouteRule::new(
        "root",
        MethodGuard::Get,
        PathMatcher::Exact("/"),
        Access::Public,
    ),
    RouteRule::new(
        "member-register",
        MethodGuard::Post,
        PathMatcher::Exact("/api/members/register"),
        Access::Public,
    ),
    RouteRule::new(
        "member-login",
        MethodGuard::Post,
        PathMatcher::Exact("/api/members/login"),
        Access::Public,
    ),
    // Operational exception, not a security boundary.
    RouteRule::new(
        "h2-console",
        MethodGuard::Any,
        PathMatcher::ExactOrPrefix("/h2-console"),
        Access::Public,
    ),
    RouteRule::new(
        "non-get-requires-auth",
        MethodGuard::NonGet,
        PathMatcher::AnyPath,
        Access::Protected,
    ),
    RouteRule::new(
        "member-list",
        MethodGuard::Get,
        PathMatcher::Exact("/api/members"),
        Access::Public,
    ),
    RouteRule::new(
        "member-by-id",
        MethodGuard::Get,
        PathMatcher::NumericIdSuffix("/api/members"),
        Access::Public,
    ),
    RouteRule::new(
        "member-by-email",
        MethodGuard::Get,
        PathMatcher::Prefix("/api/members/email/"),
        Access::Public,
    ),
    RouteRule::new(
        "main-slide-list",
        MethodGuard::Get,
        PathMatcher::Exact("/api/main-slides"),
        Access::Public,
    ),
    RouteRule::new(
        "main-slide-by-id",
        MethodGuard::Get,
        PathMatcher::NumericIdSuffix("/api/main-slides"),
        Access::Public,
    ),
    RouteRule::new(
        "product-list",
        MethodGuard::Get,
        PathMatcher::Exact("/api/products"),
        Access::Public,
    ),
    RouteRule::new(
        "product-by-id",
        MethodGuard::Get,
        PathMatcher::NumericIdSuffix("/api/products"),
        Access::Public,
    ),
];

/// Immutable, ordered route classifier. Cheap to clone and share.
#[derive(Debug, Clone, Copy)]
pub struct PathClassifier {
    rules: &'static [RouteRule],
}

impl PathClassifier {
    /// Build a classifier over a custom rule table.
    pub const fn new(rules: &'static [RouteRule]) -> Self {
        Self { rules }
    }

    /// The first rule deciding this request, if any.
    pub fn matching_rule(&self, method: &Method, path: &str) -> Option<&'static RouteRule> {
        self.rules.iter().find(|rule| rule.applies(method, path))
    }

    /// Whether the request may proceed without credentials.
    pub fn is_public(&self, method: &Method, path: &str) -> bool {
        self.matching_rule(method, path)
            .is_some_and(|rule| rule.access == Access::Public)
    }
}

impl Default for PathClassifier {
    fn default() -> Self {
        Self::new(DEFAULT_RULES)
    }
}

/// Classify against [`DEFAULT_RULES`].
pub fn is_public(method: &Method, path: &str) -> bool {
    PathClassifier::default().is_public(method, path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule_name(method: Method, path: &str) -> Option<&'static str> {
        PathClassifier::default()
            .matching_rule(&method, path)
            .map(|rule| rule.name)
    }

    #[test]
    fn uploads_are_public_for_every_method() {
        for method in [Method::GET, Method::POST, Method::PUT, Method::DELETE] {
            assert!(is_public(&method, "/uploads"));
            assert!(is_public(&method, "/uploads/"));
            assert!(is_public(&method, "/uploads/products/a.png"));
        }
        assert!(!is_public(&Method::GET, "/uploadsx"));
        assert!(!is_public(&Method::POST, "/uploads-private/a.png"));
    }

    #[test]
    fn root_is_public_for_get_only() {
        assert!(is_public(&Method::GET, "/"));
        assert!(!is_public(&Method::POST, "/"));
    }

    #[test]
    fn register_and_login_are_public_for_post_only() {
        assert!(is_public(&Method::POST, "/api/members/register"));
        assert!(is_public(&Method::POST, "/api/members/login"));
        assert!(!is_public(&Method::GET, "/api/members/register"));
        assert!(!is_public(&Method::GET, "/api/members/login"));
        assert!(!is_public(&Method::POST, "/api/members/logout"));
    }

    #[test]
    fn console_is_public_for_any_method() {
        assert!(is_public(&Method::GET, "/h2-console"));
        assert!(is_public(&Method::POST, "/h2-console/login.do"));
        assert!(!is_public(&Method::GET, "/h2-consoles"));
    }

    #[test]
    fn non_get_requests_require_auth() {
        assert!(!is_public(&Method::POST, "/api/members"));
        assert!(!is_public(&Method::PUT, "/api/products/1"));
        assert!(!is_public(&Method::DELETE, "/api/main-slides/1"));
        assert!(!is_public(&Method::HEAD, "/api/products"));
        assert_eq!(
            rule_name(Method::PATCH, "/api/products/1"),
            Some("non-get-requires-auth")
        );
    }

    #[test]
    fn collection_listings_are_public() {
        assert!(is_public(&Method::GET, "/api/members"));
        assert!(is_public(&Method::GET, "/api/main-slides"));
        assert!(is_public(&Method::GET, "/api/products"));
    }

    #[test]
    fn numeric_ids_are_public_other_segments_are_not() {
        assert!(is_public(&Method::GET, "/api/members/42"));
        assert!(is_public(&Method::GET, "/api/main-slides/7"));
        assert!(is_public(&Method::GET, "/api/products/0012"));

        assert!(!is_public(&Method::GET, "/api/members/abc"));
        assert!(!is_public(&Method::GET, "/api/members/42a"));
        assert!(!is_public(&Method::GET, "/api/members/"));
        assert!(!is_public(&Method::GET, "/api/members/42/orders"));
        assert!(!is_public(&Method::GET, "/api/members/me"));
        assert!(!is_public(&Method::GET, "/api/products/-1"));
        assert_eq!(rule_name(Method::GET, "/api/members/abc"), None);
    }

    #[test]
    fn email_lookups_are_public_by_prefix() {
        assert!(is_public(&Method::GET, "/api/members/email/a@b.com"));
        assert!(!is_public(&Method::GET, "/api/members/email"));
        assert!(!is_public(&Method::DELETE, "/api/members/email/a@b.com"));
    }

    #[test]
    fn unknown_paths_require_auth() {
        assert!(!is_public(&Method::GET, "/docs"));
        assert!(!is_public(&Method::GET, "/api/orders"));
        assert!(!is_public(&Method::GET, ""));
    }

    #[test]
    fn earlier_rules_take_precedence() {
        assert_eq!(rule_name(Method::DELETE, "/uploads/a.png"), Some("uploads"));
        assert_eq!(
            rule_name(Method::POST, "/api/members/register"),
            Some("member-register")
        );
    }

    #[test]
    fn custom_rule_table_is_respected() {
        static ONLY_HEALTH: &[RouteRule] = &[RouteRule::new(
            "health",
            MethodGuard::Get,
            PathMatcher::Exact("/health"),
            Access::Public,
        )];
        let classifier = PathClassifier::new(ONLY_HEALTH);
        assert!(classifier.is_public(&Method::GET, "/health"));
        assert!(!classifier.is_public(&Method::GET, "/"));
    }

    #[test]
    fn matchers_behave_independently() {
        assert!(PathMatcher::AnyPath.matches("/anything"));
        assert!(PathMatcher::Exact("/a").matches("/a"));
        assert!(!PathMatcher::Exact("/a").matches("/a/"));
        assert!(PathMatcher::Prefix("/a/").matches("/a/b"));
        assert!(PathMatcher::ExactOrPrefix("/a").matches("/a"));
        assert!(PathMatcher::ExactOrPrefix("/a").matches("/a/b"));
        assert!(!PathMatcher::ExactOrPrefix("/a").matches("/ab"));
        assert!(PathMatcher::NumericIdSuffix("/a").matches("/a/123"));
        assert!(!PathMatcher::NumericIdSuffix("/a").matches("/a/12x"));

        assert!(MethodGuard::NonGet.admits(&Method::POST));
        assert!(!MethodGuard::NonGet.admits(&Method::GET));
        assert!(MethodGuard::Any.admits(&Method::OPTIONS));
    }
}
