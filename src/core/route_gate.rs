//! Request access gate.
//!
//! A path is checked against four route sets and the result, combined with
//! whether a session is present, yields one of three outcomes: let the
//! request through, send a signed-in user away from the login/register pages,
//! or send an anonymous user to the login page with the requested destination
//! preserved in `callbackUrl`.
//!
//! Precedence is fixed:
//!
//! 1. API-auth prefix → always continue
//! 2. auth-only route → redirect signed-in users to the landing page
//! 3. platform prefix without a session → login
//! 4. anything not public without a session → login

use crate::domain::model::{GateDecision, RouteClassification};
use crate::utils::error::Result;
use crate::utils::validation::{validate_non_empty_string, validate_route_path, Validate};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouteTable {
    /// Raw string prefix, no segment boundary check.
    pub api_auth_prefix: String,
    /// Exact matches.
    pub public_routes: Vec<String>,
    /// Segment-aware prefixes: `/docs` covers `/docs` and `/docs/...`, not `/docsx`.
    pub public_prefixes: Vec<String>,
    /// Exact matches.
    pub auth_routes: Vec<String>,
    /// Segment-aware prefixes.
    pub platform_prefixes: Vec<String>,
    pub default_login_redirect: String,
    pub login_path: String,
}

impl Default for RouteTable {
    fn default() -> Self {
        Self {
            api_auth_prefix: "/api/auth".to_string(),
            public_routes: to_strings(&["/", "/new-verification"]),
            public_prefixes: Vec::new(),
            auth_routes: to_strings(&["/login", "/register", "/error", "/reset", "/new-password"]),
            platform_prefixes: to_strings(&[
                "/dashboard",
                "/project",
                "/task",
                "/wallet",
                "/daily",
                "/resource",
            ]),
            default_login_redirect: "/dashboard".to_string(),
            login_path: "/login".to_string(),
        }
    }
}

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Same output as JavaScript's `encodeURIComponent`: `!'()*` stay literal.
pub fn encode_uri_component(value: &str) -> String {
    urlencoding::encode(value)
        .replace("%21", "!")
        .replace("%27", "'")
        .replace("%28", "(")
        .replace("%29", ")")
        .replace("%2A", "*")
}

fn matches_segment_prefix(path: &str, prefix: &str) -> bool {
    match path.strip_prefix(prefix) {
        Some(rest) => rest.is_empty() || rest.starts_with('/') || prefix.ends_with('/'),
        None => false,
    }
}

impl RouteTable {
    pub fn classify(&self, path: &str) -> RouteClassification {
        RouteClassification {
            api_auth: path.starts_with(&self.api_auth_prefix),
            public: self.public_routes.iter().any(|r| r == path)
                || self
                    .public_prefixes
                    .iter()
                    .any(|p| matches_segment_prefix(path, p)),
            auth_only: self.auth_routes.iter().any(|r| r == path),
            platform: self
                .platform_prefixes
                .iter()
                .any(|p| matches_segment_prefix(path, p)),
        }
    }

    /// Paths the gate never sees: framework internals and anything whose last
    /// segment looks like a file (`/logo.png`, `/robots.txt`). `/api` and
    /// `/trpc` paths are always gated, file extension or not.
    pub fn is_excluded(path: &str) -> bool {
        if path.starts_with("/api") || path.starts_with("/trpc") {
            return false;
        }
        if path.starts_with("/_next") {
            return true;
        }

        let last_segment = path.rsplit('/').next().unwrap_or_default();
        match last_segment.rsplit_once('.') {
            Some((stem, ext)) => {
                !stem.is_empty()
                    && !ext.is_empty()
                    && ext.chars().all(|c| c.is_alphanumeric() || c == '_')
            }
            None => false,
        }
    }
}

impl Validate for RouteTable {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("routes.api_auth_prefix", &self.api_auth_prefix)?;
        validate_route_path("routes.api_auth_prefix", &self.api_auth_prefix)?;
        validate_route_path("routes.default_login_redirect", &self.default_login_redirect)?;
        validate_route_path("routes.login_path", &self.login_path)?;

        for route in &self.public_routes {
            validate_route_path("routes.public_routes", route)?;
        }
        for route in &self.public_prefixes {
            validate_route_path("routes.public_prefixes", route)?;
        }
        for route in &self.auth_routes {
            validate_route_path("routes.auth_routes", route)?;
        }
        for route in &self.platform_prefixes {
            validate_route_path("routes.platform_prefixes", route)?;
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct RouteGate {
    table: RouteTable,
}

impl RouteGate {
    pub fn new(table: RouteTable) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &RouteTable {
        &self.table
    }

    /// `query` is the raw query string without the leading `?`.
    pub fn decide(&self, path: &str, query: Option<&str>, is_logged_in: bool) -> GateDecision {
        let class = self.table.classify(path);

        if class.api_auth {
            return GateDecision::Continue;
        }

        if class.auth_only {
            if is_logged_in {
                tracing::debug!(path, "Signed-in user on auth route, redirecting");
                return GateDecision::Redirect {
                    location: self.table.default_login_redirect.clone(),
                };
            }
            return GateDecision::Continue;
        }

        if class.platform && !is_logged_in {
            tracing::debug!(path, "Anonymous request to platform route");
            return self.login_redirect(path, query);
        }

        if !is_logged_in && !class.public {
            tracing::debug!(path, "Anonymous request to protected route");
            return self.login_redirect(path, query);
        }

        GateDecision::Continue
    }

    /// Splits `target` (`/path?query`) and decides on it.
    pub fn decide_target(&self, target: &str, is_logged_in: bool) -> GateDecision {
        let (path, query) = match target.split_once('?') {
            Some((path, query)) => (path, Some(query)),
            None => (target, None),
        };
        self.decide(path, query, is_logged_in)
    }

    fn login_redirect(&self, path: &str, query: Option<&str>) -> GateDecision {
        let callback = match query.filter(|q| !q.is_empty()) {
            Some(query) => format!("{}?{}", path, query),
            None => path.to_string(),
        };

        GateDecision::Redirect {
            location: format!(
                "{}?callbackUrl={}",
                self.table.login_path,
                encode_uri_component(&callback)
            ),
        }
    }
}
