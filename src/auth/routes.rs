// Route classification for the auth chain: which paths skip authentication
// entirely, and which operate above tenant scope.

use axum::http::Method;

pub const API_PREFIX: &str = "api/v1";

/// Paths that bypass authentication and authorization. `*` matches exactly
/// one segment.
const EXEMPT_ROUTES: &[(&str, &str)] = &[
    ("GET", "/health"),
    ("GET", "/api/v1/status"),
    ("POST", "/*/api/v1/auth/login"),
];

/// Path prefixes of routes with no tenant segment.
const GLOBAL_PREFIXES: &[&str] = &["/health", "/api/v1/status", "/api/v1/mesh", "/api/v1/tenants"];

pub fn is_exempt(method: &Method, path: &str) -> bool {
    if *method == Method::OPTIONS {
        return true;
    }
    EXEMPT_ROUTES
        .iter()
        .any(|(m, pattern)| *m == method.as_str() && matches_pattern(pattern, path))
}

pub fn is_global(path: &str) -> bool {
    let path = trim_trailing_slash(path);
    GLOBAL_PREFIXES
        .iter()
        .any(|prefix| path == *prefix || path.starts_with(&format!("{}/", prefix)))
}

/// Tenant identifier from `/{tenant_url}/api/v1/...`. Empty for global
/// routes and for anything that does not have the tenant shape.
pub fn tenant_url_from_path(path: &str) -> String {
    if is_global(path) {
        return String::new();
    }
    let mut segments = path.trim_start_matches('/').splitn(3, '/');
    match (segments.next(), segments.next(), segments.next()) {
        (Some(tenant), Some("api"), Some(rest)) if !tenant.is_empty() && (rest == "v1" || rest.starts_with("v1/")) => {
            tenant.to_string()
        }
        _ => String::new(),
    }
}

fn matches_pattern(pattern: &str, path: &str) -> bool {
    let pattern: Vec<&str> = pattern.trim_matches('/').split('/').collect();
    let path: Vec<&str> = trim_trailing_slash(path).trim_start_matches('/').split('/').collect();
    pattern.len() == path.len()
        && pattern
            .iter()
            .zip(path.iter())
            .all(|(p, s)| (*p == "*" && !s.is_empty()) || p == s)
}

fn trim_trailing_slash(path: &str) -> &str {
    if path.len() > 1 {
        path.trim_end_matches('/')
    } else {
        path
    }
}
