// Permission triple derived from the shape of the request URL.
//
// Handlers never declare their own permission checks; the authorization
// middleware derives (resource_type, resource_id, action) here. Any new
// route whose suffix carries meaning needs a matching entry in
// ACTION_OVERRIDES, and a test in tests/20_authorization.rs.

use axum::http::Method;

use super::routes::API_PREFIX;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Permission {
    pub resource_type: String,
    pub resource_id: String,
    pub action: String,
}

/// How an override is matched against the request.
enum Rule {
    /// The first segment after the resource id (or the collection action
    /// segment) equals the given value.
    Suffix(&'static str),
    /// Resource type equals the value and no resource id is present.
    Collection(&'static str),
}

const ACTION_OVERRIDES: &[(&str, Rule, &str)] = &[
    ("POST", Rule::Suffix("logout"), "logout"),
    ("GET", Rule::Collection("workspaces"), "list_workspaces"),
    ("GET", Rule::Collection("tenants"), "list_tenants"),
    ("POST", Rule::Suffix("connect"), "connect"),
    ("POST", Rule::Suffix("reconnect"), "connect"),
    ("POST", Rule::Suffix("disconnect"), "disconnect"),
    ("DELETE", Rule::Suffix("disconnect"), "disconnect"),
    ("POST", Rule::Suffix("copy-data"), "copy_data"),
    ("POST", Rule::Suffix("rules"), "update"),
];

/// (method, resource_type, segment) routes where the segment names an action
/// on the collection rather than a resource id.
const COLLECTION_ROUTES: &[(&str, &str, &str)] = &[
    ("POST", "auth", "login"),
    ("POST", "auth", "logout"),
    ("GET", "auth", "profile"),
    ("POST", "databases", "connect"),
];

pub fn derive_permission(method: &Method, path: &str) -> Permission {
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    let prefix: Vec<&str> = API_PREFIX.split('/').collect();

    let start = segments
        .windows(prefix.len())
        .position(|window| window == prefix.as_slice())
        .map(|i| i + prefix.len());

    let (resource_type, mut resource_id, tail) = match start {
        Some(i) => (
            segments.get(i).copied().unwrap_or_default(),
            segments.get(i + 1).copied().unwrap_or_default(),
            segments.get(i + 2..).unwrap_or_default(),
        ),
        None => ("", "", &[][..]),
    };

    let mut suffix = tail.first().copied();
    if tail.is_empty()
        && COLLECTION_ROUTES
            .iter()
            .any(|(m, kind, segment)| *m == method.as_str() && *kind == resource_type && *segment == resource_id)
    {
        suffix = Some(resource_id);
        resource_id = "";
    }

    let action = ACTION_OVERRIDES
        .iter()
        .find(|(m, rule, _)| {
            *m == method.as_str()
                && match rule {
                    Rule::Suffix(expected) => suffix == Some(*expected),
                    Rule::Collection(kind) => resource_type == *kind && resource_id.is_empty(),
                }
        })
        .map(|(_, _, action)| *action)
        .unwrap_or_else(|| method_action(method));

    Permission {
        resource_type: resource_type.to_string(),
        resource_id: resource_id.to_string(),
        action: action.to_string(),
    }
}

fn method_action(method: &Method) -> &'static str {
    match *method {
        Method::POST => "create",
        Method::PUT | Method::PATCH => "update",
        Method::DELETE => "delete",
        _ => "read",
    }
}
