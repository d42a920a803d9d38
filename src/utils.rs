//! Small helpers shared by routing, configuration and the HTTP boundary.

use {
    http::{HeaderValue, Request},
    regex::{Captures, Regex},
    std::{env, sync::LazyLock},
    tower_http::request_id::{MakeRequestId, RequestId},
    uuid::Uuid,
};

const X_REQUEST_ID: &str = "x-request-id";

/// `{{ NAME }}` where NAME is an upper-case environment variable name.
static HANDLEBAR_REGEXP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{\s*([A-Z0-9_]+)\s*\}\}").unwrap());

/// Removes a single leading `/` from a URL segment.
///
/// Controller base paths, declared action paths and the action part of a
/// request path are all compared after this normalization, so `/show` and
/// `show` name the same action.
///
/// ```
/// use mvc_core::strip_lead_slash;
///
/// assert_eq!(strip_lead_slash("/user"), "user");
/// assert_eq!(strip_lead_slash("user"), "user");
/// assert_eq!(strip_lead_slash("//user"), "/user");
/// ```
pub fn strip_lead_slash(segment: &str) -> &str {
    segment.strip_prefix('/').unwrap_or(segment)
}

/// Request IDs for the dispatch router.
///
/// Keeps the caller's `x-request-id` so logs correlate across services, and
/// otherwise mints a time-ordered UUIDv7.
#[derive(Debug, Clone, Copy)]
pub struct RequestIdGenerator;

impl MakeRequestId for RequestIdGenerator {
    fn make_request_id<B>(&mut self, req: &Request<B>) -> Option<RequestId> {
        let value = match req.headers().get(X_REQUEST_ID) {
            Some(value) => value.clone(),
            None => HeaderValue::from_str(&Uuid::now_v7().to_string()).ok()?,
        };
        Some(RequestId::new(value))
    }
}

/// Fills `{{ NAME }}` placeholders from the process environment.
///
/// Unset variables become empty strings and are reported with a `warn!`.
///
/// ```
/// use mvc_core::replace_handlebars_with_env;
///
/// assert_eq!(
///     replace_handlebars_with_env("context_path = \"{{ MVC_UNSET_CONTEXT }}\""),
///     "context_path = \"\""
/// );
/// ```
pub fn replace_handlebars_with_env(input: &str) -> String {
    HANDLEBAR_REGEXP
        .replace_all(input, |caps: &Captures| {
            let name = &caps[1];
            env::var(name).unwrap_or_else(|_| {
                tracing::warn!(variable = %name, "Unset environment variable in config");
                String::new()
            })
        })
        .to_string()
}
