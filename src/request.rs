//! Inbound request shape seen by the resolver.

use std::collections::HashMap;

/// A request path plus its named parameters.
///
/// Parameter names are case-sensitive. When a name repeats, the first value
/// is kept.
///
/// ```rust
/// use mvc_core::Request;
///
/// let request = Request::from_uri("/sample/user/show?id=1&id=2&name=J%C3%BCrgen");
/// assert_eq!(request.path(), "/sample/user/show");
/// assert_eq!(request.parameter("id"), Some("1"));
/// assert_eq!(request.parameter("name"), Some("Jürgen"));
/// assert_eq!(request.parameter("ID"), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Request {
    path: String,
    parameters: HashMap<String, String>,
}

impl Request {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            parameters: HashMap::new(),
        }
    }

    /// Builds a request from a path with an optional `?query` part.
    pub fn from_uri(path_and_query: &str) -> Self {
        match path_and_query.split_once('?') {
            Some((path, query)) => Self::new(path).with_query(query),
            None => Self::new(path_and_query),
        }
    }

    /// Adds the parameters of a URL-encoded query string.
    #[must_use]
    pub fn with_query(mut self, query: &str) -> Self {
        for (name, value) in url::form_urlencoded::parse(query.as_bytes()) {
            self.parameters
                .entry(name.into_owned())
                .or_insert_with(|| value.into_owned());
        }
        self
    }

    /// Adds a single parameter, keeping an existing value with the same name.
    #[must_use]
    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.parameters
            .entry(name.into())
            .or_insert_with(|| value.into());
        self
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn parameter(&self, name: &str) -> Option<&str> {
        self.parameters.get(name).map(String::as_str)
    }

    pub fn parameters(&self) -> &HashMap<String, String> {
        &self.parameters
    }
}
