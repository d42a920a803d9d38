//! URL decomposition into controller and action segments.

use {
    crate::{Error, Result},
    regex::Regex,
};

/// Compiled matcher for `{context}/{controller}[/{action}]` request paths.
///
/// The context path is matched literally. The controller segment is exactly
/// one path component; the action segment is everything after the `/` that
/// follows it and may itself contain `/`.
#[derive(Debug, Clone)]
pub struct RoutePattern {
    context_path: String,
    regex: Regex,
}

/// The two segments captured from a request path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteSegments<'a> {
    pub controller: &'a str,
    /// Empty when the path stops after the controller segment.
    pub action: &'a str,
}

impl RoutePattern {
    pub fn new(context_path: &str) -> Result<Self> {
        let regex = Regex::new(&format!(
            r"^{}/([^/]+)(?:/(.*))?$",
            regex::escape(context_path)
        ))?;
        Ok(Self {
            context_path: context_path.to_string(),
            regex,
        })
    }

    pub fn context_path(&self) -> &str {
        &self.context_path
    }

    /// Splits `path` into its controller and action segments.
    ///
    /// Fails with `MalformedUrl` when the path is outside the context path or
    /// has no controller segment.
    pub fn decompose<'a>(&self, path: &'a str) -> Result<RouteSegments<'a>> {
        let captures = self
            .regex
            .captures(path)
            .ok_or_else(|| Error::malformed_url(path))?;

        let controller = captures
            .get(1)
            .map(|m| m.as_str())
            .ok_or_else(|| Error::malformed_url(path))?;
        let action = captures.get(2).map_or("", |m| m.as_str());

        Ok(RouteSegments { controller, action })
    }
}
