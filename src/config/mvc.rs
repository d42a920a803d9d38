use {
    crate::{Error, Result},
    serde::Deserialize,
};

///
/// Configuration for the routing and dispatch core.
///
#[derive(Debug, Clone, Deserialize, Default)]
pub struct MvcConfig {
    /// URL prefix under which the application is mounted, e.g. `/sample`.
    /// The default `context_path` is empty, mounting the application at the root.
    /// Must either be empty or start with `/`, and must not end with `/`.
    #[serde(default)]
    pub context_path: String,

    /// Suffix appended to derived view names, e.g. `.html` turns `user/show`
    /// into `user/show.html`. No suffix by default.
    #[serde(default)]
    pub view_suffix: Option<String>,
}

impl MvcConfig {
    pub fn validate(&self) -> Result<()> {
        let path = &self.context_path;
        if path.is_empty() {
            return Ok(());
        }
        if !path.starts_with('/') {
            return Err(Error::config(format!(
                "context_path '{path}' must start with '/' (or be empty to mount at the root)"
            )));
        }
        if path.ends_with('/') {
            return Err(Error::config(format!(
                "context_path '{path}' must not end with '/'"
            )));
        }
        Ok(())
    }
}
