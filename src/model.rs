//! Result container returned by controller actions.

use {
    crate::Result,
    serde::Serialize,
    serde_json::{Map, Value},
};

/// Model produced by an action, plus an optional explicit view name.
///
/// When no view is set, the handler derives one from the controller and
/// action names (see [`RequestHandler::view_name`](crate::RequestHandler::view_name)).
///
/// ```rust
/// use mvc_core::ModelAndView;
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct User { id: String }
///
/// let mv = ModelAndView::new()
///     .add_object("user", User { id: "1".into() })
///     .unwrap();
///
/// assert_eq!(mv.get("user").unwrap()["id"], "1");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ModelAndView {
    #[serde(skip)]
    view: Option<String>,
    #[serde(flatten)]
    model: Map<String, Value>,
}

impl ModelAndView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Renders this model with an explicit view instead of the derived one.
    #[must_use]
    pub fn with_view(mut self, view: impl Into<String>) -> Self {
        self.view = Some(view.into());
        self
    }

    /// Adds a serializable object to the model under `key`.
    /// An existing entry with the same key is replaced.
    pub fn add_object(mut self, key: impl Into<String>, value: impl Serialize) -> Result<Self> {
        self.model.insert(key.into(), serde_json::to_value(value)?);
        Ok(self)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.model.get(key)
    }

    pub fn view(&self) -> Option<&str> {
        self.view.as_deref()
    }

    pub fn model(&self) -> &Map<String, Value> {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_object_replaces_existing_key() {
        let mv = ModelAndView::new()
            .add_object("count", 1)
            .and_then(|mv| mv.add_object("count", 2))
            .unwrap();
        assert_eq!(mv.get("count").unwrap(), 2);
        assert_eq!(mv.model().len(), 1);
    }

    #[test]
    fn test_view_is_not_serialized() {
        let mv = ModelAndView::new()
            .with_view("user/list")
            .add_object("page", 3)
            .unwrap();
        assert_eq!(mv.view(), Some("user/list"));
        assert_eq!(serde_json::to_string(&mv).unwrap(), r#"{"page":3}"#);
    }

    #[test]
    fn test_missing_key() {
        assert!(ModelAndView::new().get("user").is_none());
    }
}
