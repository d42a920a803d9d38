//! Rendering capability consumed by request handlers.

use crate::{Error, ModelAndView, Result};

/// Turns a view name and a model into the response body.
pub trait ViewRenderer: Send + Sync {
    fn render(&self, view: &str, model: &ModelAndView) -> Result<String>;

    /// Media type of the rendered output.
    fn content_type(&self) -> &'static str {
        "text/html; charset=utf-8"
    }
}

/// Renders the model as a JSON object, ignoring the view name.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonRenderer {
    pretty: bool,
}

impl JsonRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Emits indented JSON.
    pub fn pretty() -> Self {
        Self { pretty: true }
    }
}

impl ViewRenderer for JsonRenderer {
    fn render(&self, view: &str, model: &ModelAndView) -> Result<String> {
        let rendered = if self.pretty {
            serde_json::to_string_pretty(model)
        } else {
            serde_json::to_string(model)
        };
        rendered.map_err(|err| Error::rendering(format!("failed to render view {view}: {err}")))
    }

    fn content_type(&self) -> &'static str {
        "application/json"
    }
}
