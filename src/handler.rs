//! Per-request handler produced by the resolver.

use {
    crate::{Action, ControllerInstance, ControllerType, ModelAndView, Result, ViewRenderer},
    std::{any::Any, fmt, sync::Arc},
};

/// A resolved, ready-to-invoke unit of work for one request.
///
/// Bundles the rendering capability, the controller instance, the action and
/// the single extracted parameter value. Built once per request and consumed
/// by [`handle`](RequestHandler::handle) or [`invoke`](RequestHandler::invoke).
pub struct RequestHandler {
    renderer: Arc<dyn ViewRenderer>,
    controller_type: ControllerType,
    controller: ControllerInstance,
    action: Arc<dyn Action>,
    param: Option<String>,
    view_suffix: Option<String>,
}

impl RequestHandler {
    pub(crate) fn new(
        renderer: Arc<dyn ViewRenderer>,
        controller_type: ControllerType,
        controller: ControllerInstance,
        action: Arc<dyn Action>,
        param: Option<String>,
    ) -> Self {
        Self {
            renderer,
            controller_type,
            controller,
            action,
            param,
            view_suffix: None,
        }
    }

    pub(crate) fn with_view_suffix(mut self, suffix: Option<String>) -> Self {
        self.view_suffix = suffix;
        self
    }

    pub fn controller(&self) -> &(dyn Any + Send + Sync) {
        &*self.controller
    }

    /// The controller instance as `C`, or `None` if it is another type.
    pub fn controller_as<C: Any>(&self) -> Option<&C> {
        self.controller.downcast_ref::<C>()
    }

    pub fn controller_type(&self) -> ControllerType {
        self.controller_type
    }

    pub fn action_name(&self) -> &str {
        self.action.name()
    }

    /// The extracted parameter value. Always `None` for actions without a
    /// required parameter.
    pub fn param(&self) -> Option<&str> {
        self.param.as_deref()
    }

    /// Runs the action and returns its model without rendering.
    pub fn handle(self) -> Result<ModelAndView> {
        self.run()
    }

    /// Runs the action and renders its model into the response body.
    pub fn invoke(self) -> Result<String> {
        let model = self.run()?;
        let view = self.view_name(&model);
        tracing::debug!(
            controller = %self.controller_type,
            action = %self.action.name(),
            view = %view,
            "Rendering view"
        );
        self.renderer.render(&view, &model)
    }

    /// The view `model` renders with: its explicit view if set, otherwise
    /// `{controller}/{action}` where the controller part is the type name
    /// without a `Controller` suffix, lowercased (`UserController` → `user`).
    pub fn view_name(&self, model: &ModelAndView) -> String {
        let mut view = match model.view() {
            Some(view) => view.to_string(),
            None => {
                let name = self.controller_type.short_name();
                let name = name.strip_suffix("Controller").unwrap_or(name);
                format!("{}/{}", name.to_lowercase(), self.action.name())
            }
        };
        if let Some(suffix) = &self.view_suffix {
            view.push_str(suffix);
        }
        view
    }

    fn run(&self) -> Result<ModelAndView> {
        let param = match self.action.required_param() {
            Some(_) => self.param.as_deref(),
            None => None,
        };
        self.action.invoke(&*self.controller, param)
    }
}

impl fmt::Debug for RequestHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestHandler")
            .field("controller", &self.controller_type)
            .field("action", &self.action.name())
            .field("param", &self.param)
            .finish()
    }
}
