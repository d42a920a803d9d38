//! Per-request resolution: routing, instantiation and parameter binding.

use {
    crate::{
        ActionInfo, Config, ControllerDescriptor, Error, Injector, Request, RequestHandler, Result,
        RoutingTable, ViewRenderer,
    },
    std::sync::Arc,
};

/// Resolves incoming requests into invocable [`RequestHandler`]s.
///
/// Holds only shared, immutable references, so one resolver can serve any
/// number of concurrent requests.
///
/// ```rust
/// use mvc_core::{
///     Config, Container, ControllerDescriptor, JsonRenderer, ModelAndView, Request,
///     RequestHandlerResolver, action_with_param,
/// };
///
/// struct UserController;
///
/// let resolver = RequestHandlerResolver::create(
///     &Config::default().with_context_path("/sample"),
///     [ControllerDescriptor::of::<UserController>("/user").action(
///         "/show",
///         action_with_param("show", "id", |_: &UserController, id| {
///             ModelAndView::new().add_object("id", id)
///         }),
///     )],
///     Container::new().singleton(UserController),
///     JsonRenderer::new(),
/// )
/// .unwrap();
///
/// let handler = resolver.resolve(&Request::from_uri("/sample/user/show?id=1")).unwrap();
/// assert_eq!(handler.invoke().unwrap(), r#"{"id":"1"}"#);
/// ```
#[derive(Clone)]
pub struct RequestHandlerResolver {
    table: Arc<RoutingTable>,
    injector: Arc<dyn Injector>,
    renderer: Arc<dyn ViewRenderer>,
    view_suffix: Option<String>,
}

impl std::fmt::Debug for RequestHandlerResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestHandlerResolver")
            .field("table", &self.table)
            .field("view_suffix", &self.view_suffix)
            .finish_non_exhaustive()
    }
}

impl RequestHandlerResolver {
    pub fn new(
        table: Arc<RoutingTable>,
        injector: Arc<dyn Injector>,
        renderer: Arc<dyn ViewRenderer>,
    ) -> Self {
        Self {
            table,
            injector,
            renderer,
            view_suffix: None,
        }
    }

    /// Validates `config`, builds the routing table from `controllers` under
    /// the configured context path, and wires the capabilities together.
    pub fn create<I, J, R>(config: &Config, controllers: I, injector: J, renderer: R) -> Result<Self>
    where
        I: IntoIterator<Item = ControllerDescriptor>,
        J: Injector + 'static,
        R: ViewRenderer + 'static,
    {
        config.validate()?;
        let table = RoutingTable::build(controllers, &config.mvc.context_path)?;
        let mut resolver = Self::new(Arc::new(table), Arc::new(injector), Arc::new(renderer));
        resolver.view_suffix = config.mvc.view_suffix.clone();
        Ok(resolver)
    }

    pub fn table(&self) -> &RoutingTable {
        &self.table
    }

    pub fn renderer(&self) -> &Arc<dyn ViewRenderer> {
        &self.renderer
    }

    /// Resolves `request` into a handler.
    ///
    /// # Errors
    ///
    /// - `ActionNotFound` for every routing failure; the routing sub-cause is
    ///   available through [`Error::cause_kind`]
    /// - instantiation failures from the injector, unchanged
    pub fn resolve(&self, request: &Request) -> Result<RequestHandler> {
        let uri = request.path();

        let info = self.table.resolve(uri).map_err(|cause| {
            tracing::debug!(
                uri = %uri,
                cause = %cause.kind(),
                reason = %cause,
                "Could not route request"
            );
            Error::unresolved_action(uri, cause)
        })?;

        let controller = self.injector.get(info.controller())?;
        let param = extract_param(request, &info);

        tracing::debug!(
            uri = %uri,
            controller = %info.controller(),
            action = %info.action().name(),
            "Resolved request handler"
        );

        Ok(RequestHandler::new(
            Arc::clone(&self.renderer),
            info.controller(),
            controller,
            Arc::clone(info.action()),
            param,
        )
        .with_view_suffix(self.view_suffix.clone()))
    }
}

fn extract_param(request: &Request, info: &ActionInfo) -> Option<String> {
    info.required_param()
        .and_then(|param| request.parameter(param.name()))
        .map(str::to_string)
}
