//! HTTP boundary: serves a [`RequestHandlerResolver`] through axum.
//!
//! Every request, whatever its method, goes through the same pipeline:
//!
//! ```text
//! HTTP request ─> Request { path, query parameters }
//!              ─> RequestHandlerResolver::resolve ─> RequestHandler::invoke
//!              ─> 200 + rendered body, or the error's status + JSON body
//! ```

use {
    crate::{Request, RequestHandlerResolver, RequestIdGenerator, Result},
    axum::{
        Router,
        extract::State,
        http::{Uri, header},
        response::{IntoResponse, Response},
    },
    std::sync::Arc,
    tower_http::{
        request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
        trace::TraceLayer,
    },
};

/// Runs resolved handlers for incoming requests.
#[derive(Clone)]
pub struct Dispatcher {
    resolver: Arc<RequestHandlerResolver>,
}

impl Dispatcher {
    pub fn new(resolver: RequestHandlerResolver) -> Self {
        Self {
            resolver: Arc::new(resolver),
        }
    }

    /// Resolves and invokes the handler for `request`, returning the rendered output.
    pub fn dispatch(&self, request: &Request) -> Result<String> {
        self.resolver.resolve(request)?.invoke()
    }

    /// Builds an axum router that dispatches every request, with request ID
    /// and trace layers installed.
    ///
    /// ```rust,no_run
    /// use mvc_core::{Config, Container, Dispatcher, JsonRenderer, RequestHandlerResolver};
    ///
    /// # async fn run() -> Result<(), Box<dyn std::error::Error>> {
    /// let config = Config::from_rust_env()?;
    /// config.setup_tracing();
    ///
    /// let resolver =
    ///     RequestHandlerResolver::create(&config, Vec::new(), Container::new(), JsonRenderer::new())?;
    /// let listener = tokio::net::TcpListener::bind("127.0.0.1:3000").await?;
    /// axum::serve(listener, Dispatcher::new(resolver).into_router()).await?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn into_router(self) -> Router {
        Router::new()
            .fallback(dispatch_http)
            .with_state(self)
            .layer(TraceLayer::new_for_http())
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(SetRequestIdLayer::x_request_id(RequestIdGenerator))
    }
}

async fn dispatch_http(State(dispatcher): State<Dispatcher>, uri: Uri) -> Response {
    let request = match uri.query() {
        Some(query) => Request::new(uri.path()).with_query(query),
        None => Request::new(uri.path()),
    };

    match dispatcher.dispatch(&request) {
        Ok(body) => {
            let content_type = dispatcher.resolver.renderer().content_type();
            ([(header::CONTENT_TYPE, content_type)], body).into_response()
        }
        Err(err) => err.into_response(),
    }
}
