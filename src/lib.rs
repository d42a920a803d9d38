//! # mvc-core
//!
//! The request-routing and dispatch core of a minimal MVC framework: given an
//! incoming request, decide which controller and action handle it, bind the
//! action's request parameter, and produce a handler ready for invocation.
//!
//! # Quick Start
//!
//! ```rust
//! use mvc_core::{
//!     Config, Container, Controller, ControllerDescriptor, JsonRenderer, ModelAndView,
//!     Request, RequestHandlerResolver, Result, action, action_with_param,
//! };
//! use serde::Serialize;
//! use std::sync::Arc;
//!
//! #[derive(Serialize)]
//! struct User {
//!     id: String,
//! }
//!
//! struct UserService;
//!
//! impl UserService {
//!     fn find(&self, id: &str) -> User {
//!         User { id: id.to_string() }
//!     }
//! }
//!
//! struct UserController {
//!     service: Arc<UserService>,
//! }
//!
//! impl UserController {
//!     fn index(&self) -> Result<ModelAndView> {
//!         Ok(ModelAndView::new())
//!     }
//!
//!     fn show(&self, id: Option<&str>) -> Result<ModelAndView> {
//!         ModelAndView::new().add_object("user", self.service.find(id.unwrap_or_default()))
//!     }
//! }
//!
//! impl Controller for UserController {
//!     fn describe() -> ControllerDescriptor {
//!         ControllerDescriptor::of::<Self>("/user")
//!             .action("", action("index", Self::index))
//!             .action("/show", action_with_param("show", "id", Self::show))
//!     }
//! }
//!
//! fn main() -> Result<()> {
//!     let config: Config = r#"
//!         [mvc]
//!         context_path = "/sample"
//!     "#.parse()?;
//!
//!     let container = Container::new()
//!         .singleton(UserService)
//!         .bind(|c: &Container| Ok(UserController { service: c.resolve()? }));
//!
//!     let resolver = RequestHandlerResolver::create(
//!         &config,
//!         [UserController::describe()],
//!         container,
//!         JsonRenderer::new(),
//!     )?;
//!
//!     let request = Request::from_uri("/sample/user/show?id=1");
//!     let output = resolver.resolve(&request)?.invoke()?;
//!     assert_eq!(output, r#"{"user":{"id":"1"}}"#);
//!     Ok(())
//! }
//! ```
//!
//! # Module Organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | `routing` | URL decomposition and the controller → action table ([`RoutingTable`]) |
//! | `resolver` | Per-request resolution into a [`RequestHandler`] ([`RequestHandlerResolver`]) |
//! | `controller` | Controller identity, [`Action`]s and discovery metadata |
//! | `container` | Instantiation capability ([`Injector`], [`Container`]) |
//! | `view` | Rendering capability ([`ViewRenderer`], [`JsonRenderer`]) |
//! | `dispatch` | axum boundary ([`Dispatcher`]) |
//! | `config` | Configuration loading and validation ([`Config`]) |
//! | `error` | Error types and handling ([`Error`]) |
//!
//! # Error Handling
//!
//! Routing failures reach callers as [`ErrorKind::ActionNotFound`]; the
//! routing sub-cause (`MalformedUrl`, `ControllerNotFound`, `ActionNotFound`)
//! is kept for diagnostics and returned by [`Error::cause_kind`]. At the HTTP
//! boundary errors convert to structured JSON responses:
//!
//! ```json
//! {
//!   "error_code": "ACTION_NOT_FOUND",
//!   "message": "can not find action for requested URI /sample/orders",
//!   "details": "can't find class for controller url: orders"
//! }
//! ```
mod config;
mod container;
mod controller;
mod dispatch;
mod error;
mod handler;
mod model;
mod request;
mod resolver;
mod routing;
mod utils;
mod view;

pub use config::*;
pub use container::*;
pub use controller::*;
pub use dispatch::*;
pub use error::*;
pub use handler::*;
pub use model::*;
pub use request::*;
pub use resolver::*;
pub use routing::*;
pub use utils::*;
pub use view::*;

pub type Result<T> = std::result::Result<T, Error>;
