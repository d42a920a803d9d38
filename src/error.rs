//! Errors raised while building routes, resolving requests and rendering views.
//!
//! [`Error`] is opaque: match on [`Error::kind`], print it for the message.
//! Each kind has a stable `error_code()` and an HTTP status, and the error
//! turns into a JSON body at the axum boundary.
//!
//! A resolver never leaks routing detail through the kind. Every routing
//! failure becomes [`ErrorKind::ActionNotFound`], and the original failure
//! stays reachable through [`Error::cause_kind`] and the `source()` chain.
//!
//! ```rust
//! use http::StatusCode;
//! use mvc_core::{Error, ErrorKind};
//!
//! let err = Error::unresolved_action("/sample/orders", Error::controller_not_found("orders"));
//!
//! assert_eq!(err.kind(), ErrorKind::ActionNotFound);
//! assert_eq!(err.cause_kind(), Some(ErrorKind::ControllerNotFound));
//! assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
//! assert_eq!(err.to_string(), "can not find action for requested URI /sample/orders");
//! ```

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use std::fmt;
use thiserror::Error;

type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Category of an [`Error`].
///
/// New kinds may be added, so matches need a wildcard arm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ErrorKind {
    /// The path is not `context/{controller}[/{action}]`.
    #[error("malformed url")]
    MalformedUrl,

    #[error("controller not found")]
    ControllerNotFound,

    #[error("action not found")]
    ActionNotFound,

    /// The injector could not produce the controller.
    #[error("instantiation failure")]
    Instantiation,

    #[error("rendering error")]
    Rendering,

    /// Bad TOML, an unset `RUST_ENV`, or a setting that fails validation.
    #[error("configuration error")]
    Configuration,

    #[error("I/O error")]
    Io,

    /// A bug rather than bad input, e.g. an action invoked on the wrong controller.
    #[error("internal error")]
    Internal,
}

impl ErrorKind {
    fn code(self) -> &'static str {
        match self {
            Self::MalformedUrl => "MALFORMED_URL",
            Self::ControllerNotFound => "CONTROLLER_NOT_FOUND",
            Self::ActionNotFound => "ACTION_NOT_FOUND",
            Self::Instantiation => "INSTANTIATION_ERROR",
            Self::Rendering => "RENDERING_ERROR",
            Self::Configuration => "CONFIG_ERROR",
            Self::Io => "IO_ERROR",
            Self::Internal => "INTERNAL_ERROR",
        }
    }

    fn status(self) -> StatusCode {
        match self {
            Self::MalformedUrl => StatusCode::BAD_REQUEST,
            Self::ControllerNotFound | Self::ActionNotFound => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// The crate's error type.
pub struct Error {
    kind: ErrorKind,
    source: BoxError,
}

/// What a resolver-level `ActionNotFound` wraps: the requested URI and the
/// routing failure behind it.
#[derive(Debug, Error)]
#[error("can not find action for requested URI {uri}")]
pub struct UnresolvedAction {
    pub uri: String,
    #[source]
    pub cause: Error,
}

impl Error {
    /// ```rust
    /// use mvc_core::{Error, ErrorKind};
    ///
    /// let err = Error::new(ErrorKind::Rendering, "no template for user/show");
    /// assert_eq!(err.error_code(), "RENDERING_ERROR");
    /// ```
    pub fn new<E>(kind: ErrorKind, error: E) -> Self
    where
        E: Into<BoxError>,
    {
        Self {
            kind,
            source: error.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Kind of the routing failure wrapped by [`Error::unresolved_action`].
    /// `None` for every other error.
    pub fn cause_kind(&self) -> Option<ErrorKind> {
        self.unresolved().map(|unresolved| unresolved.cause.kind())
    }

    /// Stable upper-snake identifier, e.g. `ACTION_NOT_FOUND`.
    pub fn error_code(&self) -> &'static str {
        self.kind.code()
    }

    pub fn status_code(&self) -> StatusCode {
        self.kind.status()
    }

    /// JSON body sent at the HTTP boundary. Unresolved actions carry their
    /// routing cause in `details`.
    pub fn to_error_response(&self) -> ErrorResponse {
        ErrorResponse {
            error_code: self.error_code().to_string(),
            message: self.to_string(),
            details: self.unresolved().map(|unresolved| unresolved.cause.to_string()),
        }
    }

    pub fn into_inner(self) -> BoxError {
        self.source
    }

    fn unresolved(&self) -> Option<&UnresolvedAction> {
        self.source.downcast_ref::<UnresolvedAction>()
    }
}

impl Error {
    pub fn malformed_url(url: impl AsRef<str>) -> Self {
        Self::new(
            ErrorKind::MalformedUrl,
            format!("encountered an invalid url {}, look up failed", url.as_ref()),
        )
    }

    pub fn controller_not_found(segment: impl AsRef<str>) -> Self {
        Self::new(
            ErrorKind::ControllerNotFound,
            format!("can't find class for controller url: {}", segment.as_ref()),
        )
    }

    /// The controller exists but binds nothing to `action`.
    pub fn action_not_found(controller: impl AsRef<str>, action: impl AsRef<str>) -> Self {
        Self::new(
            ErrorKind::ActionNotFound,
            format!(
                "controller {} has no action bound to url: {}",
                controller.as_ref(),
                action.as_ref()
            ),
        )
    }

    /// Resolver-level `ActionNotFound` for `uri`, keeping `cause`.
    pub fn unresolved_action(uri: impl Into<String>, cause: Error) -> Self {
        Self::new(
            ErrorKind::ActionNotFound,
            UnresolvedAction {
                uri: uri.into(),
                cause,
            },
        )
    }

    pub fn instantiation(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::Instantiation, msg.into())
    }

    pub fn rendering(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::Rendering, msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::Configuration, msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, msg.into())
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Error")
            .field("kind", &self.kind)
            .field("source", &self.source)
            .finish()
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.source, f)
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&*self.source)
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = self.to_error_response();

        if status.is_server_error() {
            tracing::error!(
                error_code = %body.error_code,
                message = %body.message,
                status = status.as_u16(),
                "Request failed"
            );
        } else {
            tracing::debug!(
                error_code = %body.error_code,
                message = %body.message,
                status = status.as_u16(),
                "Request rejected"
            );
        }

        (status, Json(body)).into_response()
    }
}

macro_rules! impl_from {
    ($($source:ty => $kind:ident),* $(,)?) => {
        $(
            impl From<$source> for Error {
                fn from(err: $source) -> Self {
                    Self::new(ErrorKind::$kind, err)
                }
            }
        )*
    };
}

impl_from! {
    std::io::Error => Io,
    toml::de::Error => Configuration,
    std::env::VarError => Configuration,
    regex::Error => Configuration,
    serde_json::Error => Internal,
}

/// JSON error body: `{"error_code", "message", "details"?}`.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error_code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}
