//! Controller metadata: type identity, actions and the discovery contract.
//!
//! Controllers are plain Rust types. Instead of reflective method lookup, each
//! action is an [`Action`] value built once when the controller is described,
//! so the request path never inspects types at runtime beyond a single
//! downcast of the controller instance.
//!
//! ```rust
//! use mvc_core::{ControllerDescriptor, ModelAndView, Result, action, action_with_param};
//!
//! struct UserController;
//!
//! impl UserController {
//!     fn index(&self) -> Result<ModelAndView> {
//!         Ok(ModelAndView::new())
//!     }
//!     fn show(&self, id: Option<&str>) -> Result<ModelAndView> {
//!         ModelAndView::new().add_object("id", id)
//!     }
//! }
//!
//! let descriptor = ControllerDescriptor::of::<UserController>("/user")
//!     .action("", action("index", UserController::index))
//!     .action("/show", action_with_param("show", "id", UserController::show));
//!
//! assert_eq!(descriptor.actions.len(), 2);
//! ```

use {
    crate::{Error, ModelAndView, Result},
    std::{
        any::{Any, TypeId, type_name},
        fmt,
        hash::{Hash, Hasher},
        marker::PhantomData,
        sync::Arc,
    },
};

/// A controller instance as produced by the instantiation capability.
///
/// Ownership and sharing (request-scoped or singleton) are decided by the
/// [`Injector`](crate::Injector); the core only holds it for one handler.
pub type ControllerInstance = Arc<dyn Any + Send + Sync>;

/// Opaque identifier of a controller type.
#[derive(Clone, Copy)]
pub struct ControllerType {
    id: TypeId,
    name: &'static str,
}

impl ControllerType {
    /// Returns the identifier of the controller type `C`.
    pub fn of<C: Any>() -> Self {
        Self {
            id: TypeId::of::<C>(),
            name: type_name::<C>(),
        }
    }

    /// Full type name, including the module path.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Type name without the module path, e.g. `UserController`.
    pub fn short_name(&self) -> &'static str {
        self.name.rsplit("::").next().unwrap_or(self.name)
    }

    /// Returns true if this identifies the type `C`.
    pub fn is<C: Any>(&self) -> bool {
        self.id == TypeId::of::<C>()
    }

    pub(crate) fn type_id(&self) -> TypeId {
        self.id
    }
}

impl PartialEq for ControllerType {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for ControllerType {}

impl Hash for ControllerType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for ControllerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ControllerType({})", self.name)
    }
}

impl fmt::Display for ControllerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short_name())
    }
}

/// Declares that an action expects exactly one named request parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequiredParam {
    name: String,
}

impl RequiredParam {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// An invocable controller action.
///
/// Implementations are built at discovery time and stored in the routing
/// table. `invoke` receives the controller instance and the single extracted
/// parameter value, which is only ever `Some` when
/// [`required_param`](Action::required_param) is declared.
pub trait Action: Send + Sync {
    /// Name of the action, used as the default URL segment and in view names.
    fn name(&self) -> &str;

    /// The request parameter this action binds, if any.
    fn required_param(&self) -> Option<&RequiredParam> {
        None
    }

    /// Runs the action against a controller instance.
    fn invoke(&self, controller: &dyn Any, param: Option<&str>) -> Result<ModelAndView>;
}

impl fmt::Debug for dyn Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Action")
            .field("name", &self.name())
            .field("required_param", &self.required_param())
            .finish()
    }
}

/// [`Action`] backed by a typed function over the controller `C`.
struct MethodAction<C, F> {
    name: String,
    required_param: Option<RequiredParam>,
    method: F,
    controller: PhantomData<fn(&C)>,
}

impl<C, F> Action for MethodAction<C, F>
where
    C: Any,
    F: Fn(&C, Option<&str>) -> Result<ModelAndView> + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn required_param(&self) -> Option<&RequiredParam> {
        self.required_param.as_ref()
    }

    fn invoke(&self, controller: &dyn Any, param: Option<&str>) -> Result<ModelAndView> {
        let controller = controller.downcast_ref::<C>().ok_or_else(|| {
            Error::internal(format!(
                "action {} expects a {} instance",
                self.name,
                type_name::<C>()
            ))
        })?;
        (self.method)(controller, param)
    }
}

/// Builds an action that takes no bound parameter.
pub fn action<C, F>(name: impl Into<String>, method: F) -> Arc<dyn Action>
where
    C: Any,
    F: Fn(&C) -> Result<ModelAndView> + Send + Sync + 'static,
{
    Arc::new(MethodAction {
        name: name.into(),
        required_param: None,
        method: move |controller: &C, _: Option<&str>| method(controller),
        controller: PhantomData,
    })
}

/// Builds an action that binds the request parameter `param`.
///
/// The parameter is optional by default: a request without it invokes the
/// action with `None`.
pub fn action_with_param<C, F>(
    name: impl Into<String>,
    param: impl Into<String>,
    method: F,
) -> Arc<dyn Action>
where
    C: Any,
    F: Fn(&C, Option<&str>) -> Result<ModelAndView> + Send + Sync + 'static,
{
    Arc::new(MethodAction {
        name: name.into(),
        required_param: Some(RequiredParam::new(param)),
        method,
        controller: PhantomData,
    })
}

/// One discovered action: its declared URL segment and the action itself.
#[derive(Debug, Clone)]
pub struct ActionDescriptor {
    /// Declared URL segment. Empty means "use the action name".
    pub path: String,
    pub action: Arc<dyn Action>,
}

/// Discovered metadata for one controller.
#[derive(Debug, Clone)]
pub struct ControllerDescriptor {
    /// Base URL segment of the controller, e.g. `/user`.
    pub path: String,
    pub controller: ControllerType,
    pub actions: Vec<ActionDescriptor>,
}

impl ControllerDescriptor {
    /// Starts describing controller `C` mounted at `path`.
    pub fn of<C: Any>(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            controller: ControllerType::of::<C>(),
            actions: Vec::new(),
        }
    }

    /// Adds an action bound to the declared URL segment `path`.
    #[must_use]
    pub fn action(mut self, path: impl Into<String>, action: Arc<dyn Action>) -> Self {
        self.actions.push(ActionDescriptor {
            path: path.into(),
            action,
        });
        self
    }
}

/// A controller type that publishes its own routing metadata.
///
/// ```rust
/// use mvc_core::{Controller, ControllerDescriptor, ModelAndView, action};
///
/// struct HomeController;
///
/// impl Controller for HomeController {
///     fn describe() -> ControllerDescriptor {
///         ControllerDescriptor::of::<Self>("/home")
///             .action("", action("index", |_: &Self| Ok(ModelAndView::new())))
///     }
/// }
///
/// assert_eq!(HomeController::describe().path, "/home");
/// ```
pub trait Controller: Any + Send + Sync {
    fn describe() -> ControllerDescriptor;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Greeter {
        greeting: String,
    }

    impl Greeter {
        fn hello(&self) -> Result<ModelAndView> {
            ModelAndView::new().add_object("greeting", &self.greeting)
        }

        fn hello_to(&self, name: Option<&str>) -> Result<ModelAndView> {
            ModelAndView::new().add_object("name", name.unwrap_or("nobody"))
        }
    }

    #[test]
    fn test_controller_type_identity() {
        let a = ControllerType::of::<Greeter>();
        let b = ControllerType::of::<Greeter>();
        assert_eq!(a, b);
        assert!(a.is::<Greeter>());
        assert!(!a.is::<String>());
        assert_eq!(a.short_name(), "Greeter");
        assert!(a.name().ends_with("::Greeter"));
        assert_ne!(a, ControllerType::of::<String>());
    }

    #[test]
    fn test_action_without_param() {
        let hello = action("hello", Greeter::hello);
        let greeter = Greeter {
            greeting: "hi".into(),
        };

        assert_eq!(hello.name(), "hello");
        assert!(hello.required_param().is_none());

        let mv = hello.invoke(&greeter, None).unwrap();
        assert_eq!(mv.get("greeting").unwrap(), "hi");
    }

    #[test]
    fn test_action_with_param() {
        let hello_to = action_with_param("helloTo", "name", Greeter::hello_to);
        let greeter = Greeter {
            greeting: "hi".into(),
        };

        assert_eq!(hello_to.required_param().unwrap().name(), "name");

        let mv = hello_to.invoke(&greeter, Some("ada")).unwrap();
        assert_eq!(mv.get("name").unwrap(), "ada");

        let mv = hello_to.invoke(&greeter, None).unwrap();
        assert_eq!(mv.get("name").unwrap(), "nobody");
    }

    #[test]
    fn test_action_rejects_wrong_controller_type() {
        let hello = action("hello", Greeter::hello);
        let err = hello.invoke(&42u32, None).unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::Internal);
        assert!(err.to_string().contains("hello"));
    }

    #[test]
    fn test_descriptor_builder_keeps_order() {
        let descriptor = ControllerDescriptor::of::<Greeter>("/greet")
            .action("", action("hello", Greeter::hello))
            .action("/to", action_with_param("helloTo", "name", Greeter::hello_to));

        assert_eq!(descriptor.path, "/greet");
        assert!(descriptor.controller.is::<Greeter>());
        let names: Vec<_> = descriptor.actions.iter().map(|a| a.action.name()).collect();
        assert_eq!(names, ["hello", "helloTo"]);
        assert_eq!(descriptor.actions[1].path, "/to");
    }
}
