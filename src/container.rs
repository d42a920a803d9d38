//! Instantiation capability consumed by the resolver, plus a small registry
//! implementation of it.

use {
    crate::{ControllerInstance, ControllerType, Error, Result},
    std::{
        any::{Any, TypeId, type_name},
        collections::HashMap,
        fmt,
        sync::Arc,
    },
};

/// Produces controller instances from their type identifier.
///
/// Failures (missing binding, construction error) are propagated by the
/// resolver unchanged.
pub trait Injector: Send + Sync {
    fn get(&self, controller: ControllerType) -> Result<ControllerInstance>;
}

type Factory = Arc<dyn Fn(&Container) -> Result<Arc<dyn Any + Send + Sync>> + Send + Sync>;

enum Binding {
    Singleton(Arc<dyn Any + Send + Sync>),
    Factory(Factory),
}

/// Registry-based [`Injector`].
///
/// Types are bound either to a shared instance ([`singleton`](Container::singleton))
/// or to a factory run on every lookup ([`bind`](Container::bind)). Factories
/// receive the container so they can resolve their own dependencies.
///
/// ```rust
/// use mvc_core::{Container, ControllerType, Injector};
/// use std::sync::Arc;
///
/// struct UserService;
/// struct UserController { service: Arc<UserService> }
///
/// let container = Container::new()
///     .singleton(UserService)
///     .bind(|c: &Container| Ok(UserController { service: c.resolve::<UserService>()? }));
///
/// let instance = container.get(ControllerType::of::<UserController>()).unwrap();
/// assert!(instance.downcast_ref::<UserController>().is_some());
/// ```
#[derive(Default)]
pub struct Container {
    bindings: HashMap<TypeId, Binding>,
    names: HashMap<TypeId, &'static str>,
}

impl Container {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a factory producing a fresh `T` on every lookup.
    #[must_use]
    pub fn bind<T, F>(mut self, factory: F) -> Self
    where
        T: Any + Send + Sync,
        F: Fn(&Container) -> Result<T> + Send + Sync + 'static,
    {
        let factory: Factory = Arc::new(move |container: &Container| {
            factory(container).map(|value| Arc::new(value) as Arc<dyn Any + Send + Sync>)
        });
        self.insert::<T>(Binding::Factory(factory));
        self
    }

    /// Registers a single shared instance of `T`.
    #[must_use]
    pub fn singleton<T>(mut self, value: T) -> Self
    where
        T: Any + Send + Sync,
    {
        self.insert::<T>(Binding::Singleton(Arc::new(value)));
        self
    }

    fn insert<T: Any>(&mut self, binding: Binding) {
        let id = TypeId::of::<T>();
        self.bindings.insert(id, binding);
        self.names.insert(id, type_name::<T>());
    }

    /// Returns an instance of `T`, typed.
    pub fn resolve<T>(&self) -> Result<Arc<T>>
    where
        T: Any + Send + Sync,
    {
        self.instance(TypeId::of::<T>(), type_name::<T>())?
            .downcast::<T>()
            .map_err(|_| {
                Error::instantiation(format!("binding for {} has the wrong type", type_name::<T>()))
            })
    }

    fn instance(&self, id: TypeId, name: &str) -> Result<Arc<dyn Any + Send + Sync>> {
        match self.bindings.get(&id) {
            Some(Binding::Singleton(value)) => Ok(Arc::clone(value)),
            Some(Binding::Factory(factory)) => factory(self),
            None => Err(Error::instantiation(format!("no binding for {name}"))),
        }
    }
}

impl Injector for Container {
    fn get(&self, controller: ControllerType) -> Result<ControllerInstance> {
        self.instance(controller.type_id(), controller.name())
    }
}

impl fmt::Debug for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Container")
            .field("bindings", &self.names.values().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Clock;

    struct ReportController {
        clock: Arc<Clock>,
    }

    #[test]
    fn test_missing_binding() {
        let err = Container::new()
            .get(ControllerType::of::<ReportController>())
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Instantiation);
        assert!(err.to_string().contains("ReportController"));
    }

    #[test]
    fn test_factory_resolves_dependencies() {
        let container = Container::new()
            .singleton(Clock)
            .bind(|c: &Container| Ok(ReportController { clock: c.resolve()? }));

        let instance = container.get(ControllerType::of::<ReportController>()).unwrap();
        let controller = instance.downcast_ref::<ReportController>().unwrap();
        assert!(Arc::ptr_eq(&controller.clock, &container.resolve::<Clock>().unwrap()));
    }

    #[test]
    fn test_factory_runs_per_lookup() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let container = Container::new().bind(move |_: &Container| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(Clock)
        });

        container.resolve::<Clock>().unwrap();
        container.resolve::<Clock>().unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_singleton_is_shared() {
        let container = Container::new().singleton(Clock);
        let a = container.resolve::<Clock>().unwrap();
        let b = container.resolve::<Clock>().unwrap();
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn test_factory_failure_propagates() {
        let container = Container::new()
            .bind(|_: &Container| -> Result<Clock> { Err(Error::internal("clock broke")) });
        let err = container.get(ControllerType::of::<Clock>()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Internal);
        assert_eq!(err.to_string(), "clock broke");
    }

    #[test]
    fn test_missing_dependency_inside_factory() {
        let container =
            Container::new().bind(|c: &Container| Ok(ReportController { clock: c.resolve()? }));
        let err = container.get(ControllerType::of::<ReportController>()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Instantiation);
        assert!(err.to_string().contains("Clock"));
    }
}
