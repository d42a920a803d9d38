//! Two-level lookup table: controller segment → action segment → action.

use {
    super::pattern::RoutePattern,
    crate::{
        Action, ActionDescriptor, ControllerDescriptor, ControllerType, Error, RequiredParam,
        Result, strip_lead_slash,
    },
    std::{
        collections::{HashMap, hash_map::Entry},
        sync::Arc,
    },
};

/// Actions registered under one controller base path.
#[derive(Debug)]
struct ControllerEntry {
    controller: ControllerType,
    actions: HashMap<String, Arc<dyn Action>>,
}

impl ControllerEntry {
    fn new(controller: ControllerType) -> Self {
        Self {
            controller,
            actions: HashMap::new(),
        }
    }

    /// Binds `action` under its normalized declared segment, falling back to
    /// the action name. Returns the action it replaced, if any.
    fn add_action(&mut self, path: &str, action: Arc<dyn Action>) -> Option<Arc<dyn Action>> {
        let mut key = strip_lead_slash(path);
        if key.is_empty() {
            key = action.name();
        }
        let key = key.to_string();
        self.actions.insert(key, action)
    }

    fn action_for(&self, segment: &str) -> Option<&Arc<dyn Action>> {
        self.actions.get(strip_lead_slash(segment))
    }
}

/// The resolved result of a routing lookup.
#[derive(Debug, Clone)]
pub struct ActionInfo {
    controller: ControllerType,
    action: Arc<dyn Action>,
}

impl ActionInfo {
    pub fn controller(&self) -> ControllerType {
        self.controller
    }

    pub fn action(&self) -> &Arc<dyn Action> {
        &self.action
    }

    pub fn required_param(&self) -> Option<&RequiredParam> {
        self.action.required_param()
    }
}

/// Immutable routing table built once from discovered controller metadata.
///
/// Lookups take `&self` only, so a table shared behind an `Arc` can be read
/// by any number of request threads without locking.
///
/// # Registration order
///
/// - A controller base path must be one non-empty segment (`/user`, `user`);
///   anything else could never match a request and fails the build.
/// - A base path is bound to the first controller type registered under it.
///   Later descriptors of the same type add their actions; descriptors of a
///   different type are skipped. Both cases log a warning.
/// - Within a controller, the last action registered for a given segment wins.
#[derive(Debug)]
pub struct RoutingTable {
    pattern: RoutePattern,
    controllers: HashMap<String, ControllerEntry>,
}

impl RoutingTable {
    /// Builds the table from discovered controllers, mounted under `context_path`.
    pub fn build<I>(controllers: I, context_path: &str) -> Result<Self>
    where
        I: IntoIterator<Item = ControllerDescriptor>,
    {
        let pattern = RoutePattern::new(context_path)?;
        let mut entries: HashMap<String, ControllerEntry> = HashMap::new();
        let mut action_count = 0usize;

        for descriptor in controllers {
            let controller_path = strip_lead_slash(&descriptor.path).to_string();
            if controller_path.is_empty() || controller_path.contains('/') {
                return Err(Error::config(format!(
                    "controller {} has base path '{}', which must be a single non-empty segment",
                    descriptor.controller, descriptor.path
                )));
            }

            let entry = match entries.entry(controller_path.clone()) {
                Entry::Vacant(vacant) => {
                    tracing::debug!(
                        path = %controller_path,
                        controller = %descriptor.controller,
                        "Registered controller"
                    );
                    vacant.insert(ControllerEntry::new(descriptor.controller))
                }
                Entry::Occupied(occupied) => {
                    let entry = occupied.into_mut();
                    if entry.controller != descriptor.controller {
                        tracing::warn!(
                            path = %controller_path,
                            registered = %entry.controller,
                            ignored = %descriptor.controller,
                            "Controller path already registered, ignoring the later controller"
                        );
                        continue;
                    }
                    tracing::warn!(
                        path = %controller_path,
                        controller = %entry.controller,
                        "Controller path registered twice, merging its actions"
                    );
                    entry
                }
            };

            for ActionDescriptor { path, action } in descriptor.actions {
                let name = action.name().to_string();
                match entry.add_action(&path, action) {
                    Some(previous) => tracing::warn!(
                        controller = %controller_path,
                        action = %name,
                        replaced = %previous.name(),
                        "Action segment registered twice, the later registration wins"
                    ),
                    None => action_count += 1,
                }
                tracing::debug!(
                    controller = %controller_path,
                    declared = %path,
                    action = %name,
                    "Bound action"
                );
            }
        }

        tracing::info!(
            context_path = %context_path,
            controllers = entries.len(),
            actions = action_count,
            "Routing table built"
        );

        Ok(Self {
            pattern,
            controllers: entries,
        })
    }

    pub fn context_path(&self) -> &str {
        self.pattern.context_path()
    }

    /// Resolves a request path into the controller type and action bound to it.
    ///
    /// # Errors
    ///
    /// - `MalformedUrl` when the path does not have the `context/{controller}[/{action}]` shape
    /// - `ControllerNotFound` when no controller is registered for the controller segment
    /// - `ActionNotFound` when the controller has no action for the action segment
    pub fn resolve(&self, path: &str) -> Result<ActionInfo> {
        let segments = self.pattern.decompose(path)?;

        let entry = self
            .controllers
            .get(segments.controller)
            .ok_or_else(|| Error::controller_not_found(segments.controller))?;

        let action = entry.action_for(segments.action).ok_or_else(|| {
            Error::action_not_found(entry.controller.short_name(), segments.action)
        })?;

        Ok(ActionInfo {
            controller: entry.controller,
            action: Arc::clone(action),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ErrorKind, ModelAndView, action, action_with_param};
    use tracing_test::traced_test;

    struct UserController;
    struct OrderController;

    fn ok(_: &UserController) -> Result<ModelAndView> {
        Ok(ModelAndView::new())
    }

    fn user_routes() -> ControllerDescriptor {
        ControllerDescriptor::of::<UserController>("/user")
            .action("", action("index", ok))
            .action("/show", action_with_param("show", "id", |_: &UserController, _| {
                Ok(ModelAndView::new())
            }))
            .action("new", action("fresh", ok))
    }

    fn table() -> RoutingTable {
        RoutingTable::build([user_routes()], "/sample").unwrap()
    }

    #[test]
    fn test_resolves_default_action_name() {
        let info = table().resolve("/sample/user/index").unwrap();
        assert!(info.controller().is::<UserController>());
        assert_eq!(info.action().name(), "index");
        assert!(info.required_param().is_none());
    }

    #[test]
    fn test_resolves_declared_segment() {
        let info = table().resolve("/sample/user/show").unwrap();
        assert!(info.controller().is::<UserController>());
        assert_eq!(info.action().name(), "show");
        assert_eq!(info.required_param().unwrap().name(), "id");

        let info = table().resolve("/sample/user/new").unwrap();
        assert_eq!(info.action().name(), "fresh");
    }

    #[test]
    fn test_declared_segment_hides_action_name() {
        let err = table().resolve("/sample/user/fresh").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ActionNotFound);
    }

    #[test]
    fn test_default_action_not_reachable_by_unrelated_segment() {
        let err = table().resolve("/sample/user/whatever").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ActionNotFound);

        let err = table().resolve("/sample/user").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ActionNotFound);
    }

    #[test]
    fn test_every_registered_pair_resolves() {
        let table = table();
        for (segment, name) in [("index", "index"), ("show", "show"), ("new", "fresh")] {
            let info = table.resolve(&format!("/sample/user/{segment}")).unwrap();
            assert_eq!(info.action().name(), name);
        }
    }

    #[test]
    fn test_unknown_controller() {
        let err = table().resolve("/sample/orders/index").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ControllerNotFound);
        assert!(err.to_string().contains("orders"));
    }

    #[test]
    fn test_segments_are_case_sensitive() {
        let err = table().resolve("/sample/User/index").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ControllerNotFound);

        let err = table().resolve("/sample/user/Index").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ActionNotFound);
    }

    #[test]
    fn test_outside_context_is_malformed() {
        for path in ["/other/user/index", "/sample", "/sample/", "/user/index"] {
            let err = table().resolve(path).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::MalformedUrl, "path {path:?}");
        }
    }

    #[test]
    #[traced_test]
    fn test_last_action_registration_wins() {
        let descriptor = ControllerDescriptor::of::<UserController>("user")
            .action("list", action("first", ok))
            .action("/list", action("second", ok));

        let table = RoutingTable::build([descriptor], "/sample").unwrap();
        let info = table.resolve("/sample/user/list").unwrap();
        assert_eq!(info.action().name(), "second");
        assert!(logs_contain("Action segment registered twice"));
    }

    #[test]
    #[traced_test]
    fn test_first_controller_registration_wins() {
        let users = ControllerDescriptor::of::<UserController>("/user")
            .action("", action("index", ok));
        let orders = ControllerDescriptor::of::<OrderController>("user").action(
            "",
            action("list", |_: &OrderController| Ok(ModelAndView::new())),
        );

        let table = RoutingTable::build([users, orders], "/sample").unwrap();

        let info = table.resolve("/sample/user/index").unwrap();
        assert!(info.controller().is::<UserController>());

        let err = table.resolve("/sample/user/list").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ActionNotFound);
        assert!(logs_contain("Controller path already registered"));
    }

    #[test]
    #[traced_test]
    fn test_same_controller_twice_merges_actions() {
        let first = ControllerDescriptor::of::<UserController>("/user")
            .action("", action("index", ok));
        let second = ControllerDescriptor::of::<UserController>("user")
            .action("", action("list", ok));

        let table = RoutingTable::build([first, second], "/sample").unwrap();

        assert_eq!(table.resolve("/sample/user/index").unwrap().action().name(), "index");
        assert_eq!(table.resolve("/sample/user/list").unwrap().action().name(), "list");
        assert!(logs_contain("Controller path registered twice"));
    }

    #[test]
    fn test_unreachable_base_paths_are_rejected() {
        for path in ["/admin/user", "", "/"] {
            let descriptor = ControllerDescriptor::of::<UserController>(path)
                .action("", action("index", ok));
            let err = RoutingTable::build([descriptor], "/sample").unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Configuration, "path {path:?}");
            assert!(err.to_string().contains("UserController"));
        }
    }

    #[test]
    fn test_nested_action_segment() {
        let descriptor = ControllerDescriptor::of::<UserController>("/user")
            .action("/admin/list", action("adminList", ok));
        let table = RoutingTable::build([descriptor], "/sample").unwrap();

        let info = table.resolve("/sample/user/admin/list").unwrap();
        assert_eq!(info.action().name(), "adminList");
    }

    #[test]
    fn test_root_context_path() {
        let table = RoutingTable::build([user_routes()], "").unwrap();
        assert_eq!(table.context_path(), "");
        let info = table.resolve("/user/show").unwrap();
        assert_eq!(info.action().name(), "show");
    }

    #[test]
    fn test_empty_table() {
        let table = RoutingTable::build(Vec::new(), "/sample").unwrap();
        let err = table.resolve("/sample/user/index").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ControllerNotFound);
    }

    #[test]
    fn test_table_is_shareable_across_threads() {
        let table = Arc::new(table());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let table = Arc::clone(&table);
                std::thread::spawn(move || {
                    table
                        .resolve("/sample/user/show")
                        .map(|info| info.action().name().to_string())
                })
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap().unwrap(), "show");
        }
    }
}
