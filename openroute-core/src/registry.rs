use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use indexmap::IndexMap;
use serde_json::Value;

use crate::route::{Method, RouteConfig};
use crate::schema::Schema;

/// Append-only store of everything declared through one router.
///
/// Cloning yields another handle to the same store: the router keeps one,
/// and the documentation endpoint installed by `doc()` keeps another so that
/// routes registered later still show up. Each router owns its own store;
/// there is no process-wide registry.
///
/// Mutation only happens during setup. Reads take a [`snapshot`](Self::snapshot)
/// so that document generation never holds the lock while rendering.
#[derive(Clone, Default)]
pub struct RouteRegistry {
    inner: Arc<RwLock<RegistrySnapshot>>,
}

/// Point-in-time copy of a [`RouteRegistry`].
#[derive(Clone, Default)]
pub struct RegistrySnapshot {
    /// Registered routes, in registration order. Duplicates are kept.
    pub routes: Vec<Arc<RouteConfig>>,
    /// Explicitly registered schema components, by name.
    pub schemas: IndexMap<String, Schema>,
    /// Other components (`securitySchemes`, `parameters`, ...), by kind then name.
    pub components: IndexMap<String, IndexMap<String, Value>>,
}

impl RouteRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a route. Returns `false` when a route with the same method and
    /// path was already registered.
    pub fn push(&self, route: Arc<RouteConfig>) -> bool {
        let mut inner = self.write();
        let first = !inner
            .routes
            .iter()
            .any(|r| r.method == route.method && r.path == route.path);
        inner.routes.push(route);
        first
    }

    /// Register a named schema component.
    pub fn register_schema(&self, name: impl Into<String>, schema: Schema) {
        self.write().schemas.insert(name.into(), schema);
    }

    /// Register a raw component of the given kind, e.g.
    /// `register_component("securitySchemes", "bearerAuth", json!({...}))`.
    pub fn register_component(&self, kind: impl Into<String>, name: impl Into<String>, component: Value) {
        self.write()
            .components
            .entry(kind.into())
            .or_default()
            .insert(name.into(), component);
    }

    /// Number of registered routes, duplicates included.
    pub fn len(&self) -> usize {
        self.read().routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether a route with this method and path has been registered.
    pub fn contains(&self, method: Method, path: &str) -> bool {
        self.read()
            .routes
            .iter()
            .any(|r| r.method == method && r.path == path)
    }

    /// Copy the current contents. Routes are shared, not deep-copied.
    pub fn snapshot(&self) -> RegistrySnapshot {
        self.read().clone()
    }

    fn read(&self) -> RwLockReadGuard<'_, RegistrySnapshot> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, RegistrySnapshot> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for RouteRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.read();
        f.debug_struct("RouteRegistry")
            .field("routes", &inner.routes.len())
            .field("schemas", &inner.schemas.len())
            .field("components", &inner.components.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_keeps_order_and_duplicates() {
        let registry = RouteRegistry::new();
        assert!(registry.push(Arc::new(RouteConfig::get("/a"))));
        assert!(registry.push(Arc::new(RouteConfig::post("/a"))));
        assert!(registry.push(Arc::new(RouteConfig::get("/b"))));
        assert!(!registry.push(Arc::new(RouteConfig::get("/a"))));

        let paths: Vec<_> = registry
            .snapshot()
            .routes
            .iter()
            .map(|r| format!("{} {}", r.method, r.path))
            .collect();
        assert_eq!(paths, vec!["GET /a", "POST /a", "GET /b", "GET /a"]);
    }

    #[test]
    fn clones_share_state() {
        let registry = RouteRegistry::new();
        let handle = registry.clone();
        registry.push(Arc::new(RouteConfig::get("/late")));
        assert_eq!(handle.len(), 1);
        assert!(handle.contains(Method::Get, "/late"));
        assert!(!handle.contains(Method::Post, "/late"));
    }

    #[test]
    fn separate_registries_are_independent() {
        let a = RouteRegistry::new();
        let b = RouteRegistry::new();
        a.push(Arc::new(RouteConfig::get("/only-a")));
        assert!(b.is_empty());
    }

    #[test]
    fn components_are_grouped_by_kind() {
        let registry = RouteRegistry::new();
        registry.register_component("securitySchemes", "bearerAuth", serde_json::json!({ "type": "http" }));
        registry.register_schema("Thing", Schema::raw(serde_json::json!({ "type": "object" })));
        let snapshot = registry.snapshot();
        assert_eq!(snapshot.components["securitySchemes"]["bearerAuth"]["type"], "http");
        assert!(snapshot.schemas.contains_key("Thing"));
    }
}
