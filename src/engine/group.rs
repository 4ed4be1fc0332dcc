//! Prefix-scoped route groups.
//!
//! Groups live in the engine's flat registry; a [`RouterGroup`] is only a
//! borrowed handle onto one entry. Middleware resolution never walks the
//! parent links: at request time every registered group whose prefix is a
//! string prefix of the path contributes its middleware, in creation order.

use std::sync::Arc;

use http::Method;

use super::{
    Engine,
    handler::{Handler, HandlerFunc},
};

/// Index of a group in the engine's registry. The root group is always `GroupId(0)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GroupId(pub(crate) usize);

impl GroupId {
    pub const ROOT: GroupId = GroupId(0);
}

/// Registry entry for one group.
pub(crate) struct GroupEntry {
    /// Absolute prefix: the parent's prefix followed by this group's own suffix.
    pub(crate) prefix: String,
    /// Lineage only, used when the prefix is composed.
    pub(crate) parent: Option<GroupId>,
    pub(crate) middlewares: Vec<HandlerFunc>,
}

impl GroupEntry {
    pub(crate) fn root() -> Self {
        Self {
            prefix: String::new(),
            parent: None,
            middlewares: Vec::new(),
        }
    }
}

/// Handle for registering middleware and routes under a prefix.
///
/// ```
/// use gee::{Context, Engine};
/// use http::StatusCode;
///
/// let mut engine = Engine::new();
/// let mut v1 = engine.group("/v1");
/// v1.get("/hello", |ctx: &mut Context| ctx.string(StatusCode::OK, "hello"));
///
/// let mut admin = v1.group("/admin");
/// assert_eq!(admin.prefix(), "/v1/admin");
/// admin.use_middleware(|ctx: &mut Context| ctx.next());
/// ```
pub struct RouterGroup<'e> {
    engine: &'e mut Engine,
    id: GroupId,
}

impl<'e> RouterGroup<'e> {
    pub(crate) fn new(engine: &'e mut Engine, id: GroupId) -> Self {
        Self { engine, id }
    }

    pub fn id(&self) -> GroupId {
        self.id
    }

    pub fn prefix(&self) -> &str {
        &self.entry().prefix
    }

    pub fn parent(&self) -> Option<GroupId> {
        self.entry().parent
    }

    fn entry(&self) -> &GroupEntry {
        &self.engine.groups[self.id.0]
    }

    /// Creates a child group whose prefix is this group's prefix followed by `prefix`.
    pub fn group(&mut self, prefix: &str) -> RouterGroup<'_> {
        let id = self.engine.register_group(self.id, prefix);
        RouterGroup::new(&mut *self.engine, id)
    }

    /// Appends a middleware handler to this group.
    pub fn use_middleware(&mut self, handler: impl Handler) -> &mut Self {
        self.engine.groups[self.id.0]
            .middlewares
            .push(Arc::new(handler));
        self
    }

    /// Appends several middleware handlers to this group, in order.
    pub fn use_middlewares(
        &mut self,
        handlers: impl IntoIterator<Item = HandlerFunc>,
    ) -> &mut Self {
        self.engine.groups[self.id.0].middlewares.extend(handlers);
        self
    }

    /// Registers `handler` for `method` at this group's prefix followed by `pattern`.
    pub fn add_route(
        &mut self,
        method: Method,
        pattern: &str,
        handler: impl Handler,
    ) -> &mut Self {
        let full_pattern = format!("{}{}", self.prefix(), pattern);
        self.engine
            .router
            .add_route(method, &full_pattern, Arc::new(handler));
        self
    }

    pub fn get(&mut self, pattern: &str, handler: impl Handler) -> &mut Self {
        self.add_route(Method::GET, pattern, handler)
    }

    pub fn post(&mut self, pattern: &str, handler: impl Handler) -> &mut Self {
        self.add_route(Method::POST, pattern, handler)
    }

    pub fn put(&mut self, pattern: &str, handler: impl Handler) -> &mut Self {
        self.add_route(Method::PUT, pattern, handler)
    }

    pub fn delete(&mut self, pattern: &str, handler: impl Handler) -> &mut Self {
        self.add_route(Method::DELETE, pattern, handler)
    }

    pub fn patch(&mut self, pattern: &str, handler: impl Handler) -> &mut Self {
        self.add_route(Method::PATCH, pattern, handler)
    }
}
