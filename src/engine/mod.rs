//! The engine: router, group registry and per-request dispatch.
//!
//! The engine has two phases. During setup it is mutable: groups are created,
//! middleware is attached and routes are registered. Serving starts by moving
//! the engine behind an `Arc` (see [`Engine::into_router`]), after which it is
//! only read. Registration takes `&mut Engine`, so the compiler rules out
//! registering routes while requests are being served.
//!
//! - [`handler`] - The `Handler` capability
//! - [`context`] - Per-request state and chain cursor
//! - [`group`] - Prefix-scoped route groups
//! - [`middleware`] - Built-in logger and recovery middleware
//! - [`server`] - Axum transport adapter and server lifecycle

mod context;
mod group;
mod handler;
mod middleware;
mod server;

pub use context::Context;
pub use group::{GroupId, RouterGroup};
pub use handler::{Handler, HandlerFunc};
pub use middleware::{logger, recovery};

use std::{fmt, sync::Arc};

use http::{Method, StatusCode};

use crate::{
    Config, Result,
    routing::{Params, Router},
};
use group::GroupEntry;

/// Outcome of resolving a request against the engine.
pub enum Resolution {
    /// A route matched; `chain` ends with its handler.
    Matched {
        chain: Vec<HandlerFunc>,
        pattern: String,
        params: Params,
    },
    /// No route matched; `chain` holds only the applicable middleware.
    NotFound { chain: Vec<HandlerFunc> },
}

impl Resolution {
    pub fn is_matched(&self) -> bool {
        matches!(self, Resolution::Matched { .. })
    }

    pub fn chain(&self) -> &[HandlerFunc] {
        match self {
            Resolution::Matched { chain, .. } | Resolution::NotFound { chain } => chain,
        }
    }
}

impl fmt::Debug for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resolution::Matched {
                chain,
                pattern,
                params,
            } => f
                .debug_struct("Matched")
                .field("chain_len", &chain.len())
                .field("pattern", pattern)
                .field("params", params)
                .finish(),
            Resolution::NotFound { chain } => f
                .debug_struct("NotFound")
                .field("chain_len", &chain.len())
                .finish(),
        }
    }
}

/// Top-level framework object.
///
/// The engine is also the root group (prefix `""`), so routes and middleware
/// can be registered on it directly.
///
/// ```
/// use gee::{Context, Engine};
/// use http::{Method, StatusCode};
///
/// let mut engine = Engine::new();
/// engine.get("/hello/:name", |ctx: &mut Context| {
///     let name = ctx.param("name").unwrap_or_default().to_owned();
///     ctx.string(StatusCode::OK, format!("hello {name}"));
/// });
///
/// let mut ctx = Context::new(Method::GET, "/hello/geektutu");
/// engine.handle(&mut ctx);
/// assert_eq!(ctx.response_body(), b"hello geektutu");
/// ```
pub struct Engine {
    pub(crate) config: Config,
    pub(crate) router: Router,
    pub(crate) groups: Vec<GroupEntry>,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine {
    /// Creates an engine with no middleware, using `Config::default()`.
    pub fn new() -> Self {
        Self::from_config(Config::default())
    }

    /// Creates an engine after validating `config`.
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate()?;
        Ok(Self::from_config(config))
    }

    /// Creates an engine with the logger and recovery middleware installed
    /// on the root group.
    pub fn standard() -> Self {
        let mut engine = Self::new();
        engine.use_middleware(logger()).use_middleware(recovery());
        engine
    }

    fn from_config(config: Config) -> Self {
        Self {
            config,
            router: Router::new(),
            groups: vec![GroupEntry::root()],
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn router(&self) -> &Router {
        &self.router
    }

    // ========================================================================
    // Setup phase
    // ========================================================================

    /// Handle onto the root group.
    pub fn root(&mut self) -> RouterGroup<'_> {
        RouterGroup::new(self, GroupId::ROOT)
    }

    /// Creates a group under the root group.
    pub fn group(&mut self, prefix: &str) -> RouterGroup<'_> {
        let id = self.register_group(GroupId::ROOT, prefix);
        RouterGroup::new(self, id)
    }

    /// Reopens a previously created group.
    pub fn group_mut(&mut self, id: GroupId) -> Option<RouterGroup<'_>> {
        if id.0 < self.groups.len() {
            Some(RouterGroup::new(self, id))
        } else {
            None
        }
    }

    /// Prefixes of all registered groups, in creation order. The root group's
    /// empty prefix comes first.
    pub fn group_prefixes(&self) -> impl Iterator<Item = &str> {
        self.groups.iter().map(|group| group.prefix.as_str())
    }

    pub(crate) fn register_group(&mut self, parent: GroupId, prefix: &str) -> GroupId {
        let prefix = format!("{}{}", self.groups[parent.0].prefix, prefix);
        tracing::debug!(prefix = %prefix, "Group registered");
        self.groups.push(GroupEntry {
            prefix,
            parent: Some(parent),
            middlewares: Vec::new(),
        });
        GroupId(self.groups.len() - 1)
    }

    pub fn use_middleware(&mut self, handler: impl Handler) -> &mut Self {
        self.root().use_middleware(handler);
        self
    }

    pub fn use_middlewares(
        &mut self,
        handlers: impl IntoIterator<Item = HandlerFunc>,
    ) -> &mut Self {
        self.root().use_middlewares(handlers);
        self
    }

    pub fn add_route(
        &mut self,
        method: Method,
        pattern: &str,
        handler: impl Handler,
    ) -> &mut Self {
        self.root().add_route(method, pattern, handler);
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

    // ========================================================================
    // Serving phase
    // ========================================================================

    /// Middleware of every group whose prefix is a prefix of `path`, in group
    /// creation order.
    pub fn middlewares_for(&self, path: &str) -> Vec<HandlerFunc> {
        self.groups
            .iter()
            .filter(|group| path.starts_with(&group.prefix))
            .flat_map(|group| group.middlewares.iter().cloned())
            .collect()
    }

    /// Computes the handler chain for a request without running it.
    pub fn resolve(&self, method: &Method, path: &str) -> Resolution {
        let mut chain = self.middlewares_for(path);
        match self.router.get_route(method, path) {
            Some(matched) => {
                chain.push(matched.handler);
                Resolution::Matched {
                    chain,
                    pattern: matched.pattern,
                    params: matched.params,
                }
            }
            None => Resolution::NotFound { chain },
        }
    }

    /// Resolves the request held by `ctx` and runs its handler chain.
    ///
    /// When no route matches, the chain ends with a handler that answers
    /// `404 NOT FOUND: <path>`, so group middleware still runs around it.
    pub fn handle(&self, ctx: &mut Context) {
        match self.resolve(ctx.method(), ctx.path()) {
            Resolution::Matched {
                chain,
                pattern,
                params,
            } => {
                tracing::debug!(
                    method = %ctx.method(),
                    path = %ctx.path(),
                    pattern = %pattern,
                    chain_len = chain.len(),
                    "Route matched"
                );
                ctx.bind_chain(chain, params, Some(pattern));
            }
            Resolution::NotFound { mut chain } => {
                tracing::debug!(method = %ctx.method(), path = %ctx.path(), "No route matched");
                chain.push(Arc::new(not_found));
                ctx.bind_chain(chain, Params::new(), None);
            }
        }
        ctx.next();
    }
}

fn not_found(ctx: &mut Context) {
    let body = format!("404 NOT FOUND: {}\n", ctx.path());
    ctx.string(StatusCode::NOT_FOUND, body);
}

impl fmt::Debug for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine")
            .field("router", &self.router)
            .field("groups", &self.group_prefixes().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests;
