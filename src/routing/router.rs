//! Route registration and lookup.
//!
//! # Responsibilities
//! - Keep one trie per HTTP method
//! - Keep the terminal handler for every `(method, pattern)` pair
//! - Resolve a request path to a handler plus captured parameters
//!
//! # Design Decisions
//! - A miss is `None`, never an error
//! - Duplicate registration overwrites the previous handler (last one wins)
//! - Parameters are rebuilt from the matched pattern's own segments

use std::{collections::HashMap, fmt};

use http::Method;

use super::{
    pattern::{Segment, parse_pattern, split_path},
    trie::Node,
};
use crate::HandlerFunc;

/// Captured path parameters, keyed by capture name.
pub type Params = HashMap<String, String>;

/// The trie and handler table for a single HTTP method.
#[derive(Default)]
struct MethodTree {
    root: Node,
    handlers: HashMap<String, HandlerFunc>,
}

/// A successful route lookup.
#[derive(Clone)]
pub struct RouteMatch {
    /// The registered pattern that matched, e.g. `/p/:lang/doc`.
    pub pattern: String,
    /// Values bound by `:name` and `*name` segments.
    pub params: Params,
    /// Terminal handler registered for the pattern.
    pub handler: HandlerFunc,
}

impl fmt::Debug for RouteMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteMatch")
            .field("pattern", &self.pattern)
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

/// Method-aware segment trie router.
#[derive(Default)]
pub struct Router {
    trees: HashMap<Method, MethodTree>,
}

impl Router {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `handler` for `method` and `pattern`.
    ///
    /// Registering the same pattern again replaces the earlier handler.
    pub fn add_route(&mut self, method: Method, pattern: &str, handler: HandlerFunc) {
        let parts = parse_pattern(pattern);
        tracing::info!(method = %method, pattern = %pattern, "Route registered");

        let tree = self.trees.entry(method).or_default();
        tree.root.insert(pattern, &parts, 0);
        tree.handlers.insert(pattern.to_owned(), handler);
    }

    /// Resolves `path` for `method`.
    ///
    /// Returns `None` when the method has no routes or no terminal node matches.
    ///
    /// ```
    /// use gee::{Router, Context};
    /// use http::Method;
    /// use std::sync::Arc;
    ///
    /// let mut router = Router::new();
    /// router.add_route(Method::GET, "/p/:lang/doc", Arc::new(|_: &mut Context| {}));
    ///
    /// let matched = router.get_route(&Method::GET, "/p/go/doc").unwrap();
    /// assert_eq!(matched.pattern, "/p/:lang/doc");
    /// assert_eq!(matched.params["lang"], "go");
    /// assert!(router.get_route(&Method::GET, "/p/go/doc/extra").is_none());
    /// ```
    pub fn get_route(&self, method: &Method, path: &str) -> Option<RouteMatch> {
        let tree = self.trees.get(method)?;
        let search_parts = split_path(path);

        let node = tree.root.search(&search_parts, 0)?;
        let pattern = node.pattern()?;
        let handler = tree.handlers.get(pattern)?.clone();

        Some(RouteMatch {
            pattern: pattern.to_owned(),
            params: extract_params(pattern, &search_parts),
            handler,
        })
    }

    /// Registered patterns for `method`, in tree order.
    pub fn routes(&self, method: &Method) -> Vec<&str> {
        let Some(tree) = self.trees.get(method) else {
            return Vec::new();
        };
        let mut nodes = Vec::new();
        tree.root.travel(&mut nodes);
        nodes.into_iter().filter_map(Node::pattern).collect()
    }

    /// Methods that have at least one registered route.
    pub fn methods(&self) -> impl Iterator<Item = &Method> {
        self.trees.keys()
    }
}

impl fmt::Debug for Router {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for method in self.trees.keys() {
            map.entry(method, &self.routes(method));
        }
        map.finish()
    }
}

/// Walks the matched pattern against the request segments and binds captures.
fn extract_params(pattern: &str, search_parts: &[&str]) -> Params {
    let mut params = Params::new();
    for (index, part) in parse_pattern(pattern).into_iter().enumerate() {
        match Segment::classify(part) {
            Segment::Named(name) => {
                if let Some(value) = search_parts.get(index) {
                    params.insert(name.to_owned(), (*value).to_owned());
                }
            }
            Segment::Wildcard(name) if !name.is_empty() => {
                let rest = search_parts.get(index..).unwrap_or_default();
                params.insert(name.to_owned(), rest.join("/"));
                break;
            }
            Segment::Wildcard(_) => break,
            Segment::Literal(_) => {}
        }
    }
    params
}
