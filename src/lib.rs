//! # gee
//!
//! A small web framework: a segment trie router with `:name` and `*name`
//! captures, prefix-scoped route groups, and explicit middleware chains where
//! each handler decides whether the rest of the chain runs. Axum provides the
//! HTTP transport underneath.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use gee::{Config, Context, Engine, Result};
//! use http::StatusCode;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = Config::default(); // Loads from config/{RUST_ENV}.toml
//!     config.setup_tracing();
//!
//!     let mut engine = Engine::with_config(config)?;
//!     engine
//!         .use_middleware(gee::logger())
//!         .use_middleware(gee::recovery());
//!
//!     engine.get("/", |ctx: &mut Context| {
//!         ctx.html(StatusCode::OK, "<h1>Hello Gee</h1>");
//!     });
//!
//!     let mut v1 = engine.group("/v1");
//!     v1.get("/hello/:name", |ctx: &mut Context| {
//!         let name = ctx.param("name").unwrap_or_default().to_owned();
//!         ctx.string(StatusCode::OK, format!("hello {name}"));
//!     });
//!
//!     engine.run().await
//! }
//! ```
//!
//! # Routing
//!
//! Patterns are split on `/` into segments:
//!
//! | Segment | Matches | Captures |
//! |---------|---------|----------|
//! | `hello` | exactly `hello` | nothing |
//! | `:name` | any one segment | `name` → the segment |
//! | `*path` | every remaining segment | `path` → the segments joined with `/` |
//!
//! Anything after a `*` segment in a pattern is ignored. Lookups backtrack, so
//! `/a/:id/b` and `/a/*rest` can coexist.
//!
//! # Middleware
//!
//! Middleware and route handlers share the [`Handler`] trait. The chain for a
//! request is the middleware of every group whose prefix is a prefix of the
//! path, in group creation order, followed by the route handler. A handler
//! runs the rest of the chain by calling [`Context::next`]; code after that
//! call runs on the way back out.
//!
//! # Configuration
//!
//! ```rust
//! use gee::Config;
//!
//! let config: Config = r#"
//!     [http]
//!     bind_port = 8080
//!     max_payload_size_bytes = "1MiB"
//!     shutdown_timeout = "10s"
//!
//!     [logging]
//!     format = "json"
//! "#.parse().unwrap();
//! assert_eq!(config.http.bind_port, 8080);
//! ```
//!
//! # Module Organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`routing`] | Pattern parsing, trie and per-method router |
//! | `engine` | [`Engine`], [`RouterGroup`], [`Context`], middleware, server |
//! | `config` | Configuration loading and validation ([`Config`]) |
//! | `error` | Error types ([`Error`]) |
mod config;
mod engine;
mod error;
pub mod routing;
mod utils;

pub use config::*;
pub use engine::*;
pub use error::*;
pub use routing::{Params, RouteMatch, Router, Segment};
pub use utils::*;

pub type Result<T> = std::result::Result<T, Error>;
