//! Engine tests.
//!
//! - `dispatch`: chain resolution and execution through [`Engine::handle`]
//! - `groups`: prefix composition and middleware accumulation
//! - `server`: the axum adapter, driven in-process with `oneshot()`
//!
//! Tests that need a real socket live in `tests/`.

use std::sync::{Arc, Mutex};

use axum::{body::Body, http::Request, response::Response};

use crate::{Config, Context, Engine, Handler};

pub(crate) mod groups;

// ============================================================================
// Recording helpers
// ============================================================================

/// Shared log that handlers append their names to.
pub(crate) type Trace = Arc<Mutex<Vec<String>>>;

pub(crate) fn new_trace() -> Trace {
    Arc::new(Mutex::new(Vec::new()))
}

pub(crate) fn entries(trace: &Trace) -> Vec<String> {
    trace.lock().unwrap().clone()
}

/// Middleware that records `name` and continues the chain.
pub(crate) fn mark(trace: &Trace, name: &str) -> impl Handler {
    let trace = Arc::clone(trace);
    let name = name.to_owned();
    move |ctx: &mut Context| {
        trace.lock().unwrap().push(name.clone());
        ctx.next();
    }
}

/// Middleware that records `name` before and after the rest of the chain.
pub(crate) fn wrap(trace: &Trace, name: &str) -> impl Handler {
    let trace = Arc::clone(trace);
    let name = name.to_owned();
    move |ctx: &mut Context| {
        trace.lock().unwrap().push(format!("{name}>"));
        ctx.next();
        trace.lock().unwrap().push(format!("<{name}"));
    }
}

// ============================================================================
// Engine and request helpers
// ============================================================================

pub(crate) fn create_test_config() -> Config {
    r#"
    [http]
    bind_addr = "127.0.0.1"
    bind_port = 0
    max_payload_size_bytes = "1KiB"
    shutdown_timeout = "1s"
    "#
    .parse()
    .unwrap()
}

pub(crate) fn create_test_engine() -> Engine {
    Engine::with_config(create_test_config()).unwrap()
}

pub(crate) fn run(engine: &Engine, method: http::Method, target: &str) -> Context {
    let mut ctx = Context::new(method, target);
    engine.handle(&mut ctx);
    ctx
}

pub(crate) fn body_text(ctx: &Context) -> String {
    String::from_utf8_lossy(ctx.response_body()).into_owned()
}

pub(crate) fn get_request(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub(crate) fn post_request(uri: &str, body: impl Into<Body>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/x-www-form-urlencoded")
        .body(body.into())
        .unwrap()
}

pub(crate) async fn get_body_string(response: Response) -> String {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(body.to_vec()).unwrap()
}
