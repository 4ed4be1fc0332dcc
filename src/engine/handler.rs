//! The handler capability shared by middleware and route handlers.

use std::sync::Arc;

use super::context::Context;

/// A unit of request logic.
///
/// Middleware and terminal route handlers are the same thing: they receive the
/// [`Context`], may read the request and write the response, and may call
/// [`Context::next`] to run the rest of the chain. A handler that does not call
/// `next` ends the chain.
///
/// Any `Fn(&mut Context) + Send + Sync + 'static` is a handler:
///
/// ```
/// use gee::{Context, Handler};
/// use http::StatusCode;
///
/// fn hello(ctx: &mut Context) {
///     ctx.string(StatusCode::OK, "hello");
/// }
///
/// let timed = |ctx: &mut Context| {
///     ctx.next();
/// };
///
/// fn assert_handler(_: impl Handler) {}
/// assert_handler(hello);
/// assert_handler(timed);
/// ```
pub trait Handler: Send + Sync + 'static {
    fn call(&self, ctx: &mut Context);
}

impl<F> Handler for F
where
    F: Fn(&mut Context) + Send + Sync + 'static,
{
    fn call(&self, ctx: &mut Context) {
        self(ctx)
    }
}

/// A shared, type-erased handler as stored in groups, routes and chains.
pub type HandlerFunc = Arc<dyn Handler>;
