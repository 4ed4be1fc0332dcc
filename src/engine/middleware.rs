//! Built-in middleware.

use std::{
    any::Any,
    panic::{self, AssertUnwindSafe},
    time::Instant,
};

use http::StatusCode;

use super::{context::Context, handler::Handler};

/// Logs method, path, status and latency once the rest of the chain returns.
pub fn logger() -> impl Handler {
    |ctx: &mut Context| {
        let start = Instant::now();
        ctx.next();
        tracing::info!(
            method = %ctx.method(),
            path = %ctx.path(),
            status = ctx.status_code().as_u16(),
            elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Request handled"
        );
    }
}

/// Turns a panic anywhere later in the chain into a `500` JSON response.
///
/// Install it before the handlers it should protect: a panic in middleware
/// that runs earlier is not caught here.
pub fn recovery() -> impl Handler {
    |ctx: &mut Context| {
        if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(|| ctx.next())) {
            let msg = panic_message(payload.as_ref());
            tracing::error!(
                method = %ctx.method(),
                path = %ctx.path(),
                "Handler panicked: {}",
                msg
            );
            ctx.fail(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error");
        }
    }
}

pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_owned()
    } else {
        "unable to downcast the panic payload".to_owned()
    }
}
