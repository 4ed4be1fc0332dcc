//! Axum transport adapter and server lifecycle.
//!
//! The engine is mounted as the fallback of an otherwise empty `axum::Router`,
//! so every request reaches the trie regardless of method or path. Axum only
//! supplies sockets, HTTP parsing and the tower layers around the engine.

use std::{any::Any, future::Future, sync::Arc};

use axum::{
    body::Body,
    extract::{Request, State},
    response::{IntoResponse, Response},
};
use http::StatusCode;
use http_body_util::LengthLimitError;
use tokio::{net::TcpListener, signal};
use tower_http::{catch_panic::CatchPanicLayer, trace::TraceLayer};

use super::{Context, Engine, middleware::panic_message};
use crate::{Error, Result};

impl Engine {
    /// Freezes the engine and turns it into an axum router.
    ///
    /// Consuming `self` ends the setup phase: the engine moves behind an `Arc`
    /// and is only read from then on.
    pub fn into_router(self) -> axum::Router {
        let catch_panic = self.config.http.catch_panic;
        let engine = Arc::new(self);

        let mut router = axum::Router::new().fallback(dispatch).with_state(engine);
        if catch_panic {
            router = router.layer(CatchPanicLayer::custom(panic_response));
        }
        router.layer(TraceLayer::new_for_http())
    }

    /// Binds `http.bind_addr:http.bind_port` and serves until SIGINT or SIGTERM.
    pub async fn run(self) -> Result<()> {
        let bind_addr = self.config.http.full_bind_addr();
        let listener = TcpListener::bind(&bind_addr).await?;
        tracing::info!("Bound to {}", &bind_addr);
        self.serve_with_shutdown(listener, shutdown_signal()).await
    }

    /// Serves on an already bound listener until the process is stopped.
    pub async fn serve(self, listener: TcpListener) -> Result<()> {
        self.serve_with_shutdown(listener, std::future::pending()).await
    }

    /// Serves on `listener` until `signal` completes, then drains in-flight
    /// requests for at most `http.shutdown_timeout`.
    pub async fn serve_with_shutdown<F>(self, listener: TcpListener, signal: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let shutdown_timeout = self.config.http.shutdown_timeout;
        if let Ok(addr) = listener.local_addr() {
            tracing::info!("Waiting for connections on {}", addr);
        }

        let router = self.into_router();
        let (initiated_tx, initiated_rx) = tokio::sync::oneshot::channel::<()>();

        let serve_future = axum::serve(listener, router).with_graceful_shutdown(async move {
            signal.await;
            tracing::info!(
                "Shutdown signal received, starting graceful shutdown (timeout: {}s)",
                shutdown_timeout.as_secs()
            );
            initiated_tx.send(()).ok();
        });

        // The grace period starts only once the signal has fired.
        tokio::select! {
            result = serve_future => {
                tracing::info!("Graceful shutdown completed");
                result?;
            }
            _ = async {
                if initiated_rx.await.is_err() {
                    std::future::pending::<()>().await;
                }
                tokio::time::sleep(shutdown_timeout).await;
            } => {
                tracing::warn!("Graceful shutdown timeout expired, forcing shutdown");
            }
        }

        Ok(())
    }
}

async fn dispatch(State(engine): State<Arc<Engine>>, request: Request) -> Response {
    let (parts, body) = request.into_parts();
    let limit = engine.config.http.payload_limit();

    let body = match axum::body::to_bytes(body, limit).await {
        Ok(bytes) => bytes,
        Err(err) => {
            let inner = err.into_inner();
            let error = if inner.is::<LengthLimitError>() {
                Error::payload_too_large(format!("Request body exceeds {limit} bytes"))
            } else {
                Error::invalid_input(format!("Failed to read request body: {inner}"))
            };
            return error.into_response();
        }
    };

    let mut ctx = Context::from_parts(parts, body);
    engine.handle(&mut ctx);
    ctx.into_response()
}

fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    tracing::error!("Service panicked: {}", panic_message(err.as_ref()));
    Response::builder()
        .status(StatusCode::INTERNAL_SERVER_ERROR)
        .header(http::header::CONTENT_TYPE, "text/plain; charset=utf-8")
        .body(Body::from("Internal Server Error"))
        .unwrap_or_else(|_| Response::new(Body::from("Internal Server Error")))
}

/// Completes on Ctrl+C or SIGTERM. If a handler cannot be installed, that
/// branch waits forever instead.
pub(crate) async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => tracing::debug!("Ctrl+C signal received"),
            Err(err) => {
                tracing::warn!("Failed to install Ctrl+C handler: {}", err);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut handler) => {
                handler.recv().await;
                tracing::debug!("SIGTERM signal received");
            }
            Err(err) => {
                tracing::warn!("Failed to install SIGTERM handler: {}", err);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
