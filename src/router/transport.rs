//! HTTP transport for the router: serves it with axum.
//!
//! Requires the `http` feature.
//!
//! ## Routes
//!
//! - `GET /health`: health check returning `{ "ok": true, "endpoints": [...] }`.
//! - anything else: converted into a [`Request`] and dispatched through the
//!   router's endpoints.
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use bookstore::{books, router};
//!
//! let service = Arc::new(books::router(api));
//!
//! // Get the axum router to compose with other axum routes
//! let app = router::into_service(service.clone());
//!
//! // Or serve directly
//! router::serve(service, "0.0.0.0:8080").await?;
//! ```

use std::sync::Arc;

use axum::body::to_bytes;
use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Json;
use serde_json::json;
use tower_http::trace::TraceLayer;

use super::{Request, Router};
use crate::error::ApiError;

/// Largest request body accepted, in bytes.
const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Build an axum `Router` that dispatches every request through `service`.
pub fn into_service<S: Send + Sync + 'static>(service: Arc<Router<S>>) -> axum::Router {
    axum::Router::new()
        .route("/health", get(health_handler::<S>))
        .fallback(dispatch_handler::<S>)
        .layer(TraceLayer::new_for_http())
        .with_state(service)
}

/// Serve the router over HTTP at the given address (e.g. `"0.0.0.0:8080"`).
///
/// Runs until the process receives Ctrl-C.
pub async fn serve<S: Send + Sync + 'static>(
    service: Arc<Router<S>>,
    addr: &str,
) -> Result<(), std::io::Error> {
    let app = into_service(service);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(addr = %listener.local_addr()?, "listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "cannot listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}

/// `GET /health`: returns `{ "ok": true, "endpoints": [...] }`.
async fn health_handler<S: Send + Sync + 'static>(
    State(service): State<Arc<Router<S>>>,
) -> impl IntoResponse {
    let endpoints: Vec<&str> = service.endpoints();
    Json(json!({ "ok": true, "endpoints": endpoints }))
}

/// Fallback: hand the request to the endpoint router.
async fn dispatch_handler<S: Send + Sync + 'static>(
    State(service): State<Arc<Router<S>>>,
    request: axum::extract::Request,
) -> axum::response::Response {
    let (parts, body) = request.into_parts();
    let body = match to_bytes(body, MAX_BODY_BYTES).await {
        Ok(bytes) => bytes,
        Err(e) => {
            let err = ApiError::InvalidInput(format!("unreadable body: {}", e));
            return (err.status_code(), Json(err.to_body())).into_response();
        }
    };

    let mut request = Request::new(parts.method, parts.uri.path());
    request.headers = parts.headers;
    request.body = body.to_vec();

    let response = service.dispatch(&request);
    let mut http_response = (response.status, Json(response.body)).into_response();
    http_response.headers_mut().extend(response.headers);
    http_response
}
