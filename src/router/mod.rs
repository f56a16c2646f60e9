//! Declarative endpoint routing.
//!
//! Build a service by registering endpoints on a `Router`. Each endpoint is
//! an ordered list of predicates (method, path pattern, headers, body) plus
//! a handler. The router tries endpoints in registration order and runs the
//! first one whose predicates all hold.
//!
//! ## Quick Start
//!
//! ```ignore
//! use bookstore::router::{self, Router, Request};
//! use serde_json::json;
//!
//! let service = Router::new(state)
//!     .endpoint(router::get("books/{id}").handle(|ctx| {
//!         let id = ctx.param("id")?;
//!         Ok(json!({ "id": id }))
//!     }));
//!
//! // Direct dispatch
//! let response = service.dispatch(&Request::get("/books/books:1"));
//!
//! // HTTP transport (requires "http" feature)
//! // router::serve(Arc::new(service), "0.0.0.0:8080").await?;
//! ```
//!
//! ## Endpoint Convention
//!
//! Each endpoint module exports an `endpoint()` constructor and a `handle`
//! function:
//!
//! ```ignore
//! // src/books/lookup_book.rs
//!
//! pub fn endpoint() -> Endpoint<Bookstore> {
//!     router::get("books/{id}").handle(handle)
//! }
//!
//! pub fn handle(ctx: &Context<Bookstore>) -> Result<Value, ApiError> {
//!     let book = ctx.state().lookup(&Id::from(ctx.param("id")?))?;
//!     router::reply(&book)
//! }
//! ```
//!
//! ## Failures
//!
//! Handler errors become responses through [`ApiError::status_code`] and
//! [`ApiError::to_body`], nowhere else. When no endpoint matches:
//! - if some endpoint matched method and path but rejected the headers or
//!   body, the result is `InvalidInput` (400) with that rejection;
//! - otherwise it is `NoRoute` (404).

mod context;
mod endpoint;
mod pattern;
mod predicate;
mod request;

use serde::Serialize;
use serde_json::Value;

use crate::error::ApiError;

pub use context::Context;
pub use endpoint::{delete, get, post, put, route, Endpoint, EndpointBuilder};
pub use pattern::{Params, Pattern};
pub use predicate::Predicate;
pub use request::{Request, Response, APPLICATION_JSON};

use predicate::Mismatch;

// HTTP transport (requires "http" feature)
#[cfg(feature = "http")]
mod transport;
#[cfg(feature = "http")]
pub use transport::{into_service, serve};

/// An ordered set of endpoints sharing one state value.
///
/// Generic over `S`, the state handed to every handler through
/// `ctx.state()`. The router holds no per-request state; each dispatch is
/// a fresh match.
pub struct Router<S> {
    state: S,
    endpoints: Vec<Endpoint<S>>,
}

impl<S: Send + Sync + 'static> Router<S> {
    /// Create a new router with the given state.
    pub fn new(state: S) -> Self {
        Self {
            state,
            endpoints: Vec::new(),
        }
    }

    /// Register an endpoint after the ones already registered.
    ///
    /// Builder style, returns `self` for chaining.
    pub fn endpoint(mut self, endpoint: Endpoint<S>) -> Self {
        self.endpoints.push(endpoint);
        self
    }

    /// Run the request through the first matching endpoint.
    pub fn route(&self, request: &Request) -> Result<Value, ApiError> {
        let decoded = request.segments()?;
        let segments: Vec<&str> = decoded.iter().map(|s| &**s).collect();
        let mut rejection: Option<(&str, String)> = None;

        for endpoint in &self.endpoints {
            match endpoint.matches(request, &segments) {
                Ok(matched) => {
                    tracing::debug!(
                        endpoint = endpoint.name(),
                        method = %request.method,
                        path = %request.path,
                        "matched"
                    );
                    let ctx = Context::new(endpoint.name(), request, matched, &self.state);
                    return endpoint.call(&ctx);
                }
                Err(Mismatch::Route) => {}
                Err(Mismatch::Input(reason)) => {
                    if rejection.is_none() {
                        rejection = Some((endpoint.name(), reason));
                    }
                }
            }
        }

        Err(match rejection {
            Some((endpoint, reason)) => {
                tracing::debug!(endpoint, %reason, "request rejected");
                ApiError::InvalidInput(reason)
            }
            None => ApiError::NoRoute {
                method: request.method.to_string(),
                path: request.path.clone(),
            },
        })
    }

    /// Route the request and turn the outcome into a response.
    pub fn dispatch(&self, request: &Request) -> Response {
        match self.route(request) {
            Ok(body) => Response::ok(body),
            Err(e) => {
                if e.is_internal() {
                    tracing::error!(
                        method = %request.method,
                        path = %request.path,
                        error = %e,
                        "request failed"
                    );
                } else {
                    tracing::debug!(
                        method = %request.method,
                        path = %request.path,
                        error = %e,
                        "request refused"
                    );
                }
                Response::error(&e)
            }
        }
    }

    /// Registered endpoint names, in priority order.
    pub fn endpoints(&self) -> Vec<&str> {
        self.endpoints.iter().map(|e| e.name()).collect()
    }

    /// Get a reference to the state.
    pub fn state(&self) -> &S {
        &self.state
    }
}

/// Serialize a handler result. Failure here is ours, not the client's.
pub fn reply<T: Serialize>(value: &T) -> Result<Value, ApiError> {
    serde_json::to_value(value).map_err(|e| ApiError::Internal(Box::new(e)))
}

/// Register endpoint modules with a router using the convention pattern.
///
/// Each module must export `endpoint() -> Endpoint<S>`. Endpoints keep the
/// order they are listed in.
///
/// # Example
/// ```ignore
/// let router = bookstore::register_endpoints!(
///     Router::new(state),
///     books::remove_book,
///     books::update_book,
/// );
/// ```
#[macro_export]
macro_rules! register_endpoints {
    ($router:expr, $( $($seg:ident)::+ ),+ $(,)?) => {
        $router
        $(
            .endpoint($($seg)::+::endpoint())
        )+
    };
}
