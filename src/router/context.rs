//! Context passed to endpoint handlers.
//!
//! Carries the request, the path variables and body the endpoint's
//! predicates captured, and a reference to the router state. Handlers
//! access everything they need through the context.

use serde::de::DeserializeOwned;

use super::pattern::Params;
use super::predicate::{AnyBody, Matched};
use super::request::Request;
use crate::error::ApiError;

/// The context passed to every endpoint handler.
///
/// Generic over `S` (the router state) so handlers can reach whatever
/// shared dependencies the router was built with.
///
/// ## Example
///
/// ```ignore
/// pub fn handle(ctx: &Context<Bookstore>) -> Result<Value, ApiError> {
///     let id = ctx.param("id")?;
///     let book = ctx.body::<Book>()?;
///     // ...
/// }
/// ```
pub struct Context<'a, S> {
    /// Name of the endpoint being handled.
    endpoint: &'a str,
    request: &'a Request,
    params: Params,
    body: Option<AnyBody>,
    state: &'a S,
}

impl<'a, S> Context<'a, S> {
    pub(crate) fn new(endpoint: &'a str, request: &'a Request, matched: Matched, state: &'a S) -> Self {
        Self {
            endpoint,
            request,
            params: matched.params,
            body: matched.body,
            state,
        }
    }

    /// A path variable bound by the endpoint's pattern.
    pub fn param(&self, name: &str) -> Result<&str, ApiError> {
        self.params
            .get(name)
            .ok_or_else(|| ApiError::InvalidInput(format!("missing path parameter {}", name)))
    }

    /// The body parsed by the endpoint's body predicate.
    ///
    /// Fails with `InvalidInput` if the endpoint took no body (an optional
    /// body that was absent).
    pub fn body<T: Clone + 'static>(&self) -> Result<T, ApiError> {
        let body = self
            .body
            .as_ref()
            .ok_or_else(|| ApiError::InvalidInput("missing request body".into()))?;
        body.downcast_ref::<T>().cloned().ok_or_else(|| {
            ApiError::Internal(
                format!(
                    "endpoint {} parsed its body as another type than {}",
                    self.endpoint,
                    std::any::type_name::<T>()
                )
                .into(),
            )
        })
    }

    /// Deserialize the raw request body, bypassing any body predicate.
    pub fn input<T: DeserializeOwned>(&self) -> Result<T, ApiError> {
        serde_json::from_slice(&self.request.body).map_err(ApiError::from)
    }

    /// Get the endpoint name.
    pub fn endpoint(&self) -> &str {
        self.endpoint
    }

    pub fn request(&self) -> &Request {
        self.request
    }

    /// First value of a request header.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.request.header(name)
    }

    /// Get a reference to the router state.
    pub fn state(&self) -> &S {
        self.state
    }
}
