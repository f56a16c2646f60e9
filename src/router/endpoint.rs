//! Endpoint - a predicate set bound to a handler.

use http::header::{HeaderName, CONTENT_TYPE};
use http::Method;
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::context::Context;
use super::pattern::Pattern;
use super::predicate::{Matched, Mismatch, Predicate};
use super::request::{Request, APPLICATION_JSON};
use crate::error::ApiError;

type Handler<S> = Box<dyn Fn(&Context<S>) -> Result<Value, ApiError> + Send + Sync>;

/// A routed combination of predicates and a handler.
///
/// Predicates are checked in the order they were added; the first one that
/// fails rejects the request for this endpoint.
pub struct Endpoint<S> {
    name: String,
    predicates: Vec<Predicate>,
    handle: Handler<S>,
}

impl<S> Endpoint<S> {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    pub(crate) fn matches(&self, request: &Request, segments: &[&str]) -> Result<Matched, Mismatch> {
        let mut matched = Matched::default();
        for predicate in &self.predicates {
            predicate.check(request, segments, &mut matched)?;
        }
        Ok(matched)
    }

    pub(crate) fn call(&self, ctx: &Context<S>) -> Result<Value, ApiError> {
        (self.handle)(ctx)
    }
}

/// Start an endpoint matching `method` on `pattern`.
pub fn route(method: Method, pattern: &str) -> EndpointBuilder {
    let pattern = Pattern::parse(pattern);
    EndpointBuilder {
        name: format!("{} {}", method, pattern),
        predicates: vec![Predicate::Method(method), Predicate::Path(pattern)],
    }
}

pub fn get(pattern: &str) -> EndpointBuilder {
    route(Method::GET, pattern)
}

pub fn post(pattern: &str) -> EndpointBuilder {
    route(Method::POST, pattern)
}

pub fn put(pattern: &str) -> EndpointBuilder {
    route(Method::PUT, pattern)
}

pub fn delete(pattern: &str) -> EndpointBuilder {
    route(Method::DELETE, pattern)
}

/// Builder for an [`Endpoint`]. Finish with [`EndpointBuilder::handle`].
#[derive(Debug, Clone)]
pub struct EndpointBuilder {
    name: String,
    predicates: Vec<Predicate>,
}

impl EndpointBuilder {
    /// Override the generated `"METHOD pattern"` name.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Require header `name` to be present.
    pub fn has_header(self, name: HeaderName) -> Self {
        self.predicate(Predicate::Header { name, value: None })
    }

    /// Require header `name` to carry `value`.
    pub fn header(self, name: HeaderName, value: &str) -> Self {
        self.predicate(Predicate::Header {
            name,
            value: Some(value.to_string()),
        })
    }

    /// Require `Content-Type: application/json`.
    pub fn content_json(self) -> Self {
        self.header(CONTENT_TYPE, APPLICATION_JSON)
    }

    /// Require a JSON body that parses into `T`.
    pub fn body<T>(self) -> Self
    where
        T: DeserializeOwned + Send + Sync + 'static,
    {
        self.predicate(Predicate::body::<T>(true))
    }

    /// Accept an optional JSON body of type `T`.
    pub fn optional_body<T>(self) -> Self
    where
        T: DeserializeOwned + Send + Sync + 'static,
    {
        self.predicate(Predicate::body::<T>(false))
    }

    /// Append any predicate.
    pub fn predicate(mut self, predicate: Predicate) -> Self {
        self.predicates.push(predicate);
        self
    }

    /// Bind the handler, completing the endpoint.
    pub fn handle<S, F>(self, handler: F) -> Endpoint<S>
    where
        F: Fn(&Context<S>) -> Result<Value, ApiError> + Send + Sync + 'static,
    {
        Endpoint {
            name: self.name,
            predicates: self.predicates,
            handle: Box::new(handler),
        }
    }
}
