//! Transport-neutral request and response descriptors.

use std::borrow::Cow;

use http::header::{HeaderName, HeaderValue, CONTENT_TYPE};
use http::{HeaderMap, Method, StatusCode};
use percent_encoding::percent_decode_str;
use serde::Serialize;
use serde_json::Value;

use crate::error::ApiError;

/// Media type of every body this crate produces or accepts.
pub const APPLICATION_JSON: &str = "application/json";

/// An inbound request: what the router matches endpoints against.
#[derive(Debug, Clone)]
pub struct Request {
    pub method: Method,
    /// Path without query string, e.g. `/books/books:1`.
    pub path: String,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl Request {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        let mut path: String = path.into();
        if let Some(query) = path.find('?') {
            path.truncate(query);
        }
        Self {
            method,
            path,
            headers: HeaderMap::new(),
            body: Vec::new(),
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Add a header. Invalid names or values are ignored.
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        if let (Ok(name), Ok(value)) = (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(value),
        ) {
            self.headers.append(name, value);
        }
        self
    }

    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }

    /// Serialize `value` as the body and mark it `application/json`.
    pub fn with_json<T: Serialize>(self, value: &T) -> Result<Self, serde_json::Error> {
        let body = serde_json::to_vec(value)?;
        Ok(self
            .with_header(CONTENT_TYPE.as_str(), APPLICATION_JSON)
            .with_body(body))
    }

    /// First value of header `name`, if present and valid UTF-8.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Non-empty path segments, percent-decoded.
    ///
    /// Splitting happens before decoding, so an encoded `%2F` stays inside
    /// its segment. A segment that does not decode to UTF-8 is
    /// `InvalidInput`.
    pub fn segments(&self) -> Result<Vec<Cow<'_, str>>, ApiError> {
        self.path
            .split('/')
            .filter(|s| !s.is_empty())
            .map(|s| {
                percent_decode_str(s).decode_utf8().map_err(|_| {
                    ApiError::InvalidInput(format!("path segment {:?} is not valid UTF-8", s))
                })
            })
            .collect()
    }
}

/// The router's answer: status, headers and a JSON body.
#[derive(Debug, Clone)]
pub struct Response {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

impl Response {
    /// `200 OK` with a JSON body.
    pub fn ok(body: Value) -> Self {
        Self::json(StatusCode::OK, body)
    }

    /// The response for a failed request.
    pub fn error(err: &ApiError) -> Self {
        Self::json(err.status_code(), err.to_body())
    }

    fn json(status: StatusCode, body: Value) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(APPLICATION_JSON));
        Self {
            status,
            headers,
            body,
        }
    }
}
