//! Predicates - the independent checks an endpoint is built from.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use http::header::HeaderName;
use http::Method;
use serde::de::DeserializeOwned;

use super::pattern::{Params, Pattern};
use super::request::Request;

/// A parsed body, type-erased until a handler asks for it by type.
pub(crate) type AnyBody = Box<dyn Any + Send + Sync>;

type BodyParser = Arc<dyn Fn(&[u8]) -> Result<AnyBody, String> + Send + Sync>;

/// One check against an inbound request.
#[derive(Clone)]
pub enum Predicate {
    /// Request method must equal this one.
    Method(Method),
    /// Request path must match; variables are bound for the handler.
    Path(Pattern),
    /// Header must be present and, if `value` is given, carry that value.
    ///
    /// Values compare like media types: parameters after `;` are ignored
    /// and case does not matter, so `application/json` accepts
    /// `Application/JSON; charset=utf-8`.
    Header { name: HeaderName, value: Option<String> },
    /// Body must parse as JSON into `type_name`. When not `required` a
    /// missing or unparsable body just leaves no body for the handler.
    Body {
        type_name: &'static str,
        required: bool,
        parse: BodyParser,
    },
}

impl Predicate {
    /// Body predicate parsing into `T`.
    pub fn body<T>(required: bool) -> Self
    where
        T: DeserializeOwned + Send + Sync + 'static,
    {
        Predicate::Body {
            type_name: std::any::type_name::<T>(),
            required,
            parse: Arc::new(|bytes| {
                serde_json::from_slice::<T>(bytes)
                    .map(|value| Box::new(value) as AnyBody)
                    .map_err(|e| e.to_string())
            }),
        }
    }

    /// Method and path predicates decide *which* endpoint a request is
    /// for; the rest decide whether the request is acceptable to it.
    pub fn is_route(&self) -> bool {
        matches!(self, Predicate::Method(_) | Predicate::Path(_))
    }

    pub(crate) fn check(
        &self,
        request: &Request,
        segments: &[&str],
        matched: &mut Matched,
    ) -> Result<(), Mismatch> {
        match self {
            Predicate::Method(method) => {
                if request.method == *method {
                    Ok(())
                } else {
                    Err(Mismatch::Route)
                }
            }
            Predicate::Path(pattern) => match pattern.matches(segments) {
                Some(params) => {
                    matched.params = params;
                    Ok(())
                }
                None => Err(Mismatch::Route),
            },
            Predicate::Header { name, value } => {
                let actual = request
                    .headers
                    .get(name)
                    .ok_or_else(|| Mismatch::Input(format!("missing header {}", name)))?;
                match value {
                    None => Ok(()),
                    Some(expected) => {
                        let actual = actual.to_str().unwrap_or_default();
                        let media = actual.split(';').next().unwrap_or_default().trim();
                        if media.eq_ignore_ascii_case(expected) {
                            Ok(())
                        } else {
                            Err(Mismatch::Input(format!(
                                "header {} must be {}, got {:?}",
                                name, expected, actual
                            )))
                        }
                    }
                }
            }
            Predicate::Body {
                type_name,
                required,
                parse,
            } => {
                if request.body.is_empty() && !required {
                    return Ok(());
                }
                match parse(&request.body) {
                    Ok(body) => {
                        matched.body = Some(body);
                        Ok(())
                    }
                    Err(_) if !required => Ok(()),
                    Err(reason) => Err(Mismatch::Input(format!(
                        "body is not a valid {}: {}",
                        short_type_name(type_name),
                        reason
                    ))),
                }
            }
        }
    }
}

impl fmt::Debug for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Predicate::Method(method) => f.debug_tuple("Method").field(method).finish(),
            Predicate::Path(pattern) => f.debug_tuple("Path").field(pattern).finish(),
            Predicate::Header { name, value } => f
                .debug_struct("Header")
                .field("name", name)
                .field("value", value)
                .finish(),
            Predicate::Body {
                type_name,
                required,
                ..
            } => f
                .debug_struct("Body")
                .field("type_name", type_name)
                .field("required", required)
                .finish(),
        }
    }
}

/// `bookstore::books::Book` -> `Book`
fn short_type_name(name: &str) -> &str {
    name.rsplit("::").next().unwrap_or(name)
}

/// What an endpoint's predicates captured from the request.
#[derive(Default)]
pub(crate) struct Matched {
    pub params: Params,
    pub body: Option<AnyBody>,
}

/// Why an endpoint did not take a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Mismatch {
    /// Method or path differ: the request is for some other endpoint.
    Route,
    /// Right route, but headers or body are unacceptable.
    Input(String),
}
