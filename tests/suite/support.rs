//! Step runner for the black-box suite.
//!
//! A scenario is a list of [`Step`]s evaluated in order over one mutable
//! [`TestContext`]. Request steps render their method, path and body from
//! the context, check the response and may write the response book back
//! into the context for the steps that follow.

#![allow(dead_code)]

use std::sync::Arc;

use reqwest::Method;
use serde::{Deserialize, Serialize};

use bookstore::{books, router, Bookstore, InMemoryStore};

/// Base URL of an external system under test.
pub const SUT_VAR: &str = "BOOKSTORE_SUT";

/// A book as seen on the wire, independent of the server's own types.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WireBook {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub title: String,
}

/// State threaded through the steps of one scenario.
#[derive(Debug, Clone, Default)]
pub struct TestContext {
    pub book: WireBook,
}

impl TestContext {
    pub fn with_book(id: &str, title: &str) -> Self {
        Self {
            book: WireBook {
                id: id.to_string(),
                title: title.to_string(),
            },
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub enum Field {
    Id,
    Title,
}

impl Field {
    fn read(self, book: &WireBook) -> &str {
        match self {
            Field::Id => &book.id,
            Field::Title => &book.title,
        }
    }
}

/// Expectation on the decoded response book.
#[derive(Debug, Clone)]
pub enum Check {
    /// Field is present and non-empty.
    Defined(Field),
    /// Field equals the literal.
    Equals(Field, &'static str),
    /// Field equals the same field of the context book.
    SameAsContext(Field),
}

impl Check {
    fn verify(&self, got: &WireBook, ctx: &TestContext) -> Result<(), String> {
        match *self {
            Check::Defined(field) if field.read(got).is_empty() => {
                Err(format!("{:?} is not defined in {:?}", field, got))
            }
            Check::Equals(field, want) if field.read(got) != want => Err(format!(
                "{:?} is {:?}, want {:?}",
                field,
                field.read(got),
                want
            )),
            Check::SameAsContext(field) if field.read(got) != field.read(&ctx.book) => {
                Err(format!(
                    "{:?} is {:?}, want {:?}",
                    field,
                    field.read(got),
                    field.read(&ctx.book)
                ))
            }
            _ => Ok(()),
        }
    }
}

/// One HTTP exchange.
pub struct Exchange {
    pub method: Method,
    pub path: fn(&TestContext) -> String,
    /// Send the context book as a JSON body.
    pub send_book: bool,
    pub status: u16,
    pub checks: Vec<Check>,
    /// Store the response book into the context.
    pub capture: bool,
}

pub enum Step {
    Request(&'static str, Exchange),
    /// Mutate the context between requests.
    Edit(&'static str, fn(&mut TestContext)),
}

pub fn request(method: Method, path: fn(&TestContext) -> String) -> Exchange {
    Exchange {
        method,
        path,
        send_book: false,
        status: 200,
        checks: Vec::new(),
        capture: false,
    }
}

impl Exchange {
    pub fn send_book(mut self) -> Self {
        self.send_book = true;
        self
    }

    pub fn status(mut self, status: u16) -> Self {
        self.status = status;
        self
    }

    pub fn check(mut self, check: Check) -> Self {
        self.checks.push(check);
        self
    }

    pub fn capture(mut self) -> Self {
        self.capture = true;
        self
    }
}

pub fn book_path(ctx: &TestContext) -> String {
    format!("/books/{}", ctx.book.id)
}

pub fn books_path(_: &TestContext) -> String {
    "/books".to_string()
}

/// Run `steps` in order against `base`, stopping at the first failure.
pub async fn run(base: &str, steps: Vec<Step>, ctx: &mut TestContext) -> Result<(), String> {
    let client = reqwest::Client::new();

    for step in steps {
        match step {
            Step::Edit(_, edit) => edit(ctx),
            Step::Request(name, exchange) => {
                exchange_once(&client, base, &exchange, ctx)
                    .await
                    .map_err(|e| format!("{}: {}", name, e))?;
            }
        }
    }
    Ok(())
}

async fn exchange_once(
    client: &reqwest::Client,
    base: &str,
    exchange: &Exchange,
    ctx: &mut TestContext,
) -> Result<(), String> {
    let url = format!("{}{}", base, (exchange.path)(ctx));
    let mut builder = client.request(exchange.method.clone(), &url);
    if exchange.send_book {
        builder = builder.json(&ctx.book);
    }

    let resp = builder.send().await.map_err(|e| e.to_string())?;
    let status = resp.status().as_u16();
    if status != exchange.status {
        let body = resp.text().await.unwrap_or_default();
        return Err(format!(
            "{} {} returned {}, want {} ({})",
            exchange.method, url, status, exchange.status, body
        ));
    }

    if exchange.checks.is_empty() && !exchange.capture {
        return Ok(());
    }

    let got: WireBook = resp.json().await.map_err(|e| e.to_string())?;
    for check in &exchange.checks {
        check.verify(&got, ctx)?;
    }
    if exchange.capture {
        ctx.book = got;
    }
    Ok(())
}

/// Base URL of the system under test: `BOOKSTORE_SUT` when set, otherwise
/// a fresh in-process server over an in-memory store.
pub async fn system_under_test() -> String {
    if let Ok(base) = std::env::var(SUT_VAR) {
        if !base.trim().is_empty() {
            return base.trim_end_matches('/').to_string();
        }
    }

    let api = Bookstore::new(Arc::new(InMemoryStore::named("bookstore")));
    let app = router::into_service(Arc::new(books::router(api)));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}
