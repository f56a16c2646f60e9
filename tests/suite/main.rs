//! Black-box suite for the bookstore API.
//!
//! Runs against `BOOKSTORE_SUT` (e.g. `http://localhost:8080`) when set,
//! otherwise against an in-process server.

#![cfg(feature = "http")]

mod support;

use support::{run, system_under_test, TestContext};

#[tokio::test]
async fn hobbit() {
    let base = system_under_test().await;
    let mut ctx = TestContext::with_book(scenarios::HOBBIT, "There and Back Again");

    run(&base, scenarios::create(), &mut ctx).await.unwrap();

    ctx.book.title = "The Hobbit".to_string();
    run(&base, scenarios::update(), &mut ctx).await.unwrap();
    run(&base, scenarios::lookup(), &mut ctx).await.unwrap();
    run(&base, scenarios::remove(), &mut ctx).await.unwrap();
}

#[tokio::test]
async fn lifecycle() {
    let base = system_under_test().await;
    let mut ctx = TestContext::with_book("", "Lifecycle");

    run(&base, scenarios::lifecycle(), &mut ctx).await.unwrap();
}

#[tokio::test]
async fn missing_book_is_not_found() {
    let base = system_under_test().await;
    let mut ctx = TestContext::with_book("books:never-created", "");

    let steps = vec![support::Step::Request(
        "lookup",
        support::request(reqwest::Method::GET, support::book_path).status(404),
    )];
    run(&base, steps, &mut ctx).await.unwrap();
}
