//! `POST /books`: store a book, minting its id when the body has none.

use serde_json::Value;

use super::{Book, Bookstore};
use crate::error::ApiError;
use crate::router::{self, Context, Endpoint};

pub const NAME: &str = "books.create";

pub fn endpoint() -> Endpoint<Bookstore> {
    router::post("books")
        .named(NAME)
        .content_json()
        .body::<Book>()
        .handle(handle)
}

pub fn handle(ctx: &Context<Bookstore>) -> Result<Value, ApiError> {
    let book = ctx.body::<Book>()?;
    let book = ctx.state().create(book)?;
    router::reply(&book)
}
