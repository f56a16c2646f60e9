//! `PUT /books/{id}`: change an existing book.
//!
//! The id is taken from the path. An `id` in the body is ignored, so
//! clients may send back a book exactly as they received it.

use serde_json::Value;

use super::{Book, Bookstore};
use crate::error::ApiError;
use crate::id::Id;
use crate::router::{self, Context, Endpoint};

pub const NAME: &str = "books.update";

pub fn endpoint() -> Endpoint<Bookstore> {
    router::put("books/{id}")
        .named(NAME)
        .content_json()
        .body::<Book>()
        .handle(handle)
}

pub fn handle(ctx: &Context<Bookstore>) -> Result<Value, ApiError> {
    let id = Id::from(ctx.param("id")?);
    let patch = ctx.body::<Book>()?;
    let book = ctx.state().update(id, patch)?;
    router::reply(&book)
}
