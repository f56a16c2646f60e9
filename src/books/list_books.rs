//! `GET /books`: every book, ascending by id.

use serde_json::Value;

use super::Bookstore;
use crate::error::ApiError;
use crate::router::{self, Context, Endpoint};

pub const NAME: &str = "books.list";

pub fn endpoint() -> Endpoint<Bookstore> {
    router::get("books").named(NAME).handle(handle)
}

pub fn handle(ctx: &Context<Bookstore>) -> Result<Value, ApiError> {
    let books = ctx.state().list()?;
    router::reply(&books)
}
