//! `GET /books/{id}`

use serde_json::Value;

use super::Bookstore;
use crate::error::ApiError;
use crate::id::Id;
use crate::router::{self, Context, Endpoint};

pub const NAME: &str = "books.lookup";

pub fn endpoint() -> Endpoint<Bookstore> {
    router::get("books/{id}").named(NAME).handle(handle)
}

pub fn handle(ctx: &Context<Bookstore>) -> Result<Value, ApiError> {
    let id = Id::from(ctx.param("id")?);
    let book = ctx.state().lookup(&id)?;
    router::reply(&book)
}
