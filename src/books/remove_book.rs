//! `DELETE /books/{id}`: idempotent; echoes the id.

use serde_json::Value;

use super::{Book, Bookstore};
use crate::error::ApiError;
use crate::id::Id;
use crate::router::{self, Context, Endpoint};

pub const NAME: &str = "books.remove";

pub fn endpoint() -> Endpoint<Bookstore> {
    router::delete("books/{id}").named(NAME).handle(handle)
}

pub fn handle(ctx: &Context<Bookstore>) -> Result<Value, ApiError> {
    let id = Id::from(ctx.param("id")?);
    ctx.state().remove(&id)?;
    router::reply(&Book { id, title: None })
}
