// Lets `#[derive(Thing)]` expand to `bookstore::...` paths inside this crate too.
extern crate self as bookstore;

pub mod books;
pub mod config;
mod error;
mod id;
pub mod projector;
pub mod router;
pub mod store;
mod thing;

pub use books::{Book, Books, Bookstore};
pub use config::Config;
pub use error::ApiError;
pub use id::{Id, IdGenerator, SequenceGenerator, UuidGenerator};
pub use projector::Collection;
pub use router::{Context, Endpoint, Request, Response, Router};
pub use store::{InMemoryStore, KeyVal, StoreError, StoreRecord};
pub use thing::Thing;

// Re-export the derive macro alongside the trait it implements
pub use bookstore_macros::Thing;
