//! The bookstore resource.
//!
//! [`Bookstore`] holds the operations over the store; the submodules wrap
//! each one as an endpoint, and [`router`] composes them in priority order:
//!
//! | Endpoint | Route |
//! |---|---|
//! | [`remove_book`] | `DELETE /books/{id}` |
//! | [`update_book`] | `PUT /books/{id}` |
//! | [`create_book`] | `POST /books` |
//! | [`lookup_book`] | `GET /books/{id}` |
//! | [`list_books`] | `GET /books` |

pub mod create_book;
pub mod list_books;
pub mod lookup_book;
pub mod remove_book;
pub mod update_book;

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::id::{Id, IdGenerator, UuidGenerator};
use crate::projector::{self, Collection};
use crate::router::Router;
use crate::store::{KeyVal, Precondition};
use crate::Thing;

/// A book, as sent over the wire and kept in the store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Thing)]
#[thing(namespace = "books")]
pub struct Book {
    #[serde(default, skip_serializing_if = "Id::is_empty")]
    pub id: Id,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl Book {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: Id::empty(),
            title: Some(title.into()),
        }
    }

    pub fn with_id(mut self, id: impl Into<Id>) -> Self {
        self.id = id.into();
        self
    }
}

/// All books, ascending by id.
pub type Books = Collection<Book>;

/// Book operations over a key-value store.
///
/// Cheap to clone; clones share the store and the id generator.
#[derive(Clone)]
pub struct Bookstore {
    db: Arc<dyn KeyVal>,
    ids: Arc<dyn IdGenerator>,
}

impl Bookstore {
    /// Bookstore over `db`, minting random ids.
    pub fn new(db: Arc<dyn KeyVal>) -> Self {
        Self::with_ids(db, Arc::new(UuidGenerator))
    }

    pub fn with_ids(db: Arc<dyn KeyVal>, ids: Arc<dyn IdGenerator>) -> Self {
        Self { db, ids }
    }

    /// Every book, sorted by id. An empty store yields an empty list.
    pub fn list(&self) -> Result<Books, ApiError> {
        let records = self
            .db
            .scan(Book::NAMESPACE)?
            .map(|record| record.map_err(ApiError::from));
        projector::project(records, Book::from_record)
    }

    /// Store `book`, minting an id if it has none. An existing book with the
    /// same id is overwritten.
    pub fn create(&self, mut book: Book) -> Result<Book, ApiError> {
        if book.id.is_empty() {
            book.set_id(self.ids.generate(Book::NAMESPACE));
        }
        self.db.put(book.to_record()?)?;
        tracing::debug!(id = %book.id, "book created");
        Ok(book)
    }

    /// Fetch one book. `NotFound` if absent.
    pub fn lookup(&self, id: &Id) -> Result<Book, ApiError> {
        let record = self.db.get(id)?;
        Ok(Book::from_record(record)?)
    }

    /// Overwrite the fields of an existing book with those set in `patch`.
    ///
    /// The id always comes from `id`; any id in `patch` is ignored. Fails
    /// with `NotFound` if no book with that id exists.
    pub fn update(&self, id: Id, mut patch: Book) -> Result<Book, ApiError> {
        patch.set_id(id);
        let updated = self.db.update(patch.to_record()?, Precondition::Exists)?;
        let book = Book::from_record(updated)?;
        tracing::debug!(id = %book.id, "book updated");
        Ok(book)
    }

    /// Delete a book. Deleting an absent book succeeds.
    pub fn remove(&self, id: &Id) -> Result<(), ApiError> {
        self.db.remove(id)?;
        tracing::debug!(%id, "book removed");
        Ok(())
    }
}

/// The bookstore's endpoint router.
pub fn router(api: Bookstore) -> Router<Bookstore> {
    crate::register_endpoints!(
        Router::new(api),
        remove_book,
        update_book,
        create_book,
        lookup_book,
        list_books,
    )
}
