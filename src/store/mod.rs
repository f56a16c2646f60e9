//! Store - the key-value contract the bookstore runs on.
//!
//! Handlers never talk to a concrete backend. They hold an
//! `Arc<dyn KeyVal>` handed to them at startup and speak in untyped
//! [`StoreRecord`]s; conversion to typed entities happens at the edges.
//!
//! ## Example
//!
//! ```ignore
//! use bookstore::store::{self, KeyVal, Precondition, StoreRecord};
//!
//! let db = store::connect("mem://bookstore")?;
//! db.put(StoreRecord::encode(&book)?)?;
//! let record = db.get(&book.id)?;
//! db.update(StoreRecord::encode(&patch)?, Precondition::Exists)?;
//! for record in db.scan("books")? {
//!     let book: Book = record?.decode()?;
//! }
//! ```

mod in_memory;
mod record;

use std::fmt;
use std::sync::Arc;

use crate::id::Id;

pub use in_memory::InMemoryStore;
pub use record::{AttrValue, DecodeError, StoreRecord, KEY_ATTRIBUTE};

/// Lazy sequence of records returned by [`KeyVal::scan`].
///
/// Each item is decoded from the backend as it is pulled; a backend failure
/// partway through surfaces as an `Err` item.
pub type Scan<'a> = Box<dyn Iterator<Item = Result<StoreRecord, StoreError>> + Send + 'a>;

/// Condition a conditional write must satisfy against the stored state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Precondition {
    /// Write unconditionally.
    Always,
    /// A record with the same key must already exist.
    Exists,
}

/// Key-value storage contract.
///
/// Implementations are shared across concurrent requests and must be safe
/// for concurrent use. Consistency between interleaved calls is the
/// backend's business; callers do no locking of their own.
pub trait KeyVal: Send + Sync {
    /// Fetch a record by key. Fails with `NotFound` if absent.
    fn get(&self, key: &Id) -> Result<StoreRecord, StoreError>;

    /// Insert or overwrite a record. The record must carry a key.
    fn put(&self, record: StoreRecord) -> Result<(), StoreError>;

    /// Merge `record`'s attributes into the stored one, subject to
    /// `precondition`. Returns the record as stored after the write.
    ///
    /// Fails with `PreconditionFailed` when the condition does not hold.
    fn update(
        &self,
        record: StoreRecord,
        precondition: Precondition,
    ) -> Result<StoreRecord, StoreError>;

    /// Remove a record. Removing an absent key succeeds.
    fn remove(&self, key: &Id) -> Result<(), StoreError>;

    /// Every record whose key lives in the `prefix` namespace, in no
    /// particular order.
    fn scan(&self, prefix: &str) -> Result<Scan<'_>, StoreError>;
}

impl<T: KeyVal + ?Sized> KeyVal for Arc<T> {
    fn get(&self, key: &Id) -> Result<StoreRecord, StoreError> {
        (**self).get(key)
    }

    fn put(&self, record: StoreRecord) -> Result<(), StoreError> {
        (**self).put(record)
    }

    fn update(
        &self,
        record: StoreRecord,
        precondition: Precondition,
    ) -> Result<StoreRecord, StoreError> {
        (**self).update(record, precondition)
    }

    fn remove(&self, key: &Id) -> Result<(), StoreError> {
        (**self).remove(key)
    }

    fn scan(&self, prefix: &str) -> Result<Scan<'_>, StoreError> {
        (**self).scan(prefix)
    }
}

/// Error type for store operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// No record under this key.
    NotFound(Id),
    /// A conditional write found the stored state did not match.
    PreconditionFailed(Id),
    /// Record could not be encoded or decoded at rest.
    Codec(String),
    /// The backend itself failed.
    Backend(String),
    /// Backend lock poisoned by a panicking writer.
    LockPoisoned(&'static str),
    /// The store URL could not be understood.
    Config(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::NotFound(id) => write!(f, "record not found: {}", id),
            StoreError::PreconditionFailed(id) => {
                write!(f, "precondition failed for record {}", id)
            }
            StoreError::Codec(msg) => write!(f, "record codec error: {}", msg),
            StoreError::Backend(msg) => write!(f, "store backend error: {}", msg),
            StoreError::LockPoisoned(operation) => {
                write!(f, "store lock poisoned during {}", operation)
            }
            StoreError::Config(msg) => write!(f, "invalid store configuration: {}", msg),
        }
    }
}

impl std::error::Error for StoreError {}

/// Open the store named by `url`.
///
/// Supported schemes:
/// - `mem://<table>` (or `mem:///<table>`): a fresh in-process store.
///
/// The table is one segment; `mem://a/b` is rejected.
pub fn connect(url: &str) -> Result<Arc<dyn KeyVal>, StoreError> {
    let (scheme, rest) = url
        .split_once("://")
        .ok_or_else(|| StoreError::Config(format!("missing scheme in {:?}", url)))?;

    let table = rest.trim_matches('/');
    if table.is_empty() {
        return Err(StoreError::Config(format!("missing table name in {:?}", url)));
    }
    if table.contains('/') {
        return Err(StoreError::Config(format!(
            "table name must be a single path segment in {:?}",
            url
        )));
    }

    match scheme {
        "mem" => Ok(Arc::new(InMemoryStore::named(table))),
        other => Err(StoreError::Config(format!(
            "unsupported store scheme {:?}",
            other
        ))),
    }
}
