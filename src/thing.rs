//! Things - typed entities that live in the key-value store.

use serde::{de::DeserializeOwned, Serialize};

use crate::id::Id;
use crate::store::{DecodeError, StoreError, StoreRecord};

/// Trait for types that can be stored as records.
///
/// Usually derived:
///
/// ```ignore
/// #[derive(Clone, Serialize, Deserialize, Thing)]
/// #[thing(namespace = "books")]
/// struct Book {
///     id: Id,
///     title: Option<String>,
/// }
/// ```
pub trait Thing: Serialize + DeserializeOwned + Clone + Send + Sync {
    /// Key namespace for this type (e.g. "books"). Stores scan by it.
    const NAMESPACE: &'static str;

    /// Returns the identifier of this instance. Empty until assigned.
    fn id(&self) -> &Id;

    /// Assign the identifier.
    fn set_id(&mut self, id: Id);

    /// Encode into the store's record form.
    fn to_record(&self) -> Result<StoreRecord, StoreError> {
        StoreRecord::encode(self)
    }

    /// Decode from the store's record form.
    fn from_record(record: StoreRecord) -> Result<Self, DecodeError> {
        record.decode()
    }
}
