//! Resource identifiers and their generators.
//!
//! An [`Id`] is an opaque string of the form `"<namespace>:<local>"`
//! (`books:0190f5e2-...`). Ids order lexically, which is the order the
//! projector sorts collections by.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

/// Separator between the namespace and the local part of an [`Id`].
pub const SEPARATOR: char = ':';

/// Globally unique resource identity.
///
/// The empty id is the "not yet assigned" state of a freshly parsed entity.
/// Once assigned it never changes.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Id(String);

impl Id {
    /// Build an id from a namespace and a local part.
    pub fn new(namespace: &str, local: impl fmt::Display) -> Self {
        Self(format!("{}{}{}", namespace, SEPARATOR, local))
    }

    /// The unassigned id.
    pub fn empty() -> Self {
        Self(String::new())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The part before the first `:`, or the whole id when there is none.
    pub fn namespace(&self) -> &str {
        match self.0.split_once(SEPARATOR) {
            Some((namespace, _)) => namespace,
            None => &self.0,
        }
    }

    /// The part after the first `:`, empty when there is none.
    pub fn local(&self) -> &str {
        match self.0.split_once(SEPARATOR) {
            Some((_, local)) => local,
            None => "",
        }
    }

    /// True if this id lives under `namespace`.
    pub fn in_namespace(&self, namespace: &str) -> bool {
        self.namespace() == namespace
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Id {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for Id {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl AsRef<str> for Id {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Source of fresh identifiers.
///
/// Shared by every request, so implementations must be safe to call
/// concurrently.
pub trait IdGenerator: Send + Sync {
    /// Produce a fresh, never before returned id under `namespace`.
    fn generate(&self, namespace: &str) -> Id;
}

/// Random v4 UUID ids. The production generator.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidGenerator;

impl IdGenerator for UuidGenerator {
    fn generate(&self, namespace: &str) -> Id {
        Id::new(namespace, uuid::Uuid::new_v4())
    }
}

/// Monotonic, zero-padded ids (`books:000001`, `books:000002`, ...).
///
/// Deterministic and lexically ordered by creation, which makes it handy in
/// tests that assert on list order.
#[derive(Debug, Default)]
pub struct SequenceGenerator {
    next: AtomicU64,
}

impl SequenceGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start the sequence at `start` instead of 1.
    pub fn starting_at(start: u64) -> Self {
        Self {
            next: AtomicU64::new(start.saturating_sub(1)),
        }
    }
}

impl IdGenerator for SequenceGenerator {
    fn generate(&self, namespace: &str) -> Id {
        let n = self.next.fetch_add(1, Ordering::Relaxed) + 1;
        Id::new(namespace, format!("{:06}", n))
    }
}
