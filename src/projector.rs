//! Projector - fold a lazy record sequence into an ordered typed collection.
//!
//! ```ignore
//! let books: Collection<Book> = projector::project(db.scan("books")?, Book::from_record)?;
//! ```

use std::ops::Deref;

use serde::Serialize;

use crate::thing::Thing;

/// Ordered, identifier-unique sequence of things.
///
/// Always sorted ascending by [`Thing::id`]. Uniqueness is inherited from
/// the store (one record per key) and is not re-checked here.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Collection<T> {
    items: Vec<T>,
}

impl<T: Thing> Collection<T> {
    /// Sort `items` by id. The sort is stable.
    pub fn from_unordered(mut items: Vec<T>) -> Self {
        items.sort_by(|a, b| a.id().cmp(b.id()));
        Self { items }
    }

    pub fn into_vec(self) -> Vec<T> {
        self.items
    }
}

impl<T> Default for Collection<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T> Deref for Collection<T> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        &self.items
    }
}

impl<T> IntoIterator for Collection<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a Collection<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// Materialize `records` into a [`Collection`], converting each one with
/// `convert`.
///
/// The first failure, either from the sequence itself or from `convert`,
/// aborts the whole projection. No partial result is returned.
pub fn project<T, R, E, I, F, C>(records: I, mut convert: F) -> Result<Collection<T>, E>
where
    T: Thing,
    I: IntoIterator<Item = Result<R, E>>,
    F: FnMut(R) -> Result<T, C>,
    E: From<C>,
{
    let items = records.into_iter().try_fold(Vec::new(), |mut acc, record| {
        acc.push(convert(record?)?);
        Ok::<_, E>(acc)
    })?;

    Ok(Collection::from_unordered(items))
}
