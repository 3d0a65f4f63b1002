//! Generic record store backing the in-memory repositories.
//!
//! A [`Table`] keeps rows keyed by their integer identifier and hands out
//! identifiers from a monotonically increasing sequence, which makes primary
//! key order and insertion order the same thing. Every call takes the table
//! lock once, so a single store operation is atomic; sequences of calls are
//! not.

use std::{
    collections::BTreeMap,
    sync::{Mutex, MutexGuard, PoisonError},
};

/// Errors raised by record stores.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The backing store could not be reached.
    #[error("record store unavailable: {0}")]
    Unavailable(String),
    /// A write violated a relational constraint.
    #[error("constraint violated: {0}")]
    Constraint(String),
    /// The relational backend reported a failure.
    #[cfg(feature = "with-db")]
    #[error(transparent)]
    Database(#[from] sea_orm::DbErr),
}

impl StoreError {
    pub(crate) fn constraint(message: impl Into<String>) -> Self {
        Self::Constraint(message.into())
    }
}

/// A row that can live in a [`Table`].
pub trait Record: Clone + Send + 'static {
    /// Returns the identifier, `None` until the row is first persisted.
    fn id(&self) -> Option<i32>;

    /// Stamps the identifier assigned by the store.
    fn assign_id(&mut self, id: i32);
}

/// The record store capability: insert, get-by-id, get-all, delete.
pub trait RecordStore<T: Record> {
    /// Inserts the row when its identifier is unset or unknown, replaces it
    /// otherwise, and returns the stored row.
    ///
    /// # Errors
    /// Fails with [`StoreError::Constraint`] when no identifier is left to
    /// assign.
    fn save(&self, record: T) -> Result<T, StoreError>;

    /// Returns the row with the given identifier.
    fn get(&self, id: i32) -> Option<T>;

    /// Returns every row in identifier order.
    fn all(&self) -> Vec<T>;

    /// Removes the row with the given identifier.
    fn delete(&self, id: i32) -> Option<T>;
}

struct Rows<T> {
    sequence: i32,
    rows: BTreeMap<i32, T>,
}

/// In-memory table guarded by a mutex.
pub struct Table<T> {
    inner: Mutex<Rows<T>>,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            inner: Mutex::new(Rows {
                sequence: 0,
                rows: BTreeMap::new(),
            }),
        }
    }
}

impl<T: Record> Table<T> {
    fn guard(&self) -> MutexGuard<'_, Rows<T>> {
        // Rows are only replaced whole, so a poisoned lock still holds valid data.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns the rows matching `predicate`, in identifier order.
    pub fn filter(&self, predicate: impl Fn(&T) -> bool) -> Vec<T> {
        self.guard()
            .rows
            .values()
            .filter(|row| predicate(row))
            .cloned()
            .collect()
    }

    /// Removes every row matching `predicate` and returns how many went away.
    pub fn delete_where(&self, predicate: impl Fn(&T) -> bool) -> usize {
        let mut guard = self.guard();
        let before = guard.rows.len();
        guard.rows.retain(|_, row| !predicate(row));
        before - guard.rows.len()
    }

    /// Number of stored rows.
    pub fn len(&self) -> usize {
        self.guard().rows.len()
    }

    /// Puts a previously read row back under its identifier.
    pub fn restore(&self, id: i32, record: T) {
        let mut guard = self.guard();
        guard.sequence = guard.sequence.max(id);
        guard.rows.insert(id, record);
    }

    /// Whether the table holds no rows.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T: Record> RecordStore<T> for Table<T> {
    fn save(&self, mut record: T) -> Result<T, StoreError> {
        let mut guard = self.guard();
        let id = match record.id() {
            Some(id) => {
                guard.sequence = guard.sequence.max(id);
                id
            }
            None => {
                let id = guard
                    .sequence
                    .checked_add(1)
                    .ok_or_else(|| StoreError::constraint("identifier sequence exhausted"))?;
                guard.sequence = id;
                record.assign_id(id);
                id
            }
        };
        guard.rows.insert(id, record.clone());
        Ok(record)
    }

    fn get(&self, id: i32) -> Option<T> {
        self.guard().rows.get(&id).cloned()
    }

    fn all(&self) -> Vec<T> {
        self.guard().rows.values().cloned().collect()
    }

    fn delete(&self, id: i32) -> Option<T> {
        self.guard().rows.remove(&id)
    }
}

#[cfg(test)]
mod tests {
    use super::{Record, RecordStore, StoreError, Table};

    #[derive(Clone, Debug, PartialEq)]
    struct Note {
        id: Option<i32>,
        body: &'static str,
    }

    impl Record for Note {
        fn id(&self) -> Option<i32> {
            self.id
        }

        fn assign_id(&mut self, id: i32) {
            self.id = Some(id);
        }
    }

    fn note(body: &'static str) -> Note {
        Note { id: None, body }
    }

    #[test]
    fn save_assigns_sequential_identifiers() {
        let table = Table::default();
        let first = table.save(note("first")).unwrap();
        let second = table.save(note("second")).unwrap();
        assert_eq!(first.id, Some(1));
        assert_eq!(second.id, Some(2));
        assert_eq!(table.all(), vec![first, second]);
    }

    #[test]
    fn save_with_identifier_replaces_row() {
        let table = Table::default();
        let mut stored = table.save(note("draft")).unwrap();
        stored.body = "final";
        table.save(stored.clone()).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.get(1), Some(stored));
    }

    #[test]
    fn explicit_identifier_advances_sequence() {
        let table = Table::default();
        table
            .save(Note {
                id: Some(10),
                body: "imported",
            })
            .unwrap();
        let next = table.save(note("fresh")).unwrap();
        assert_eq!(next.id, Some(11));
    }

    #[test]
    fn exhausted_sequence_is_an_error() {
        let table = Table::default();
        table
            .save(Note {
                id: Some(i32::MAX),
                body: "last",
            })
            .unwrap();
        let err = table.save(note("overflow")).expect_err("no identifier left");
        assert!(matches!(err, StoreError::Constraint(_)));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn restore_puts_row_back() {
        let table = Table::default();
        let stored = table.save(note("kept")).unwrap();
        table.delete(1);
        table.restore(1, stored.clone());
        assert_eq!(table.get(1), Some(stored));
        assert_eq!(table.save(note("next")).unwrap().id, Some(2));
    }

    #[test]
    fn missing_rows_are_absent_not_errors() {
        let table: Table<Note> = Table::default();
        assert!(table.get(42).is_none());
        assert!(table.delete(42).is_none());
        assert!(table.is_empty());
    }

    #[test]
    fn delete_where_removes_matching_rows() {
        let table = Table::default();
        table.save(note("keep")).unwrap();
        table.save(note("drop")).unwrap();
        table.save(note("drop")).unwrap();
        assert_eq!(table.delete_where(|row| row.body == "drop"), 2);
        assert_eq!(table.filter(|_| true).len(), 1);
    }
}
