//! In-process backing store.
//!
//! `MemoryStore` keeps rows in insertion order and evaluates composed
//! queries directly against stored values. It backs the test suites and
//! doubles as a reference implementation of the [`Store`] contract:
//! auto-increment key assignment on insert, first-match semantics under
//! the query's ordering, and an operation journal callers can inspect.

use crate::store::Store;
use relmodel_core::{AutoIncrement, Record, Result, Row, StoreError, StoreErrorKind, Value};
use relmodel_query::SelectOne;
use std::marker::PhantomData;

/// A row-level write recorded by the store.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreOp {
    /// Row inserted with the given primary key.
    Insert(Vec<Value>),
    /// Row updated in place.
    Update(Vec<Value>),
    /// Row deleted.
    Delete(Vec<Value>),
}

/// Vec-backed store for records of type `T`.
#[derive(Debug)]
pub struct MemoryStore<T> {
    rows: Vec<Row>,
    ops: Vec<StoreOp>,
    _marker: PhantomData<T>,
}

impl<T: Record> MemoryStore<T> {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            rows: Vec::new(),
            ops: Vec::new(),
            _marker: PhantomData,
        }
    }

    /// Number of stored rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Check if the store holds no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The journal of row-level writes, in order.
    pub fn ops(&self) -> &[StoreOp] {
        &self.ops
    }

    /// Count journal entries that are deletes.
    pub fn delete_count(&self) -> usize {
        self.ops
            .iter()
            .filter(|op| matches!(op, StoreOp::Delete(_)))
            .count()
    }

    fn primary_key_of_row(row: &Row) -> Vec<Value> {
        T::PRIMARY_KEY
            .iter()
            .map(|column| row.get_by_name(column).cloned().unwrap_or(Value::Null))
            .collect()
    }

    fn position_of(&self, key: &[Value]) -> Option<usize> {
        self.rows
            .iter()
            .position(|row| Self::primary_key_of_row(row) == key)
    }

    fn next_id(&self) -> i64 {
        let id_column = T::PRIMARY_KEY.first().copied().unwrap_or("id");
        self.rows
            .iter()
            .filter_map(|row| row.get_by_name(id_column).and_then(Value::as_i64))
            .max()
            .unwrap_or(0)
            + 1
    }
}

impl<T: Record> Default for MemoryStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Record + AutoIncrement> Store<T> for MemoryStore<T> {
    fn select_first(&mut self, query: &SelectOne<T>) -> Result<Option<T>> {
        let mut matching: Vec<&Row> = self
            .rows
            .iter()
            .filter(|row| {
                let pairs: Vec<(&str, Value)> =
                    row.iter().map(|(name, value)| (name, value.clone())).collect();
                query.matches(&pairs)
            })
            .collect();

        for order in query.order_clauses().iter().rev() {
            matching.sort_by(|a, b| {
                let pa: Vec<(&str, Value)> =
                    a.iter().map(|(name, value)| (name, value.clone())).collect();
                let pb: Vec<(&str, Value)> =
                    b.iter().map(|(name, value)| (name, value.clone())).collect();
                order.compare(&pa, &pb)
            });
        }

        tracing::trace!(
            table = T::TABLE_NAME,
            candidates = matching.len(),
            "resolved single-record query"
        );

        match matching.first() {
            Some(row) => Ok(Some(T::from_row(row)?)),
            None => Ok(None),
        }
    }

    fn insert(&mut self, record: &mut T) -> Result<()> {
        if record.is_new() {
            record.set_id(self.next_id());
        }
        let row = Row::from_pairs(record.to_row());
        let key = Self::primary_key_of_row(&row);
        self.rows.push(row);
        self.ops.push(StoreOp::Insert(key));
        Ok(())
    }

    fn update(&mut self, record: &T) -> Result<()> {
        let key = record.primary_key_value();
        match self.position_of(&key) {
            Some(index) => {
                self.rows[index] = Row::from_pairs(record.to_row());
                self.ops.push(StoreOp::Update(key));
                Ok(())
            }
            None => Err(StoreError {
                kind: StoreErrorKind::NotFound,
                message: format!("no row with key {key:?} in '{}'", T::TABLE_NAME),
                source: None,
            }
            .into()),
        }
    }

    fn delete_row(&mut self, record: &T) -> Result<()> {
        let key = record.primary_key_value();
        match self.position_of(&key) {
            Some(index) => {
                self.rows.remove(index);
                self.ops.push(StoreOp::Delete(key));
                Ok(())
            }
            None => Err(StoreError {
                kind: StoreErrorKind::NotFound,
                message: format!("no row with key {key:?} in '{}'", T::TABLE_NAME),
                source: None,
            }
            .into()),
        }
    }
}
