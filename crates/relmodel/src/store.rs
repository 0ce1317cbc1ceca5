//! Persistence capability consumed by associations.
//!
//! Associations never talk SQL; they hand a composed [`SelectOne`] to a
//! store and call back into it for row-level writes. All calls are
//! blocking and synchronous. The free functions layer record semantics
//! (validation, lifecycle hooks, insert-vs-update dispatch) over the raw
//! row operations.

use relmodel_core::{Record, RecordEvents, Result, ValidationError};
use relmodel_query::SelectOne;

/// A blocking backing store for records of type `T`.
pub trait Store<T: Record> {
    /// Resolve the first record matching the query, or none.
    #[allow(clippy::result_large_err)]
    fn select_first(&mut self, query: &SelectOne<T>) -> Result<Option<T>>;

    /// Insert a new row. Implementations assign generated keys on `record`.
    #[allow(clippy::result_large_err)]
    fn insert(&mut self, record: &mut T) -> Result<()>;

    /// Update the row identified by the record's primary key.
    #[allow(clippy::result_large_err)]
    fn update(&mut self, record: &T) -> Result<()>;

    /// Delete the row identified by the record's primary key.
    ///
    /// This is the raw row operation; lifecycle hooks are layered on by
    /// [`destroy`].
    #[allow(clippy::result_large_err)]
    fn delete_row(&mut self, record: &T) -> Result<()>;
}

/// Outcome of a [`save`] attempt.
#[derive(Debug)]
pub enum SaveStatus {
    /// The record was persisted.
    Saved,
    /// Validation failed; nothing was written.
    Invalid(ValidationError),
}

impl SaveStatus {
    /// Whether the save went through.
    #[must_use]
    pub fn is_saved(&self) -> bool {
        matches!(self, SaveStatus::Saved)
    }
}

/// Validate and persist a record: insert when new, update otherwise.
///
/// Validation failure is reported through [`SaveStatus::Invalid`], not an
/// error; store failures propagate as errors.
#[allow(clippy::result_large_err)]
pub fn save<T, S>(store: &mut S, record: &mut T) -> Result<SaveStatus>
where
    T: Record + RecordEvents,
    S: Store<T> + ?Sized,
{
    if let Err(errors) = record.validate() {
        tracing::debug!(
            table = T::TABLE_NAME,
            errors = errors.errors.len(),
            "save rejected by validation"
        );
        return Ok(SaveStatus::Invalid(errors));
    }

    if record.is_new() {
        record.before_insert()?;
        store.insert(record)?;
        record.after_insert()?;
    } else {
        record.before_update()?;
        store.update(record)?;
        record.after_update()?;
    }
    Ok(SaveStatus::Saved)
}

/// Destroy a record: run its delete hooks around the row delete.
#[allow(clippy::result_large_err)]
pub fn destroy<T, S>(store: &mut S, record: &mut T) -> Result<()>
where
    T: Record + RecordEvents,
    S: Store<T> + ?Sized,
{
    record.before_delete()?;
    store.delete_row(record)?;
    record.after_delete()
}

/// Delete a record's row directly, without lifecycle hooks.
#[allow(clippy::result_large_err)]
pub fn delete<T, S>(store: &mut S, record: &T) -> Result<()>
where
    T: Record,
    S: Store<T> + ?Sized,
{
    store.delete_row(record)
}
