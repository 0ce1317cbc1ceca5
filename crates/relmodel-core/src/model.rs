//! Record trait for ORM-style struct mapping.
//!
//! The `Record` trait defines the contract for structs that map to database
//! tables and can participate in associations: static table/model metadata,
//! row conversion, and dynamic attribute access by column name (associations
//! write foreign keys through the attribute store, not through typed fields).

use crate::Result;
use crate::error::ValidationError;
use crate::field::FieldInfo;
use crate::row::Row;
use crate::value::Value;

/// Trait for types that map to database tables.
pub trait Record: Sized + Send + Sync {
    /// The name of the database table.
    const TABLE_NAME: &'static str;

    /// The model name used as a polymorphic type discriminator value
    /// (e.g. `"User"` for rows whose owner type column stores the class).
    const MODEL_NAME: &'static str;

    /// The primary key column name(s).
    const PRIMARY_KEY: &'static [&'static str];

    /// Get field metadata for all columns.
    fn fields() -> &'static [FieldInfo];

    /// Convert this record instance to a row of values.
    fn to_row(&self) -> Vec<(&'static str, Value)>;

    /// Construct a record instance from a stored row.
    #[allow(clippy::result_large_err)]
    fn from_row(row: &Row) -> Result<Self>;

    /// Get the value of the primary key field(s).
    fn primary_key_value(&self) -> Vec<Value>;

    /// Check if this is a new record (primary key is None/default).
    fn is_new(&self) -> bool;

    /// Read an attribute by column name.
    fn get_value(&self, column: &str) -> Option<Value>;

    /// Write an attribute by column name.
    ///
    /// Errors when the column does not exist on this record.
    #[allow(clippy::result_large_err)]
    fn set_value(&mut self, column: &str, value: Value) -> Result<()>;

    /// Validate this record against its field constraints.
    ///
    /// The default implementation checks the `FieldInfo` constraints
    /// (required, length, pattern) over `to_row` output. Records can
    /// override to add cross-field checks.
    fn validate(&self) -> std::result::Result<(), ValidationError> {
        crate::validate::validate_fields(&self.to_row(), Self::fields()).into_result()
    }
}

/// Marker trait for records that support automatic ID generation.
pub trait AutoIncrement: Record {
    /// Set the auto-generated ID after insert.
    fn set_id(&mut self, id: i64);
}

/// Lifecycle event hooks for record instances.
///
/// Records receive callbacks around insert, update, and delete. These give
/// `destroy` its semantics: a destroy runs the delete hooks, a bare row
/// delete does not. All methods default to no-ops.
pub trait RecordEvents: Record {
    /// Called before a new instance is inserted into the store.
    #[allow(clippy::result_large_err)]
    fn before_insert(&mut self) -> Result<()> {
        Ok(())
    }

    /// Called after an instance has been successfully inserted.
    #[allow(clippy::result_large_err)]
    fn after_insert(&mut self) -> Result<()> {
        Ok(())
    }

    /// Called before an existing instance is updated in the store.
    #[allow(clippy::result_large_err)]
    fn before_update(&mut self) -> Result<()> {
        Ok(())
    }

    /// Called after an instance has been successfully updated.
    #[allow(clippy::result_large_err)]
    fn after_update(&mut self) -> Result<()> {
        Ok(())
    }

    /// Called before an instance is destroyed.
    ///
    /// Return an error to abort the destroy.
    #[allow(clippy::result_large_err)]
    fn before_delete(&mut self) -> Result<()> {
        Ok(())
    }

    /// Called after an instance has been successfully destroyed.
    #[allow(clippy::result_large_err)]
    fn after_delete(&mut self) -> Result<()> {
        Ok(())
    }
}
