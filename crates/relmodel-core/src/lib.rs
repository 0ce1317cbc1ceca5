//! Core types and traits for relmodel.
//!
//! This crate provides the foundational abstractions the association layer
//! builds on:
//!
//! - `Record` trait for ORM-style struct mapping with dynamic attribute access
//! - `RecordEvents` lifecycle hooks (destroy vs. delete semantics)
//! - `FieldInfo` column metadata with validation constraints
//! - `Value`/`Row` dynamic value types
//! - The `Error`/`Result` taxonomy shared across the workspace

pub mod error;
pub mod field;
pub mod model;
pub mod row;
pub mod types;
pub mod validate;
pub mod value;

pub use error::{
    Error, FieldValidationError, MismatchError, Result, SchemaError, SchemaErrorKind, StoreError,
    StoreErrorKind, TypeError, ValidationError, ValidationErrorKind,
};
pub use field::FieldInfo;
pub use model::{AutoIncrement, Record, RecordEvents};
pub use row::{ColumnInfo, Row};
pub use types::SqlType;
pub use validate::validate_fields;
pub use value::Value;
