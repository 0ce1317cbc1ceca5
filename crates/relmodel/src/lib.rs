//! relmodel - single-record associations for Rust models.
//!
//! relmodel implements the has-one side of an ORM's association subsystem:
//! given an owning record, it lazily resolves, caches, mutates, and
//! persists the one related record whose foreign key points back at the
//! owner, enforcing dependency semantics (nullify / delete / destroy) when
//! the association is replaced.
//!
//! # Quick Start
//!
//! ```ignore
//! use relmodel::prelude::*;
//!
//! // `User` and `Profile` implement `Record`; `Profile` additionally
//! // implements `HasOneTarget<User>`.
//! let reflection = HasOneReflection::new("profile", "profiles", "Profile", "user_id")
//!     .dependent(DependentPolicy::Destroy)
//!     .inverse_of("user");
//!
//! let mut store = MemoryStore::<Profile>::new();
//! let mut profile: HasOneAssociation<'_, User, Profile> =
//!     HasOneAssociation::new(&user, reflection);
//!
//! // Lazily resolve and cache the target.
//! let current = profile.load_target(&mut store)?;
//!
//! // Replace it; the displaced record is destroyed per the policy.
//! let outcome = profile.replace(&mut store, Some(new_profile), false)?;
//! assert!(outcome.is_installed());
//!
//! // Or create a fresh one through the association.
//! let attrs = AttributeSet::new().with("bio", "hello");
//! let created = profile.create(&mut store, attrs, true)?;
//! ```
//!
//! # Design
//!
//! - **Explicit state**: the proxy cache is a plain struct (`target`,
//!   `loaded`), owned by exactly one association instance per
//!   (owner, reflection) pair.
//! - **Structured scoping**: find/create constraints are typed predicates
//!   and attribute sets, pushed around each operation with RAII guards.
//! - **Tagged outcomes**: `replace` reports save failure as a value
//!   (`ReplaceOutcome::SaveFailed`), never as a sentinel.
//! - **Synchronous**: every store call blocks; there is no background
//!   work and no retry logic.

pub mod attrs;
pub mod has_one;
pub mod memory;
pub mod reflection;
pub mod scope;
pub mod store;

pub use attrs::AttributeSet;
pub use has_one::{HasOneAssociation, HasOneTarget, ReplaceOutcome};
pub use memory::{MemoryStore, StoreOp};
pub use reflection::{Conditions, DependentPolicy, HasOneReflection};
pub use scope::{ScopeGuard, ScopeStack};
pub use store::{SaveStatus, Store, delete, destroy, save};

// Re-export the core and query layers at the crate root.
pub use relmodel_core::{
    AutoIncrement, Error, FieldInfo, Record, RecordEvents, Result, Row, SqlType, ValidationError,
    Value,
};
pub use relmodel_query::{Dialect, Expr, OrderBy, SelectOne};

/// Commonly used types, importable in one line.
pub mod prelude {
    pub use crate::attrs::AttributeSet;
    pub use crate::has_one::{HasOneAssociation, HasOneTarget, ReplaceOutcome};
    pub use crate::memory::MemoryStore;
    pub use crate::reflection::{Conditions, DependentPolicy, HasOneReflection};
    pub use crate::store::{SaveStatus, Store};
    pub use relmodel_core::{
        AutoIncrement, Error, FieldInfo, Record, RecordEvents, Result, Row, SqlType, Value,
    };
    pub use relmodel_query::{Expr, OrderBy, SelectOne};
}
