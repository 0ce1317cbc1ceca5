//! Association reflection metadata.
//!
//! A reflection describes one has-one association: which table holds the
//! target, how its rows point back at the owner, what extra scoping applies,
//! and what happens to a displaced target. Reflections are immutable once
//! built and shared by every proxy instance for that association.

use crate::attrs::AttributeSet;
use relmodel_core::{MismatchError, Record, Result};
use relmodel_query::Expr;
use relmodel_query::clause::OrderBy;

/// Action taken on the previously associated record when the association
/// is replaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DependentPolicy {
    /// Delete the old target row directly (no lifecycle hooks).
    Delete,
    /// Destroy the old target (runs its delete hooks).
    Destroy,
    /// Clear the old target's foreign key and save it.
    Nullify,
}

/// Static conditions configured on an association.
///
/// The two shapes behave differently on create: an attribute map is both a
/// query filter and a set of default attributes for new records, while a
/// predicate is a filter only and never seeds attributes.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Conditions {
    /// No extra conditions.
    #[default]
    None,
    /// Flat `column = value` pairs; filter and create defaults.
    Attrs(AttributeSet),
    /// Arbitrary predicate; filter only.
    Predicate(Expr),
}

/// Immutable descriptor for a has-one association.
#[derive(Debug, Clone)]
pub struct HasOneReflection {
    /// Name of the association (e.g. `"profile"`).
    pub name: &'static str,

    /// The target table name.
    pub related_table: &'static str,

    /// The target model name (checked against the record type at replace).
    pub related_model: &'static str,

    /// Foreign key column on the target table pointing at the owner.
    pub foreign_key: &'static str,

    /// Owner column used as the association key instead of the primary key.
    pub primary_key: Option<&'static str>,

    /// Type discriminator column for polymorphic owners. When set, target
    /// rows are matched (and stamped) with the owner's model name as well
    /// as its id.
    pub polymorphic_type_column: Option<&'static str>,

    /// Extra static conditions.
    pub conditions: Conditions,

    /// Default ordering for target resolution.
    pub order: Vec<OrderBy>,

    /// Projected columns (empty = all).
    pub select: Vec<&'static str>,

    /// Associations the backend may preload with the target.
    pub include: Vec<&'static str>,

    /// Whether loaded targets are read-only.
    pub readonly: bool,

    /// What happens to a displaced target.
    pub dependent: Option<DependentPolicy>,

    /// Name of the reciprocal association on the target, when declared.
    pub inverse_of: Option<&'static str>,
}

impl HasOneReflection {
    /// Create a reflection with required fields.
    #[must_use]
    pub fn new(
        name: &'static str,
        related_table: &'static str,
        related_model: &'static str,
        foreign_key: &'static str,
    ) -> Self {
        Self {
            name,
            related_table,
            related_model,
            foreign_key,
            primary_key: None,
            polymorphic_type_column: None,
            conditions: Conditions::None,
            order: Vec::new(),
            select: Vec::new(),
            include: Vec::new(),
            readonly: false,
            dependent: None,
            inverse_of: None,
        }
    }

    /// Use an owner column other than the primary key as the association key.
    #[must_use]
    pub fn primary_key(mut self, column: &'static str) -> Self {
        self.primary_key = Some(column);
        self
    }

    /// Make the association polymorphic with the given discriminator column.
    #[must_use]
    pub fn polymorphic(mut self, type_column: &'static str) -> Self {
        self.polymorphic_type_column = Some(type_column);
        self
    }

    /// Set static conditions.
    #[must_use]
    pub fn conditions(mut self, conditions: Conditions) -> Self {
        self.conditions = conditions;
        self
    }

    /// Add an ORDER BY clause for target resolution.
    #[must_use]
    pub fn order(mut self, order: OrderBy) -> Self {
        self.order.push(order);
        self
    }

    /// Project specific columns.
    #[must_use]
    pub fn select(mut self, columns: &[&'static str]) -> Self {
        self.select = columns.to_vec();
        self
    }

    /// Name associations the backend may preload.
    #[must_use]
    pub fn include(mut self, names: &[&'static str]) -> Self {
        self.include = names.to_vec();
        self
    }

    /// Mark loaded targets read-only.
    #[must_use]
    pub fn readonly(mut self, value: bool) -> Self {
        self.readonly = value;
        self
    }

    /// Set the dependent policy.
    #[must_use]
    pub fn dependent(mut self, policy: DependentPolicy) -> Self {
        self.dependent = Some(policy);
        self
    }

    /// Declare the reciprocal association on the target.
    #[must_use]
    pub fn inverse_of(mut self, name: &'static str) -> Self {
        self.inverse_of = Some(name);
        self
    }

    /// Whether a dependent policy is configured.
    #[must_use]
    pub fn is_dependent(&self) -> bool {
        self.dependent.is_some()
    }

    /// Whether this reflection is polymorphic.
    #[must_use]
    pub fn is_polymorphic(&self) -> bool {
        self.polymorphic_type_column.is_some()
    }

    /// Verify that the record type `T` is the class this reflection targets.
    ///
    /// Fails with a type-mismatch error when the reflection was wired
    /// against a different table or model.
    #[allow(clippy::result_large_err)]
    pub fn verify_target_class<T: Record>(&self) -> Result<()> {
        if self.related_table == T::TABLE_NAME && self.related_model == T::MODEL_NAME {
            Ok(())
        } else {
            Err(MismatchError {
                expected: self.related_model,
                actual: T::MODEL_NAME,
            }
            .into())
        }
    }
}
