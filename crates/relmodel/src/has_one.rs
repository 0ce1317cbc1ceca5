//! Single-record ("has one") associations.
//!
//! A `HasOneAssociation` mediates lazy access to the one record whose
//! foreign key points back at an owning record: it resolves the target
//! from the store on first access, caches it, and replaces it under the
//! reflection's dependency policy. The cache is a small state machine
//! (unloaded, loaded-empty, loaded-present), and `replace` is the only
//! transition that produces durable side effects on the *previous*
//! occupant.

use crate::attrs::AttributeSet;
use crate::reflection::{Conditions, DependentPolicy, HasOneReflection};
use crate::scope::ScopeStack;
use crate::store::{SaveStatus, Store, delete, destroy, save};
use relmodel_core::{Error, Record, RecordEvents, Result, SchemaError, ValidationError, Value};
use relmodel_query::{Expr, SelectOne};

/// Capability a record type needs to serve as a has-one target.
///
/// Construction from an attribute set stands in for the per-association
/// constructors a reflective ORM would dispatch to at runtime; the inverse
/// hook is only invoked when the reflection declares `inverse_of`.
pub trait HasOneTarget<O: Record>: Record + RecordEvents + Clone + PartialEq {
    /// Build an unsaved record seeded from the given attributes.
    #[allow(clippy::result_large_err)]
    fn from_attributes(attrs: &AttributeSet) -> Result<Self>;

    /// Point this record's reciprocal association back at the owner.
    fn set_inverse(&mut self, _owner: &O) {}
}

/// Which constructor a `new_record` call dispatches to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NewRecordKind {
    Build,
    Create,
    CreateStrict,
}

/// Result of a [`HasOneAssociation::replace`] call.
#[derive(Debug)]
pub enum ReplaceOutcome {
    /// The new target is installed (and saved, when a save was due).
    Installed,
    /// The association was cleared (incoming record was `None`).
    Cleared,
    /// The new target is installed in the cache but its save failed
    /// validation; nothing was written for it.
    SaveFailed(ValidationError),
}

impl ReplaceOutcome {
    /// Whether a target was installed and any due save succeeded.
    #[must_use]
    pub fn is_installed(&self) -> bool {
        matches!(self, ReplaceOutcome::Installed)
    }

    /// Whether the association was cleared.
    #[must_use]
    pub fn is_cleared(&self) -> bool {
        matches!(self, ReplaceOutcome::Cleared)
    }

    /// The validation errors from a failed save, if any.
    #[must_use]
    pub fn save_errors(&self) -> Option<&ValidationError> {
        match self {
            ReplaceOutcome::SaveFailed(errors) => Some(errors),
            _ => None,
        }
    }
}

/// Cached association state.
///
/// `loaded` distinguishes not-yet-queried from queried-and-empty: once it
/// is set, `target` is authoritative (`None` means "no associated record").
#[derive(Debug, Default)]
struct AssociationState<T> {
    target: Option<T>,
    loaded: bool,
}

/// Proxy for one has-one association of one owner instance.
///
/// Exactly one proxy owns the cache for a given (owner, reflection) pair;
/// operations take the backing store explicitly and run synchronously.
#[derive(Debug)]
pub struct HasOneAssociation<'o, O: Record, T: HasOneTarget<O>> {
    owner: &'o O,
    reflection: HasOneReflection,
    state: AssociationState<T>,
    scope: ScopeStack,
}

impl<'o, O: Record, T: HasOneTarget<O>> HasOneAssociation<'o, O, T> {
    /// Create an unloaded association proxy.
    pub fn new(owner: &'o O, reflection: HasOneReflection) -> Self {
        Self {
            owner,
            reflection,
            state: AssociationState {
                target: None,
                loaded: false,
            },
            scope: ScopeStack::new(),
        }
    }

    /// The association's reflection metadata.
    pub fn reflection(&self) -> &HasOneReflection {
        &self.reflection
    }

    /// The cached target, if the association has been loaded.
    pub fn target(&self) -> Option<&T> {
        self.state.target.as_ref()
    }

    /// Whether the association has been queried and cached.
    pub fn is_loaded(&self) -> bool {
        self.state.loaded
    }

    /// Drop the cache back to the unloaded state.
    pub fn reset(&mut self) {
        self.state.target = None;
        self.state.loaded = false;
    }

    /// Force-load the target if it has not been queried yet, then return it.
    #[allow(clippy::result_large_err)]
    pub fn load_target<S: Store<T>>(&mut self, store: &mut S) -> Result<Option<&T>> {
        if !self.state.loaded {
            self.state.target = self.find_target(store)?;
            self.state.loaded = true;
            tracing::debug!(
                association = self.reflection.name,
                table = T::TABLE_NAME,
                found = self.state.target.is_some(),
                "loaded association target"
            );
        }
        Ok(self.state.target.as_ref())
    }

    /// Build an unsaved target record.
    ///
    /// With `replace_existing`, the record displaces any current target via
    /// [`Self::replace`]; otherwise the prior target is left untouched and
    /// the record only receives the owner's key when the owner is persisted.
    #[allow(clippy::result_large_err)]
    pub fn build<S: Store<T>>(
        &mut self,
        store: &mut S,
        attrs: AttributeSet,
        replace_existing: bool,
    ) -> Result<T> {
        self.new_record(store, NewRecordKind::Build, attrs, replace_existing)
    }

    /// Create and persist a target record.
    ///
    /// A record that fails validation is still returned, unsaved; check its
    /// `is_new()` / `validate()` state to detect the failure.
    #[allow(clippy::result_large_err)]
    pub fn create<S: Store<T>>(
        &mut self,
        store: &mut S,
        attrs: AttributeSet,
        replace_existing: bool,
    ) -> Result<T> {
        self.new_record(store, NewRecordKind::Create, attrs, replace_existing)
    }

    /// Create and persist a target record, erroring when validation fails.
    #[allow(clippy::result_large_err)]
    pub fn create_strict<S: Store<T>>(
        &mut self,
        store: &mut S,
        attrs: AttributeSet,
        replace_existing: bool,
    ) -> Result<T> {
        self.new_record(store, NewRecordKind::CreateStrict, attrs, replace_existing)
    }

    /// Replace the current target with `obj` (or clear it with `None`).
    ///
    /// A displaced persisted target is resolved per the reflection's
    /// dependent policy before the new target is installed; without a
    /// policy, or with `dont_save`, it is disassociated by clearing its
    /// foreign key. The incoming record is checked against the
    /// reflection's target class before anything is mutated.
    #[allow(clippy::result_large_err)]
    pub fn replace<S: Store<T>>(
        &mut self,
        store: &mut S,
        obj: Option<T>,
        dont_save: bool,
    ) -> Result<ReplaceOutcome> {
        self.load_target(store)?;

        if obj.is_some() {
            self.reflection.verify_target_class::<T>()?;
        }

        if let Some(current) = self.state.target.take() {
            let unchanged = obj
                .as_ref()
                .is_some_and(|incoming| Self::records_match(&current, incoming));
            if unchanged {
                self.state.target = Some(current);
            } else {
                self.release_previous_target(store, current, dont_save)?;
            }
        }

        let Some(mut record) = obj else {
            self.state.target = None;
            self.state.loaded = true;
            return Ok(ReplaceOutcome::Cleared);
        };

        self.apply_owner_keys(&mut record)?;
        self.set_inverse_instance(&mut record);

        let should_save = !self.owner.is_new() && !dont_save;
        let outcome = if should_save {
            match save(store, &mut record)? {
                SaveStatus::Saved => ReplaceOutcome::Installed,
                SaveStatus::Invalid(errors) => ReplaceOutcome::SaveFailed(errors),
            }
        } else {
            ReplaceOutcome::Installed
        };

        self.state.target = Some(record);
        self.state.loaded = true;
        Ok(outcome)
    }

    /// Resolve the target from the store under the composed find scope.
    #[allow(clippy::result_large_err)]
    fn find_target<S: Store<T>>(&self, store: &mut S) -> Result<Option<T>> {
        let filter = self.construct_find_scope()?;
        let _guard = self.scope.push_find(filter);
        let query = self.scoped_query();
        let mut found = store.select_first(&query)?;
        if let Some(record) = found.as_mut() {
            self.set_inverse_instance(record);
        }
        Ok(found)
    }

    /// The base equality filter AND polymorphic discriminator AND static
    /// conditions, in that precedence.
    #[allow(clippy::result_large_err)]
    fn construct_find_scope(&self) -> Result<Expr> {
        let table = self.reflection.related_table;
        let mut filter = Expr::tcol(table, self.reflection.foreign_key).eq(self.owner_key()?);

        if let Some(type_column) = self.reflection.polymorphic_type_column {
            filter = filter.and(Expr::tcol(table, type_column).eq(O::MODEL_NAME));
        }

        match &self.reflection.conditions {
            Conditions::None => {}
            Conditions::Attrs(attrs) => {
                for (column, value) in attrs.iter() {
                    filter = filter.and(Expr::tcol(table, column).eq(value.clone()));
                }
            }
            Conditions::Predicate(expr) => {
                filter = filter.and(expr.clone().paren());
            }
        }

        Ok(filter)
    }

    /// Build the single-record query from the active find scope and the
    /// reflection's projection/order/include/readonly options.
    fn scoped_query(&self) -> SelectOne<T> {
        let mut query = SelectOne::new();
        if let Some(filter) = self.scope.current_find() {
            query = query.filter(filter);
        }
        if !self.reflection.select.is_empty() {
            query = query.columns(&self.reflection.select);
        }
        for order in &self.reflection.order {
            query = query.order(order.clone());
        }
        if !self.reflection.include.is_empty() {
            query = query.include(&self.reflection.include);
        }
        query.readonly(self.reflection.readonly)
    }

    /// The owner-side association key: the primary key, or the reflection's
    /// override column.
    #[allow(clippy::result_large_err)]
    fn owner_key(&self) -> Result<Value> {
        match self.reflection.primary_key {
            Some(column) => self.owner.get_value(column).ok_or_else(|| {
                Error::Schema(SchemaError::column_not_found(O::TABLE_NAME, column))
            }),
            None => Ok(self
                .owner
                .primary_key_value()
                .into_iter()
                .next()
                .unwrap_or(Value::Null)),
        }
    }

    /// The attributes a record gains by being created through this
    /// association: the owner key (persisted owners only) and, for
    /// polymorphic reflections, the owner's model name.
    #[allow(clippy::result_large_err)]
    fn owner_key_attributes(&self) -> Result<AttributeSet> {
        let mut attrs = AttributeSet::new();
        if !self.owner.is_new() {
            attrs.set(self.reflection.foreign_key, self.owner_key()?);
        }
        if let Some(type_column) = self.reflection.polymorphic_type_column {
            attrs.set(type_column, O::MODEL_NAME);
        }
        Ok(attrs)
    }

    /// Write the owner key (and discriminator) onto a record.
    #[allow(clippy::result_large_err)]
    fn apply_owner_keys(&self, record: &mut T) -> Result<()> {
        for (column, value) in self.owner_key_attributes()?.iter() {
            record.set_value(column, value.clone())?;
        }
        Ok(())
    }

    fn set_inverse_instance(&self, record: &mut T) {
        if self.reflection.inverse_of.is_some() {
            record.set_inverse(self.owner);
        }
    }

    /// Persisted records are the same target when their keys agree; new
    /// records fall back to full equality.
    fn records_match(a: &T, b: &T) -> bool {
        if !a.is_new() && !b.is_new() {
            a.primary_key_value() == b.primary_key_value()
        } else {
            a == b
        }
    }

    /// Resolve the fate of a displaced target.
    #[allow(clippy::result_large_err)]
    fn release_previous_target<S: Store<T>>(
        &self,
        store: &mut S,
        mut old: T,
        dont_save: bool,
    ) -> Result<()> {
        match self.reflection.dependent {
            Some(policy) if !dont_save => {
                tracing::debug!(
                    association = self.reflection.name,
                    policy = ?policy,
                    persisted = !old.is_new(),
                    "releasing previous association target"
                );
                match policy {
                    DependentPolicy::Delete => {
                        if !old.is_new() {
                            delete(store, &old)?;
                        }
                    }
                    DependentPolicy::Destroy => {
                        if !old.is_new() {
                            destroy(store, &mut old)?;
                        }
                    }
                    DependentPolicy::Nullify => {
                        self.disassociate(store, &mut old)?;
                    }
                }
            }
            _ => {
                // Disassociation happens even without a declared policy.
                self.disassociate(store, &mut old)?;
            }
        }
        Ok(())
    }

    /// Clear the old target's foreign key; persist the change when both
    /// sides are already persisted.
    #[allow(clippy::result_large_err)]
    fn disassociate<S: Store<T>>(&self, store: &mut S, old: &mut T) -> Result<()> {
        old.set_value(self.reflection.foreign_key, Value::Null)?;
        if !self.owner.is_new() && !old.is_new() {
            let _ = save(store, old)?;
        }
        Ok(())
    }

    /// The shared recipe behind `build`/`create`/`create_strict`.
    #[allow(clippy::result_large_err)]
    fn new_record<S: Store<T>>(
        &mut self,
        store: &mut S,
        kind: NewRecordKind,
        attrs: AttributeSet,
        replace_existing: bool,
    ) -> Result<T> {
        // Load the current target first when we plan on replacing it.
        // Otherwise, if it has not been loaded elsewhere, the record we
        // create here would orphan it unseen.
        if replace_existing {
            self.load_target(store)?;
        }

        let guard = self.scope.push_create(self.owner_key_attributes()?);

        let mut merged = attrs;
        if let Conditions::Attrs(conditions) = &self.reflection.conditions {
            merged.merge(conditions);
        }
        if let Some(scope_attrs) = self.scope.current_create() {
            merged.merge(&scope_attrs);
        }

        let mut record = T::from_attributes(&merged)?;
        match kind {
            NewRecordKind::Build => {}
            NewRecordKind::Create => {
                let _status = save(store, &mut record)?;
            }
            NewRecordKind::CreateStrict => {
                if let SaveStatus::Invalid(errors) = save(store, &mut record)? {
                    return Err(errors.into());
                }
            }
        }
        drop(guard);

        tracing::debug!(
            association = self.reflection.name,
            kind = ?kind,
            replace_existing,
            persisted = !record.is_new(),
            "built association record"
        );

        if replace_existing {
            // The caller keeps this record while a copy is installed; wire
            // both the same way.
            self.apply_owner_keys(&mut record)?;
            self.set_inverse_instance(&mut record);
            self.replace(store, Some(record.clone()), true)?;
        } else {
            if !self.owner.is_new() {
                record.set_value(self.reflection.foreign_key, self.owner_key()?)?;
            }
            self.set_inverse_instance(&mut record);
            self.state.target = Some(record.clone());
            self.state.loaded = true;
        }

        Ok(record)
    }
}
