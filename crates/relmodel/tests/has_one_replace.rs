//! Replacement semantics: dependency policies, disassociation, type
//! checks, and the save decision table.

mod common;

use common::*;
use relmodel::prelude::*;
use relmodel::{Error, StoreOp};

#[test]
fn replace_installs_and_persists_the_new_target() {
    let mut store = MemoryStore::new();
    let owner = User::persisted(1);
    let mut assoc: HasOneAssociation<'_, User, Profile> =
        HasOneAssociation::new(&owner, profile_reflection());

    let outcome = assoc
        .replace(&mut store, Some(Profile::fresh("incoming")), false)
        .unwrap();
    assert!(outcome.is_installed());

    let installed = assoc.target().unwrap().clone();
    assert!(!installed.is_new());
    assert_eq!(installed.user_id, Some(1));

    // A freshly loaded proxy resolves the same record.
    let mut fresh: HasOneAssociation<'_, User, Profile> =
        HasOneAssociation::new(&owner, profile_reflection());
    let found = fresh.load_target(&mut store).unwrap().cloned().unwrap();
    assert_eq!(found.primary_key_value(), installed.primary_key_value());
}

#[test]
fn replace_with_none_clears_and_disassociates() {
    let mut store = MemoryStore::new();
    let old = seed_profile(&mut store, Some(1), "old");

    let owner = User::persisted(1);
    let mut assoc: HasOneAssociation<'_, User, Profile> =
        HasOneAssociation::new(&owner, profile_reflection());

    let outcome = assoc.replace(&mut store, None, false).unwrap();
    assert!(outcome.is_cleared());
    assert!(assoc.is_loaded());
    assert!(assoc.target().is_none());

    // The old record is still there, but no longer references the owner.
    let released = profile_by_id(&mut store, old.id.unwrap()).unwrap();
    assert_eq!(released.user_id, None);
}

#[test]
fn type_mismatch_aborts_before_any_mutation() {
    let mut store = MemoryStore::new();
    let old = seed_profile(&mut store, Some(1), "kept");

    let owner = User::persisted(1);
    // A reflection wired against a different target class.
    let miswired = HasOneReflection::new("avatar", "avatars", "Avatar", "user_id");
    let mut assoc: HasOneAssociation<'_, User, Profile> =
        HasOneAssociation::new(&owner, miswired);
    assoc.load_target(&mut store).unwrap();
    let ops_before = store.ops().len();

    let err = assoc
        .replace(&mut store, Some(Profile::fresh("rejected")), false)
        .unwrap_err();
    assert!(matches!(err, Error::TypeMismatch(_)));

    // Previous target and its foreign key are untouched.
    assert_eq!(assoc.target().cloned().unwrap(), old);
    assert_eq!(store.ops().len(), ops_before);
    assert_eq!(
        profile_by_id(&mut store, old.id.unwrap()).unwrap().user_id,
        Some(1)
    );
}

#[test]
fn destroy_policy_destroys_the_old_target_exactly_once() {
    reset_destroy_hooks();
    let mut store = MemoryStore::new();
    let old = seed_profile(&mut store, Some(1), "doomed");

    let owner = User::persisted(1);
    let reflection = profile_reflection().dependent(DependentPolicy::Destroy);
    let mut assoc: HasOneAssociation<'_, User, Profile> =
        HasOneAssociation::new(&owner, reflection);

    let outcome = assoc
        .replace(&mut store, Some(Profile::fresh("successor")), false)
        .unwrap();
    assert!(outcome.is_installed());

    assert_eq!(store.delete_count(), 1);
    assert_eq!(destroy_hook_count(), 1);
    assert!(profile_by_id(&mut store, old.id.unwrap()).is_none());
    assert_eq!(assoc.target().unwrap().user_id, Some(1));
}

#[test]
fn nullify_policy_clears_and_saves_instead_of_destroying() {
    reset_destroy_hooks();
    let mut store = MemoryStore::new();
    let old = seed_profile(&mut store, Some(1), "released");

    let owner = User::persisted(1);
    let reflection = profile_reflection().dependent(DependentPolicy::Nullify);
    let mut assoc: HasOneAssociation<'_, User, Profile> =
        HasOneAssociation::new(&owner, reflection);

    assoc
        .replace(&mut store, Some(Profile::fresh("successor")), false)
        .unwrap();

    assert_eq!(store.delete_count(), 0);
    assert_eq!(destroy_hook_count(), 0);
    let released = profile_by_id(&mut store, old.id.unwrap()).unwrap();
    assert_eq!(released.user_id, None);
}

#[test]
fn delete_policy_scenario_with_unsaved_replacement() {
    reset_destroy_hooks();
    let mut store = MemoryStore::new();
    let old = seed_profile(&mut store, Some(7), "previous");

    let owner = User::persisted(7);
    let reflection = profile_reflection().dependent(DependentPolicy::Delete);
    let mut assoc: HasOneAssociation<'_, User, Profile> =
        HasOneAssociation::new(&owner, reflection);

    let outcome = assoc
        .replace(&mut store, Some(Profile::fresh("next")), false)
        .unwrap();
    assert!(outcome.is_installed());

    // Old row deleted without hooks; new target saved and pointing at 7.
    assert_eq!(store.delete_count(), 1);
    assert_eq!(destroy_hook_count(), 0);
    assert!(profile_by_id(&mut store, old.id.unwrap()).is_none());
    let installed = assoc.target().unwrap();
    assert_eq!(installed.user_id, Some(7));
    assert!(!installed.is_new());
}

#[test]
fn replacing_with_the_same_target_is_a_no_op_on_the_old_one() {
    reset_destroy_hooks();
    let mut store = MemoryStore::new();
    let current = seed_profile(&mut store, Some(1), "stable");

    let owner = User::persisted(1);
    let reflection = profile_reflection().dependent(DependentPolicy::Destroy);
    let mut assoc: HasOneAssociation<'_, User, Profile> =
        HasOneAssociation::new(&owner, reflection);

    for _ in 0..2 {
        let outcome = assoc
            .replace(&mut store, Some(current.clone()), false)
            .unwrap();
        assert!(outcome.is_installed());
    }

    assert_eq!(store.delete_count(), 0);
    assert_eq!(destroy_hook_count(), 0);
    let kept = profile_by_id(&mut store, current.id.unwrap()).unwrap();
    assert_eq!(kept.user_id, Some(1));
}

#[test]
fn save_failure_is_reported_as_a_value() {
    let mut store = MemoryStore::new();
    let owner = User::persisted(1);
    let mut assoc: HasOneAssociation<'_, User, Profile> =
        HasOneAssociation::new(&owner, profile_reflection());

    // One-character nickname fails the length constraint.
    let outcome = assoc
        .replace(&mut store, Some(Profile::fresh("x")), false)
        .unwrap();
    let errors = outcome.save_errors().expect("expected failed save");
    assert_eq!(errors.errors[0].field, "nickname");

    // The invalid record is cached but was never written.
    assert!(assoc.target().unwrap().is_new());
    assert!(store.is_empty());
}

#[test]
fn dont_save_suppresses_policy_and_save() {
    reset_destroy_hooks();
    let mut store = MemoryStore::new();
    let old = seed_profile(&mut store, Some(1), "spared");

    let owner = User::persisted(1);
    let reflection = profile_reflection().dependent(DependentPolicy::Destroy);
    let mut assoc: HasOneAssociation<'_, User, Profile> =
        HasOneAssociation::new(&owner, reflection);

    let outcome = assoc
        .replace(&mut store, Some(Profile::fresh("unsaved")), true)
        .unwrap();
    assert!(outcome.is_installed());

    // The policy did not run; the old target was only disassociated.
    assert_eq!(destroy_hook_count(), 0);
    assert_eq!(store.delete_count(), 0);
    assert_eq!(
        profile_by_id(&mut store, old.id.unwrap()).unwrap().user_id,
        None
    );

    // And the incoming record was not saved.
    assert!(assoc.target().unwrap().is_new());
}

#[test]
fn unsaved_owner_installs_without_keys_or_saves() {
    let mut store = MemoryStore::<Profile>::new();
    let owner = User::fresh();
    let mut assoc: HasOneAssociation<'_, User, Profile> =
        HasOneAssociation::new(&owner, profile_reflection());

    let outcome = assoc
        .replace(&mut store, Some(Profile::fresh("floating")), false)
        .unwrap();
    assert!(outcome.is_installed());

    let cached = assoc.target().unwrap();
    assert!(cached.is_new());
    assert_eq!(cached.user_id, None);
    assert!(store.is_empty());
}

#[test]
fn old_target_disassociation_journals_an_update() {
    let mut store = MemoryStore::new();
    let old = seed_profile(&mut store, Some(1), "old");

    let owner = User::persisted(1);
    let mut assoc: HasOneAssociation<'_, User, Profile> =
        HasOneAssociation::new(&owner, profile_reflection());
    assoc.replace(&mut store, None, false).unwrap();

    assert!(
        store
            .ops()
            .iter()
            .any(|op| *op == StoreOp::Update(vec![Value::BigInt(old.id.unwrap())]))
    );
}
