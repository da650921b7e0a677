/// Tests for MaterialRegistry

use super::*;
use crate::error::Error;
use crate::material::test_support::Fixture;

// ============================================================================
// Tests: Deduplication
// ============================================================================

#[test]
fn test_empty_registry() {
    let registry = MaterialRegistry::new();
    assert!(registry.get("stone").unwrap().is_none());
    assert!(registry.is_empty());
    assert_eq!(registry.live_count(), 0);
}

#[test]
fn test_insert_once_then_share() {
    let fx = Fixture::new();
    let registry = MaterialRegistry::new();

    let first = registry
        .get_or_try_insert_with("stone", || Material::new(&fx.context, "stone"))
        .unwrap();
    let second = registry
        .get_or_try_insert_with("stone", || panic!("must not build a second instance"))
        .unwrap();

    assert!(Arc::ptr_eq(&first, &second));
    assert!(Arc::ptr_eq(&registry.get("stone").unwrap().unwrap(), &first));
    assert_eq!(registry.live_count(), 1);
}

#[test]
fn test_failed_create_registers_nothing() {
    let registry = MaterialRegistry::new();
    let result = registry.get_or_try_insert_with("bad", || Err(Error::MaterialLoad("corrupt".to_string())));

    assert!(matches!(result, Err(Error::MaterialLoad(_))));
    assert!(registry.is_empty());
}

// ============================================================================
// Tests: Expiry
// ============================================================================

#[test]
fn test_entry_expires_with_last_handle() {
    let fx = Fixture::new();
    let registry = MaterialRegistry::new();
    let material = registry
        .get_or_try_insert_with("wood", || Material::new(&fx.context, "wood"))
        .unwrap();
    let extra = material.clone();

    drop(material);
    assert!(registry.get("wood").unwrap().is_some());

    drop(extra);
    assert_eq!(registry.live_count(), 0);
    assert_eq!(registry.len(), 1);

    // Lookup reaps the dead entry
    assert!(registry.get("wood").unwrap().is_none());
    assert!(registry.is_empty());
}

#[test]
fn test_expired_name_builds_fresh_instance() {
    let fx = Fixture::new();
    let registry = MaterialRegistry::new();

    let first = registry
        .get_or_try_insert_with("metal", || Material::new(&fx.context, "metal"))
        .unwrap();
    first.lock().unwrap().set_roughness(0.9);
    drop(first);

    let second = registry
        .get_or_try_insert_with("metal", || Material::new(&fx.context, "metal"))
        .unwrap();
    assert_eq!(second.lock().unwrap().roughness(), 0.0);
}

#[test]
fn test_reap_counts_removed_entries() {
    let fx = Fixture::new();
    let registry = MaterialRegistry::new();
    let handles: Vec<_> = ["a", "b", "c"]
        .into_iter()
        .map(|name| {
            registry
                .get_or_try_insert_with(name, || Material::new(&fx.context, name))
                .unwrap()
        })
        .collect();
    let mut handles = handles.into_iter();
    let keep = handles.next().unwrap();
    drop(handles);

    assert_eq!(registry.len(), 3);
    assert_eq!(registry.reap(), 2);
    assert_eq!(registry.len(), 1);
    assert_eq!(registry.live_count(), 1);
    drop(keep);
}

#[test]
fn test_insert_reaps_names_never_loaded_again() {
    let fx = Fixture::new();
    let registry = MaterialRegistry::new();
    for name in ["sand", "snow"] {
        registry
            .get_or_try_insert_with(name, || Material::new(&fx.context, name))
            .unwrap();
    }
    assert_eq!(registry.len(), 2);

    let mud = registry
        .get_or_try_insert_with("mud", || Material::new(&fx.context, "mud"))
        .unwrap();
    assert_eq!(registry.len(), 1);
    assert!(Arc::ptr_eq(&registry.get("mud").unwrap().unwrap(), &mud));
}
