//! Persona registry tests

use std::collections::BTreeSet;
use std::sync::Arc;
use std::thread;

use proptest::prelude::*;

use persona_api::{login_from_str, PersonaError, PersonaType, RegistryConfig};
use persona_registry::{PersonaRegistry, PersonaTemplate};

fn template(login: &str) -> PersonaTemplate {
    PersonaTemplate::new(Some(login_from_str(login).unwrap()), PersonaType::Managed)
}

fn anonymous() -> PersonaTemplate {
    PersonaTemplate::new(None, PersonaType::Guest)
}

proptest! {
    #[test]
    fn distinct_ids_get_one_record_each(ids in proptest::collection::btree_set(1u32..10_000, 1..64)) {
        let registry = PersonaRegistry::default();
        for &id in &ids {
            let assigned = registry.allocate(Some(id), anonymous()).unwrap().persist();
            prop_assert_eq!(assigned, id);
        }
        prop_assert_eq!(registry.len(), ids.len());

        for &id in &ids {
            prop_assert_eq!(
                registry.allocate(Some(id), anonymous()).unwrap_err(),
                PersonaError::AlreadyExists
            );
            prop_assert_eq!(registry.lookup(id).unwrap().id(), id);
        }
        prop_assert_eq!(registry.len(), ids.len());
    }

    #[test]
    fn find_reports_true_count(total in 0usize..40, cap in 0usize..50) {
        let registry = PersonaRegistry::default();
        let ids: Vec<u32> = (0..total)
            .map(|_| registry.allocate(None, anonymous()).unwrap().persist())
            .collect();

        let result = registry.find(None, None, cap);
        prop_assert_eq!(result.matches, total);
        prop_assert_eq!(result.personas.len(), cap.min(total));
        let returned: BTreeSet<u32> = result.ids().into_iter().collect();
        let all: BTreeSet<u32> = ids.iter().copied().collect();
        prop_assert!(returned.is_subset(&all));
        drop(result);

        let full = registry.find(None, None, total);
        prop_assert_eq!(full.ids(), ids.clone());
        drop(full);

        for id in ids {
            prop_assert_eq!(registry.lookup(id).unwrap().refcount(), 2);
        }
    }

    #[test]
    fn releases_never_outnumber_acquisitions(extra in 0usize..16) {
        let registry = PersonaRegistry::default();
        let id = registry.allocate(None, anonymous()).unwrap().persist();

        let held: Vec<_> = (0..extra).map(|_| registry.lookup(id).unwrap()).collect();
        prop_assert_eq!(registry.lookup(id).unwrap().refcount() as usize, extra + 2);

        registry.deallocate(id).unwrap();
        prop_assert_eq!(registry.contains(id), extra > 0);
        drop(held);
        prop_assert!(!registry.contains(id));
    }
}

#[test]
fn test_scenario_auto_assign() {
    let registry = PersonaRegistry::default();
    let id = registry.allocate(Some(persona_api::PERSONA_ID_NONE), template("svc1")).unwrap().persist();
    assert_ne!(id, 0);

    let persona = registry.lookup(id).unwrap();
    assert_eq!(persona.login(), Some("svc1"));
    assert_eq!(persona.kind(), PersonaType::Managed);
}

#[test]
fn test_scenario_explicit_id_twice() {
    let registry = PersonaRegistry::default();
    registry.allocate(Some(42), template("first")).unwrap().persist();
    assert_eq!(
        registry.allocate(Some(42), template("second")).unwrap_err(),
        PersonaError::AlreadyExists
    );
    assert_eq!(registry.lookup(42).unwrap().login(), Some("first"));

    registry.deallocate(42).unwrap();
    assert_eq!(registry.lookup(42).unwrap_err(), PersonaError::NotFound);

    registry.allocate(Some(42), template("again")).unwrap().persist();
    assert_eq!(registry.lookup(42).unwrap().login(), Some("again"));
}

#[test]
fn test_find_zero_capacity() {
    let registry = PersonaRegistry::default();
    registry.allocate(None, template("svc1")).unwrap().persist();
    registry.allocate(None, template("svc2")).unwrap().persist();

    let result = registry.find(Some("svc1"), None, 0);
    assert!(result.personas.is_empty());
    assert_eq!(result.matches, 1);
}

#[test]
fn test_concurrent_allocation_assigns_unique_ids() {
    let registry = Arc::new(PersonaRegistry::new(RegistryConfig::default().with_max_personas(1024)));

    let workers: Vec<_> = (0..8)
        .map(|_| {
            let registry = Arc::clone(&registry);
            thread::spawn(move || {
                (0..64)
                    .map(|_| registry.allocate(None, anonymous()).unwrap().persist())
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    let mut seen = BTreeSet::new();
    for worker in workers {
        for id in worker.join().unwrap() {
            assert!(seen.insert(id), "id {} handed out twice", id);
        }
    }
    assert_eq!(seen.len(), 8 * 64);
    assert_eq!(registry.len(), 8 * 64);
}

#[test]
fn test_concurrent_find_and_deallocate() {
    let registry = Arc::new(PersonaRegistry::default());
    let ids: Vec<u32> = (0..32)
        .map(|_| registry.allocate(None, anonymous()).unwrap().persist())
        .collect();

    let finder = {
        let registry = Arc::clone(&registry);
        thread::spawn(move || {
            for _ in 0..200 {
                let result = registry.find(None, None, 8);
                assert!(result.personas.len() <= 8);
                let found = result.ids();
                assert!(found.windows(2).all(|pair| pair[0] < pair[1]));
            }
        })
    };

    for &id in &ids {
        registry.deallocate(id).unwrap();
    }
    finder.join().unwrap();

    assert!(registry.is_empty());
    assert_eq!(registry.find(None, None, 64).matches, 0);
}
