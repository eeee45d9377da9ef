//! Registry benchmarks

use core::hint::black_box;
use criterion::{criterion_group, criterion_main, Criterion};

use persona_api::PersonaType;
use persona_registry::{PersonaRegistry, PersonaTemplate};

fn populated(count: usize) -> (PersonaRegistry, Vec<u32>) {
    let registry = PersonaRegistry::default();
    let ids = (0..count)
        .map(|_| {
            registry
                .allocate(None, PersonaTemplate::new(None, PersonaType::Managed))
                .unwrap()
                .persist()
        })
        .collect();
    (registry, ids)
}

fn bench_lookup(c: &mut Criterion) {
    let (registry, ids) = populated(256);
    let mut next = ids.iter().cycle();
    c.bench_function("lookup_release", |b| {
        b.iter(|| {
            let id = *next.next().unwrap();
            black_box(registry.lookup(black_box(id)).unwrap().id())
        })
    });
}

fn bench_find(c: &mut Criterion) {
    let (registry, _) = populated(256);
    c.bench_function("find_cap_16", |b| {
        b.iter(|| black_box(registry.find(None, None, black_box(16)).matches))
    });
}

fn bench_allocate_deallocate(c: &mut Criterion) {
    let registry = PersonaRegistry::default();
    c.bench_function("allocate_deallocate", |b| {
        b.iter(|| {
            let id = registry
                .allocate(None, PersonaTemplate::new(None, PersonaType::Guest))
                .unwrap()
                .persist();
            registry.deallocate(black_box(id)).unwrap();
        })
    });
}

criterion_group!(
    registry_benchmarks,
    bench_lookup,
    bench_find,
    bench_allocate_deallocate
);

criterion_main!(registry_benchmarks);
