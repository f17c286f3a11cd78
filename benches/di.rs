use criterion::{criterion_group, criterion_main, Criterion, black_box, BenchmarkId};
use ferrous_di_interfaces::*;
use std::sync::Arc;

trait Meter: Send + Sync {
    fn value(&self) -> u64;
}

trait Gauge: Send + Sync {
    fn level(&self) -> u64;
}

struct Sensor {
    val: u64,
}

impl Meter for Sensor {
    fn value(&self) -> u64 {
        self.val
    }
}

impl Gauge for Sensor {
    fn level(&self) -> u64 {
        self.val / 2
    }
}

interfaces!(Sensor => [dyn Meter, dyn Gauge]);

impl Injectable for Sensor {
    fn create(_: &ResolverContext<'_>) -> DiResult<Self> {
        Ok(Sensor { val: 42 })
    }
}

// ===== Micro Benchmarks =====

fn bench_concrete_vs_alias(c: &mut Criterion) {
    let mut group = c.benchmark_group("concrete_vs_alias");

    let mut sc = ServiceCollection::new();
    sc.try_add_singleton_with_interfaces::<Sensor>();
    let sp = sc.build();

    // Prime the singleton
    let _ = sp.get::<Sensor>().unwrap();

    group.bench_function("concrete", |b| {
        b.iter(|| {
            let v = sp.get::<Sensor>().unwrap();
            black_box(v.val);
        })
    });

    group.bench_function("redirect_alias", |b| {
        b.iter(|| {
            let v = sp.get_trait::<dyn Meter>().unwrap();
            black_box(v.value());
        })
    });

    // Baseline: a trait registered directly, no redirect hop
    let mut sc_trait = ServiceCollection::new();
    sc_trait.add_singleton_trait(Arc::new(Sensor { val: 42 }) as Arc<dyn Meter>);
    let sp_trait = sc_trait.build();

    group.bench_function("direct_trait", |b| {
        b.iter(|| {
            let v = sp_trait.get_trait::<dyn Meter>().unwrap();
            black_box(v.value());
        })
    });

    group.finish();
}

fn bench_alias_by_lifetime(c: &mut Criterion) {
    let mut group = c.benchmark_group("alias_by_lifetime");

    for lifetime in [Lifetime::Singleton, Lifetime::Scoped, Lifetime::Transient] {
        let mut sc = ServiceCollection::new();
        sc.try_add_with_interfaces::<Sensor>(lifetime);
        let sp = sc.build();
        let scope = sp.create_scope();

        group.bench_with_input(BenchmarkId::from_parameter(lifetime), &lifetime, |b, _| {
            b.iter(|| {
                let v = scope.get_trait::<dyn Gauge>().unwrap();
                black_box(v.level());
            })
        });
    }

    group.finish();
}

fn bench_registration(c: &mut Criterion) {
    let mut group = c.benchmark_group("registration");

    group.bench_function("generic", |b| {
        b.iter(|| {
            let mut sc = ServiceCollection::new();
            sc.try_add_singleton_with_interfaces::<Sensor>();
            black_box(sc.len());
        })
    });

    let implementation = ImplementationType::of::<Sensor>();
    group.bench_function("runtime", |b| {
        b.iter(|| {
            let mut sc = ServiceCollection::new();
            sc.try_add_singleton_with_interfaces_of(&implementation);
            black_box(sc.len());
        })
    });

    group.bench_function("repeated", |b| {
        let mut sc = ServiceCollection::new();
        sc.try_add_singleton_with_interfaces::<Sensor>();
        b.iter(|| {
            sc.try_add_singleton_with_interfaces::<Sensor>();
            black_box(sc.len());
        })
    });

    group.finish();
}

fn bench_scope_lifecycle(c: &mut Criterion) {
    let mut sc = ServiceCollection::new();
    sc.try_add_scoped_with_interfaces::<Sensor>();
    let sp = sc.build();

    c.bench_function("scope_create_resolve_alias", |b| {
        b.iter(|| {
            let scope = sp.create_scope();
            let meter = scope.get_trait::<dyn Meter>().unwrap();
            let gauge = scope.get_trait::<dyn Gauge>().unwrap();
            black_box((meter.value(), gauge.level()));
        })
    });
}

criterion_group!(
    micro_benches,
    bench_concrete_vs_alias,
    bench_alias_by_lifetime,
    bench_registration,
    bench_scope_lifecycle
);

criterion_main!(micro_benches);
