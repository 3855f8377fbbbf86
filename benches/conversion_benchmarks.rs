//! Performance benchmarks for conversion registration and resolution.
//!
//! Two workloads:
//! - Registration: building a `CustomConversions` from a converter set
//! - Resolution: write-target lookups, cold (first scan) and warm (cached)
//!
//! ```bash
//! cargo bench -- resolution
//! ```

use criterion::{BatchSize, Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use silo::prelude::*;

struct Payload(Vec<u8>);

fn user_converters() -> Vec<Converter> {
    vec![
        DirectConverter::new(|p: &Payload| p.0.clone()).writing().into(),
        DirectConverter::new(|v: &Vec<u8>| Payload(v.clone())).reading().into(),
        DirectConverter::new(|p: &std::path::PathBuf| p.display().to_string())
            .writing()
            .into(),
        DirectConverter::new(|ip: &std::net::IpAddr| ip.to_string()).writing().into(),
    ]
}

fn build() -> CustomConversions {
    CustomConversions::with_converters(
        StoreConversions::of(SimpleTypeHolder::base(), []),
        user_converters(),
    )
    .unwrap()
}

fn bench_registration(c: &mut Criterion) {
    c.bench_function("registration/with_defaults", |b| {
        b.iter(|| black_box(build()))
    });

    c.bench_function("registration/users_only", |b| {
        b.iter(|| {
            let config = ConverterConfiguration::new(
                StoreConversions::of(SimpleTypeHolder::base(), []),
                user_converters(),
            )
            .without_default_converters();
            black_box(CustomConversions::new(config).unwrap())
        })
    });
}

fn bench_resolution(c: &mut Criterion) {
    c.bench_function("resolution/cold", |b| {
        b.iter_batched(
            build,
            |conversions| black_box(conversions.custom_write_target(TypeKey::of::<Payload>())),
            BatchSize::SmallInput,
        )
    });

    let warm = build();
    warm.custom_write_target(TypeKey::of::<Payload>());
    c.bench_function("resolution/warm", |b| {
        b.iter(|| black_box(warm.custom_write_target(TypeKey::of::<Payload>())))
    });

    let miss = build();
    miss.custom_write_target(TypeKey::of::<u128>());
    c.bench_function("resolution/warm_miss", |b| {
        b.iter(|| black_box(miss.custom_write_target(TypeKey::of::<u128>())))
    });
}

fn bench_service(c: &mut Criterion) {
    let conversions = build();
    let mut service = GenericConversionService::new();
    conversions.register_converters_in(&mut service);

    let payload = Payload(vec![0u8; 64]);
    c.bench_function("service/convert", |b| {
        b.iter(|| black_box(service.convert::<Payload, Vec<u8>>(&payload).unwrap()))
    });
}

criterion_group!(benches, bench_registration, bench_resolution, bench_service);
criterion_main!(benches);
