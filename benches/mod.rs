use criterion::{criterion_group, criterion_main};


use intake::register_benchmarks as register_intake_benchmarks;
use publish::register_benchmarks as register_publish_benchmarks;
use serialization::register_benchmarks as register_serialization_benchmarks;

criterion_group!(
    benches,
    register_intake_benchmarks,
    register_publish_benchmarks,
    register_serialization_benchmarks,
);

criterion_main!(benches);
