use criterion::{criterion_group, criterion_main, Criterion};
use smartcollege::Config;
use std::hint::black_box;

fn bench_config_creation(c: &mut Criterion) {
    c.bench_function("config_default", |b| b.iter(Config::default));
}

fn bench_config_serialization(c: &mut Criterion) {
    let config = Config::default();

    c.bench_function("config_to_toml", |b| {
        b.iter(|| toml::to_string(black_box(&config)))
    });

    c.bench_function("config_to_toml_pretty", |b| {
        b.iter(|| toml::to_string_pretty(black_box(&config)))
    });

    let toml_str = toml::to_string(&config).unwrap();
    c.bench_function("config_from_toml", |b| {
        b.iter(|| toml::from_str::<Config>(black_box(&toml_str)))
    });
}

fn bench_config_access(c: &mut Criterion) {
    let config = Config::default();

    c.bench_function("config_login_url", |b| {
        b.iter(|| black_box(&config).backend.url(&config.backend.login_path))
    });

    c.bench_function("config_debug_format", |b| {
        b.iter(|| format!("{:?}", black_box(&config)))
    });
}

criterion_group!(
    benches,
    bench_config_creation,
    bench_config_serialization,
    bench_config_access
);
criterion_main!(benches);
