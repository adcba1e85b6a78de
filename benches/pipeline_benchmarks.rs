use criterion::{black_box, criterion_group, criterion_main, Criterion};
use std::time::Duration;

use newsdesk::cache::{derive_key, NewsCache};
use newsdesk::news::synthetic::synthesize_articles;

fn bench_derive_key(c: &mut Criterion) {
    let small: Vec<String> = vec!["tech".to_string(), "ai".to_string()];
    let large: Vec<String> = (0..50).map(|i| format!("topic-{}", i % 17)).collect();

    c.bench_function("derive_key_2_terms", |b| {
        b.iter(|| derive_key(black_box(&small)))
    });
    c.bench_function("derive_key_50_terms", |b| {
        b.iter(|| derive_key(black_box(&large)))
    });
}

fn bench_cache_round_trip(c: &mut Criterion) {
    let cache = NewsCache::new(Duration::from_secs(300));
    let articles = synthesize_articles(&["tech".to_string(), "ai".to_string()]);
    cache.set("news:ai|tech", articles.clone());

    c.bench_function("cache_get_hit", |b| {
        b.iter(|| cache.get(black_box("news:ai|tech")))
    });
    c.bench_function("cache_set", |b| {
        b.iter(|| cache.set(black_box("news:ai|tech"), articles.clone()))
    });
}

fn bench_synthesis(c: &mut Criterion) {
    let preferences: Vec<String> = vec![
        "sports".to_string(),
        "finance".to_string(),
        "tech".to_string(),
    ];

    c.bench_function("synthesize_3_prefs", |b| {
        b.iter(|| synthesize_articles(black_box(&preferences)))
    });
}

criterion_group!(benches, bench_derive_key, bench_cache_round_trip, bench_synthesis);
criterion_main!(benches);
