use chrono::{TimeZone, Utc};
use criterion::{criterion_group, criterion_main, Criterion};
use ecotrack_api::services::{ChallengeQuery, PageRequest};
use ecotrack_api::time_utils::{trailing_days, trailing_months};
use std::hint::black_box;

fn full_query() -> ChallengeQuery {
    ChallengeQuery {
        category: Some("Energy Conservation, Waste Reduction,Water Conservation".to_string()),
        start_date: Some("2024-01-01".to_string()),
        end_date: Some("2024-12-31T23:59:59Z".to_string()),
        min_participants: Some("5".to_string()),
        max_participants: Some("500".to_string()),
        search: Some("plastic (free) week?".to_string()),
        sort: Some("participants_desc".to_string()),
        page: Some("3".to_string()),
        limit: Some("24".to_string()),
    }
}

fn benchmark_filter_composition(c: &mut Criterion) {
    let empty = ChallengeQuery::default();
    let full = full_query();

    let mut group = c.benchmark_group("challenge_filter");

    group.bench_function("empty_query", |b| b.iter(|| black_box(&empty).to_filter()));

    group.bench_function("all_parameters", |b| {
        b.iter(|| black_box(&full).to_filter())
    });

    group.bench_function("page_request", |b| {
        b.iter(|| PageRequest::parse(black_box(Some("3")), black_box(Some("24")), 12))
    });

    group.finish();
}

fn benchmark_buckets(c: &mut Criterion) {
    let now = Utc.with_ymd_and_hms(2024, 3, 1, 0, 30, 0).unwrap();

    let mut group = c.benchmark_group("time_buckets");

    group.bench_function("trailing_months", |b| {
        b.iter(|| trailing_months(black_box(now), 6))
    });

    group.bench_function("trailing_days", |b| {
        b.iter(|| trailing_days(black_box(now), 7))
    });

    group.finish();
}

criterion_group!(benches, benchmark_filter_composition, benchmark_buckets);
criterion_main!(benches);
