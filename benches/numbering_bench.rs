use chrono::{NaiveDate, TimeZone, Utc};
use criterion::{Criterion, black_box, criterion_group, criterion_main};
use rust_decimal_macros::dec;

use nommer::{
    Clock, InMemoryStore, NumberTemplate, NumberingService, TenantId, VatRateEntry, resolve_rate,
};

fn bench_template_parse(c: &mut Criterion) {
    c.bench_function("template_parse", |b| {
        b.iter(|| NumberTemplate::parse(black_box("INV-YYYY-NNNN")).unwrap())
    });
}

fn bench_template_render(c: &mut Criterion) {
    let template = NumberTemplate::parse("INV-YYYY-NNNN").unwrap();
    c.bench_function("template_render", |b| {
        b.iter(|| template.render(black_box(2025), black_box(4321)))
    });
}

fn bench_template_extract(c: &mut Criterion) {
    let template = NumberTemplate::parse("INV-YYYY-NNNN").unwrap();
    c.bench_function("template_extract", |b| {
        b.iter(|| template.extract(black_box("INV-2025-4321")).unwrap())
    });
}

fn bench_allocate(c: &mut Criterion) {
    let service = NumberingService::with_clock(
        InMemoryStore::new(),
        Clock::fixed(Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()),
    );
    let tenant = TenantId::new("bench");
    c.bench_function("allocate_next", |b| {
        b.iter(|| service.generate_invoice_number(black_box(&tenant)).unwrap())
    });
}

fn bench_resolve_rate(c: &mut Criterion) {
    // A decade of annual rate changes.
    let history: Vec<VatRateEntry> = (0..10)
        .map(|i| {
            VatRateEntry::new(
                dec!(0.14) + rust_decimal::Decimal::new(i, 3),
                NaiveDate::from_ymd_opt(2015 + i as i32, 4, 1).unwrap(),
            )
        })
        .collect();
    let on = NaiveDate::from_ymd_opt(2022, 7, 1).unwrap();
    c.bench_function("resolve_rate_10_entries", |b| {
        b.iter(|| resolve_rate(black_box(&history), dec!(0.14), black_box(on)))
    });
}

criterion_group!(
    benches,
    bench_template_parse,
    bench_template_render,
    bench_template_extract,
    bench_allocate,
    bench_resolve_rate
);
criterion_main!(benches);
