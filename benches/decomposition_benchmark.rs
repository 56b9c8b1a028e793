//! Decomposition Benchmarks
//!
//! Additive decomposition and the month-end reindexing that precedes it,
//! over series from a few years to a few centuries of monthly data.

use chrono::NaiveDate;
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use unemployment_insights::temporal::month_end;
use unemployment_insights::time_series::SeasonalDecomposition;
use unemployment_insights::{TimeSeries, NA};

/// Monthly series with trend, a yearly cycle and deterministic noise
fn create_monthly_series(months: usize) -> TimeSeries {
    let mut rng_state: u64 = 42;
    let mut noise = || {
        rng_state = rng_state.wrapping_mul(6364136223846793005).wrapping_add(1);
        (rng_state >> 33) as f64 / (u32::MAX as f64) - 0.5
    };

    let mut dates = Vec::with_capacity(months);
    let mut values = Vec::with_capacity(months);
    let mut date = NaiveDate::from_ymd_opt(2000, 1, 31).unwrap();
    for i in 0..months {
        let season = (i % 12) as f64 * std::f64::consts::PI / 6.0;
        values.push(NA::Value(6.0 + 0.01 * i as f64 + season.sin() + noise()));
        dates.push(date);
        date = month_end(date + chrono::Duration::days(1));
    }
    TimeSeries::new(values, dates, None).unwrap()
}

fn bench_decompose(c: &mut Criterion) {
    let mut group = c.benchmark_group("Seasonal Decomposition");
    let decomposition = SeasonalDecomposition::new(12);

    for months in [36, 120, 1200] {
        let series = create_monthly_series(months);
        group.bench_with_input(BenchmarkId::from_parameter(months), &series, |b, s| {
            b.iter(|| decomposition.decompose(std::hint::black_box(s)).unwrap());
        });
    }

    group.finish();
}

fn bench_reindex_and_fill(c: &mut Criterion) {
    let mut group = c.benchmark_group("Month-end Reindex");

    for months in [120, 1200] {
        let series = create_monthly_series(months);
        group.bench_with_input(BenchmarkId::from_parameter(months), &series, |b, s| {
            b.iter(|| std::hint::black_box(s).asfreq_month_end().interpolate_linear());
        });
    }

    group.finish();
}

criterion_group!(benches, bench_decompose, bench_reindex_and_fill);

criterion_main!(benches);
