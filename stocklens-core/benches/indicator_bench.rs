//! Criterion benchmarks for indicator computation.
//!
//! Benchmarks:
//! 1. Single indicators over 1k and 5k bars
//! 2. The full engine (default config) over 1k and 5k bars

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use stocklens_core::indicator::Indicator;
use stocklens_core::indicators::{Bollinger, Macd, Rsi, Sma, Stochastic};
use stocklens_core::{IndicatorConfig, IndicatorEngine, PriceBar, PriceSeries};

fn make_bars(n: usize) -> Vec<PriceBar> {
    let base_date = chrono::NaiveDate::from_ymd_opt(2000, 1, 3).unwrap();
    (0..n)
        .map(|i| {
            let close = 100.0 + (i as f64 * 0.1).sin() * 10.0;
            let open = close - 0.3;
            PriceBar {
                date: base_date + chrono::Duration::days(i as i64),
                open,
                high: close + 1.5,
                low: close - 1.5,
                close,
                volume: 1_000_000 + (i as u64 % 500_000),
            }
        })
        .collect()
}

fn bench_single_indicators(c: &mut Criterion) {
    let mut group = c.benchmark_group("single_indicator");

    for &bar_count in &[1_000, 5_000] {
        let bars = make_bars(bar_count);
        let indicators: Vec<Box<dyn Indicator>> = vec![
            Box::new(Sma::new(200)),
            Box::new(Macd::signal(12, 26, 9)),
            Box::new(Rsi::new(14)),
            Box::new(Bollinger::upper(20, 2.0)),
            Box::new(Stochastic::d(14, 3)),
        ];
        for indicator in &indicators {
            group.bench_with_input(
                BenchmarkId::new(indicator.name(), bar_count),
                &bar_count,
                |b, _| b.iter(|| indicator.compute(black_box(&bars))),
            );
        }
    }

    group.finish();
}

fn bench_engine(c: &mut Criterion) {
    let mut group = c.benchmark_group("engine_compute");
    let engine = IndicatorEngine::new(IndicatorConfig::default()).unwrap();

    for &bar_count in &[1_000, 5_000] {
        let series = PriceSeries::new("BENCH", make_bars(bar_count)).unwrap();
        group.bench_with_input(
            BenchmarkId::new("default_config", bar_count),
            &bar_count,
            |b, _| b.iter(|| engine.compute(black_box(&series))),
        );
    }

    group.finish();
}

criterion_group!(benches, bench_single_indicators, bench_engine);
criterion_main!(benches);
