//! Look-ahead contamination tests for every indicator.
//!
//! No indicator value at bar t may depend on price data from bar t+1 or later.
//!
//! Method: compute on a truncated series (bars 0..100) and the full series
//! (bars 0..200). Bars 0..100 must be identical between both runs.

use chrono::NaiveDate;
use stocklens_core::domain::{PriceBar, PriceSeries};
use stocklens_core::indicator::Indicator;
use stocklens_core::indicators::*;
use stocklens_core::{compute, IndicatorConfig};

/// N bars of synthetic OHLCV data with realistic variation.
fn make_test_bars(n: usize) -> Vec<PriceBar> {
    let base_date = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
    let mut bars = Vec::with_capacity(n);
    let mut price = 100.0;

    for i in 0..n {
        // Deterministic pseudo-random walk using a simple LCG
        let seed = (i as u64).wrapping_mul(6364136223846793005).wrapping_add(1);
        let change = ((seed % 200) as f64 - 100.0) * 0.05;
        price += change;
        price = price.max(10.0);

        let open = price - 0.5;
        let close = price + 0.3;
        bars.push(PriceBar {
            date: base_date + chrono::Duration::days(i as i64),
            open,
            high: open.max(close) + 2.0,
            low: open.min(close) - 2.0,
            close,
            volume: 1000 + (i as u64 * 100),
        });
    }

    bars
}

fn assert_prefix_matches(name: &str, truncated: &[f64], full: &[f64]) {
    for (i, (&t, &f)) in truncated.iter().zip(full).enumerate() {
        if t.is_nan() && f.is_nan() {
            continue;
        }
        assert!(
            !t.is_nan() && !f.is_nan(),
            "{name}: NaN mismatch at bar {i} (truncated={t}, full={f})"
        );
        assert!(
            (t - f).abs() < 1e-10,
            "{name}: look-ahead contamination at bar {i}: truncated={t}, full={f}"
        );
    }
}

fn assert_no_lookahead(indicator: &dyn Indicator, full_bars: &[PriceBar], truncated_len: usize) {
    let truncated_result = indicator.compute(&full_bars[..truncated_len]);
    let full_result = indicator.compute(full_bars);

    assert_eq!(truncated_result.len(), truncated_len, "{}", indicator.name());
    assert_eq!(full_result.len(), full_bars.len(), "{}", indicator.name());
    assert_prefix_matches(indicator.name(), &truncated_result, &full_result);
}

#[test]
fn lookahead_sma() {
    let bars = make_test_bars(200);
    assert_no_lookahead(&Sma::new(10), &bars, 100);
    assert_no_lookahead(&Sma::new(50), &bars, 100);
}

#[test]
fn lookahead_ema() {
    let bars = make_test_bars(200);
    assert_no_lookahead(&Ema::new(12), &bars, 100);
    assert_no_lookahead(&Ema::new(26), &bars, 100);
}

#[test]
fn lookahead_daily_return() {
    let bars = make_test_bars(200);
    assert_no_lookahead(&DailyReturn, &bars, 100);
}

#[test]
fn lookahead_macd() {
    let bars = make_test_bars(200);
    assert_no_lookahead(&Macd::macd(12, 26, 9), &bars, 100);
    assert_no_lookahead(&Macd::signal(12, 26, 9), &bars, 100);
    assert_no_lookahead(&Macd::histogram(12, 26, 9), &bars, 100);
}

#[test]
fn lookahead_rsi() {
    let bars = make_test_bars(200);
    assert_no_lookahead(&Rsi::new(14), &bars, 100);
    assert_no_lookahead(&Rsi::new(7), &bars, 100);
}

#[test]
fn lookahead_bollinger() {
    let bars = make_test_bars(200);
    assert_no_lookahead(&Bollinger::upper(20, 2.0), &bars, 100);
    assert_no_lookahead(&Bollinger::middle(20, 2.0), &bars, 100);
    assert_no_lookahead(&Bollinger::lower(20, 2.0), &bars, 100);
    assert_no_lookahead(&Bollinger::std(20, 2.0), &bars, 100);
}

#[test]
fn lookahead_atr() {
    let bars = make_test_bars(200);
    assert_no_lookahead(&TrueRange, &bars, 100);
    assert_no_lookahead(&Atr::new(14), &bars, 100);
    assert_no_lookahead(&Atr::new(5), &bars, 100);
}

#[test]
fn lookahead_obv() {
    let bars = make_test_bars(200);
    assert_no_lookahead(&Obv, &bars, 100);
}

#[test]
fn lookahead_stochastic() {
    let bars = make_test_bars(200);
    assert_no_lookahead(&Stochastic::k(14, 3), &bars, 100);
    assert_no_lookahead(&Stochastic::d(14, 3), &bars, 100);
}

#[test]
fn lookahead_full_engine() {
    let bars = make_test_bars(200);
    let config = IndicatorConfig::default();
    let full = PriceSeries::new("TEST", bars.clone()).unwrap();
    let truncated = PriceSeries::new("TEST", bars[..100].to_vec()).unwrap();

    let full_out = compute(&full, &config).unwrap();
    let truncated_out = compute(&truncated, &config).unwrap();

    for (name, values) in truncated_out.iter() {
        let full_values = full_out.get_series(name).unwrap();
        assert_prefix_matches(name, values, &full_values[..100]);
    }
}
