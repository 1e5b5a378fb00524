//! StockLens Core: price series, technical indicators, signals, caching.
//!
//! This crate contains:
//! - Validated daily OHLCV price series
//! - The `Indicator` trait and the standard indicator set (SMA, EMA, MACD,
//!   RSI, Bollinger Bands, ATR, OBV, stochastic oscillator, daily return)
//! - A batch engine that computes every configured indicator aligned
//!   one-to-one with the input bars
//! - Signal detection, series summaries, and snapshot export
//! - A CSV data layer with an on-disk cache and retrying loader
//!
//! Undefined values (warmup, division by zero) are `f64::NAN`, never errors.

pub mod config;
pub mod data;
pub mod domain;
pub mod engine;
pub mod error;
pub mod export;
pub mod indicator;
pub mod indicators;
pub mod signals;
pub mod summary;

pub use config::IndicatorConfig;
pub use domain::{PriceBar, PriceSeries};
pub use engine::{compute, compute_bars, IndicatorEngine};
pub use error::EngineError;
pub use indicator::{Indicator, IndicatorSeries};
