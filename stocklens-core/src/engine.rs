//! Indicator engine: one price series in, one aligned indicator series out.
//!
//! Batch only. A changed or extended price series is recomputed from
//! scratch; no indicator state survives between calls.

use crate::config::IndicatorConfig;
use crate::domain::{PriceBar, PriceSeries};
use crate::error::EngineError;
use crate::indicator::{Indicator, IndicatorSeries};
use crate::indicators::{
    Atr, Bollinger, DailyReturn, Ema, Macd, Obv, Rsi, Sma, Stochastic, TrueRange,
};
use tracing::debug;

/// A validated configuration turned into the list of indicators it implies.
pub struct IndicatorEngine {
    config: IndicatorConfig,
    indicators: Vec<Box<dyn Indicator>>,
}

impl IndicatorEngine {
    pub fn new(config: IndicatorConfig) -> Result<Self, EngineError> {
        config.validate()?;
        let indicators = build_indicators(&config);
        Ok(Self { config, indicators })
    }

    pub fn config(&self) -> &IndicatorConfig {
        &self.config
    }

    /// Compute every configured indicator over `series`.
    pub fn compute(&self, series: &PriceSeries) -> IndicatorSeries {
        let bars = series.bars();
        let mut out = IndicatorSeries::new(bars.len());

        for indicator in &self.indicators {
            out.insert(indicator.name(), indicator.compute(bars));
        }

        debug!(
            symbol = series.symbol(),
            bars = bars.len(),
            series = out.len(),
            "computed indicators"
        );
        out
    }
}

/// Indicators in output order: returns, SMAs, MACD family, RSI, Bollinger,
/// ATR, OBV, stochastic.
fn build_indicators(config: &IndicatorConfig) -> Vec<Box<dyn Indicator>> {
    let macd = config.macd;
    let (bb_period, bb_k) = (config.bollinger_period, config.bollinger_k);
    let (stoch_period, stoch_smooth) = (config.stochastic_period, config.stochastic_smoothing);

    let mut indicators: Vec<Box<dyn Indicator>> = vec![Box::new(DailyReturn)];
    for &window in &config.sma_windows {
        indicators.push(Box::new(Sma::new(window)));
    }
    indicators.extend([
        Box::new(Ema::new(macd.fast)) as Box<dyn Indicator>,
        Box::new(Ema::new(macd.slow)),
        Box::new(Macd::macd(macd.fast, macd.slow, macd.signal)),
        Box::new(Macd::signal(macd.fast, macd.slow, macd.signal)),
        Box::new(Macd::histogram(macd.fast, macd.slow, macd.signal)),
        Box::new(Rsi::new(config.rsi_period)),
        Box::new(Bollinger::middle(bb_period, bb_k)),
        Box::new(Bollinger::std(bb_period, bb_k)),
        Box::new(Bollinger::upper(bb_period, bb_k)),
        Box::new(Bollinger::lower(bb_period, bb_k)),
        Box::new(TrueRange),
        Box::new(Atr::new(config.atr_period)),
        Box::new(Obv),
        Box::new(Stochastic::k(stoch_period, stoch_smooth)),
        Box::new(Stochastic::d(stoch_period, stoch_smooth)),
    ]);
    indicators
}

/// Compute all indicators for a validated series.
pub fn compute(
    series: &PriceSeries,
    config: &IndicatorConfig,
) -> Result<IndicatorSeries, EngineError> {
    let engine = IndicatorEngine::new(config.clone())?;
    Ok(engine.compute(series))
}

/// Validate raw bars into a series, then compute.
///
/// Fails with [`EngineError::InvalidInput`] on an empty sequence,
/// non-increasing dates, or an OHLC violation.
pub fn compute_bars(
    symbol: &str,
    bars: Vec<PriceBar>,
    config: &IndicatorConfig,
) -> Result<IndicatorSeries, EngineError> {
    let series = PriceSeries::new(symbol, bars)?;
    compute(&series, config)
}
