//! Trading signals read off the latest bar of a computed indicator series.
//!
//! Signals are advisory labels, not orders. Every rule looks only at the
//! last one or two bars, so the output never depends on future data.

use crate::config::IndicatorConfig;
use crate::domain::PriceSeries;
use crate::indicator::{names, IndicatorSeries};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SignalDirection {
    Buy,
    Sell,
}

impl fmt::Display for SignalDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Buy => write!(f, "BUY"),
            Self::Sell => write!(f, "SELL"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signal {
    /// Indicator the rule fired on.
    pub indicator: String,
    pub direction: SignalDirection,
    /// Indicator value that triggered the rule, rounded to 2 decimals.
    pub value: f64,
    pub reason: String,
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:<4} {} = {:.2} ({})",
            self.direction, self.indicator, self.value, self.reason
        )
    }
}

/// Direction of the longer-term trend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrendBias {
    Bullish,
    Bearish,
    Neutral,
}

impl fmt::Display for TrendBias {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Bullish => "bullish",
            Self::Bearish => "bearish",
            Self::Neutral => "neutral",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SignalDetector {
    pub rsi_low: f64,
    pub rsi_high: f64,
}

impl Default for SignalDetector {
    fn default() -> Self {
        Self {
            rsi_low: 30.0,
            rsi_high: 70.0,
        }
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn defined(value: Option<f64>) -> Option<f64> {
    value.filter(|v| !v.is_nan())
}

impl SignalDetector {
    pub fn new(rsi_low: f64, rsi_high: f64) -> Self {
        Self { rsi_low, rsi_high }
    }

    /// Signals for the latest bar, in rule order: RSI, MACD, Bollinger.
    pub fn analyze(&self, series: &PriceSeries, indicators: &IndicatorSeries) -> Vec<Signal> {
        let mut signals = Vec::new();
        let signal = |indicator: &str, direction, value: f64, reason: &str| Signal {
            indicator: indicator.to_string(),
            direction,
            value: round2(value),
            reason: reason.to_string(),
        };

        if let Some(rsi) = defined(indicators.last(names::RSI)) {
            if rsi < self.rsi_low {
                signals.push(signal(names::RSI, SignalDirection::Buy, rsi, "oversold"));
            } else if rsi > self.rsi_high {
                signals.push(signal(names::RSI, SignalDirection::Sell, rsi, "overbought"));
            }
        }

        let n = indicators.bar_count();
        if n >= 2 {
            let prev = defined(indicators.get(names::MACD, n - 2));
            let last = defined(indicators.get(names::MACD, n - 1));
            if let (Some(prev), Some(last)) = (prev, last) {
                if prev < 0.0 && last > 0.0 {
                    signals.push(signal(
                        names::MACD,
                        SignalDirection::Buy,
                        last,
                        "crossed above zero",
                    ));
                } else if prev > 0.0 && last < 0.0 {
                    signals.push(signal(
                        names::MACD,
                        SignalDirection::Sell,
                        last,
                        "crossed below zero",
                    ));
                }
            }
        }

        let close = series.last().close;
        if let Some(lower) = defined(indicators.last(names::LOWER_BAND)) {
            if close < lower {
                signals.push(signal(
                    names::LOWER_BAND,
                    SignalDirection::Buy,
                    close,
                    "close below lower band",
                ));
            }
        }
        if let Some(upper) = defined(indicators.last(names::UPPER_BAND)) {
            if close > upper {
                signals.push(signal(
                    names::UPPER_BAND,
                    SignalDirection::Sell,
                    close,
                    "close above upper band",
                ));
            }
        }

        signals
    }

    /// Bullish when the last close sits above every configured SMA and RSI is
    /// below `rsi_high`; bearish when below every SMA and RSI is above
    /// `rsi_low`. Anything else, including an undefined input, is neutral.
    pub fn trend_bias(
        &self,
        series: &PriceSeries,
        indicators: &IndicatorSeries,
        config: &IndicatorConfig,
    ) -> TrendBias {
        if config.sma_windows.is_empty() {
            return TrendBias::Neutral;
        }
        let Some(rsi) = defined(indicators.last(names::RSI)) else {
            return TrendBias::Neutral;
        };
        let smas: Option<Vec<f64>> = config
            .sma_windows
            .iter()
            .map(|&w| defined(indicators.last(&names::sma(w))))
            .collect();
        let Some(smas) = smas else {
            return TrendBias::Neutral;
        };

        let close = series.last().close;
        if smas.iter().all(|&sma| close > sma) && rsi < self.rsi_high {
            TrendBias::Bullish
        } else if smas.iter().all(|&sma| close < sma) && rsi > self.rsi_low {
            TrendBias::Bearish
        } else {
            TrendBias::Neutral
        }
    }
}
