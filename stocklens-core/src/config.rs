//! Indicator configuration.
//!
//! Stored as TOML; every field has a default so a partial file (or an empty
//! one) is valid:
//!
//! ```toml
//! sma_windows = [20, 50, 200]
//! rsi_period = 14
//!
//! [macd]
//! fast = 12
//! slow = 26
//! signal = 9
//! ```

use crate::error::EngineError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("read config {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error(transparent)]
    Invalid(#[from] EngineError),
}

/// Spans for the MACD EMAs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MacdSpans {
    pub fast: usize,
    pub slow: usize,
    pub signal: usize,
}

impl Default for MacdSpans {
    fn default() -> Self {
        Self {
            fast: 12,
            slow: 26,
            signal: 9,
        }
    }
}

/// Window sizes and multipliers for every indicator the engine computes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndicatorConfig {
    pub sma_windows: Vec<usize>,
    pub macd: MacdSpans,
    pub rsi_period: usize,
    pub bollinger_period: usize,
    pub bollinger_k: f64,
    pub atr_period: usize,
    pub stochastic_period: usize,
    pub stochastic_smoothing: usize,
}

impl Default for IndicatorConfig {
    fn default() -> Self {
        Self {
            sma_windows: vec![50, 200],
            macd: MacdSpans::default(),
            rsi_period: 14,
            bollinger_period: 20,
            bollinger_k: 2.0,
            atr_period: 14,
            stochastic_period: 14,
            stochastic_smoothing: 3,
        }
    }
}

impl IndicatorConfig {
    /// Load and validate a config from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Parse and validate a config from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        let invalid = |msg: String| -> Result<(), EngineError> {
            Err(EngineError::InvalidConfig(msg))
        };

        if let Some(w) = self.sma_windows.iter().find(|w| **w == 0) {
            return invalid(format!("sma window must be >= 1, got {w}"));
        }
        let periods = [
            ("macd.fast", self.macd.fast),
            ("macd.slow", self.macd.slow),
            ("macd.signal", self.macd.signal),
            ("rsi_period", self.rsi_period),
            ("bollinger_period", self.bollinger_period),
            ("atr_period", self.atr_period),
            ("stochastic_period", self.stochastic_period),
            ("stochastic_smoothing", self.stochastic_smoothing),
        ];
        if let Some((name, _)) = periods.iter().find(|(_, p)| *p == 0) {
            return invalid(format!("{name} must be >= 1"));
        }
        if self.macd.fast >= self.macd.slow {
            return invalid(format!(
                "macd.fast ({}) must be less than macd.slow ({})",
                self.macd.fast, self.macd.slow
            ));
        }
        if !self.bollinger_k.is_finite() || self.bollinger_k < 0.0 {
            return invalid(format!(
                "bollinger_k must be finite and >= 0, got {}",
                self.bollinger_k
            ));
        }
        Ok(())
    }

    /// BLAKE3 hex digest of the JSON form; identical configs share a fingerprint.
    pub fn fingerprint(&self) -> String {
        // Serializing plain numbers and vectors cannot fail.
        let json = serde_json::to_vec(self).unwrap_or_default();
        blake3::hash(&json).to_hex().to_string()
    }

    /// The largest lookback of any configured indicator.
    pub fn warmup(&self) -> usize {
        let sma = self.sma_windows.iter().copied().max().unwrap_or(1);
        [
            sma.saturating_sub(1),
            self.rsi_period.saturating_sub(1),
            self.bollinger_period.saturating_sub(1),
            self.atr_period.saturating_sub(1),
            (self.stochastic_period + self.stochastic_smoothing).saturating_sub(2),
        ]
        .into_iter()
        .max()
        .unwrap_or(0)
    }
}
