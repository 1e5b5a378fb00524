//! Engine error taxonomy.
//!
//! Undefined indicator values are not errors: they are `f64::NAN` entries in
//! the output series. Errors here are always the caller's input problem.

use crate::domain::SeriesError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    #[error("invalid input: {0}")]
    InvalidInput(#[from] SeriesError),

    #[error("invalid config: {0}")]
    InvalidConfig(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn series_error_converts_to_invalid_input() {
        let err: EngineError = SeriesError::Empty {
            symbol: "SPY".into(),
        }
        .into();
        assert!(matches!(err, EngineError::InvalidInput(_)));
        assert_eq!(
            err.to_string(),
            "invalid input: price series for 'SPY' is empty"
        );
    }
}
