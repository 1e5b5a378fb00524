//! Domain types: bars and validated price series.

pub mod bar;
pub mod series;

pub use bar::PriceBar;
pub use series::{PriceSeries, SeriesError};
