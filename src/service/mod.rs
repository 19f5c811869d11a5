//! Forecast persistence operations.

mod forecast;
pub use forecast::ForecastService;
