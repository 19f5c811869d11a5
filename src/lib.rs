//! Forecast API: weather forecast CRUD service backed by PostgreSQL.

pub mod error;
pub mod handlers;
pub mod model;
pub mod response;
pub mod routes;
pub mod service;
pub mod state;
pub mod store;

pub use error::AppError;
pub use model::{ForecastInput, ForecastPatch, ForecastRecord};
pub use response::Detail;
pub use routes::{common_routes, common_routes_with_ready, forecast_routes};
pub use service::ForecastService;
pub use state::AppState;
pub use store::{connect_pool, ensure_database_exists, ensure_forecast_table};
