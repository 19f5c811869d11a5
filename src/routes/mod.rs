pub mod common;
pub mod forecast;

pub use common::{common_routes, common_routes_with_ready};
pub use forecast::forecast_routes;
