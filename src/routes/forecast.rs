//! Forecast CRUD routes, mounted under /api/v1 by the server.
//! /forecast/latest is a static segment, so it wins over /forecast/:id.

use crate::handlers::forecast::{
    create, delete as delete_handler, latest, list, patch as patch_handler, read, replace,
};
use crate::state::AppState;
use axum::{routing::get, Router};

pub fn forecast_routes(state: AppState) -> Router {
    Router::new()
        .route("/forecast", get(list).post(create))
        .route("/forecast/latest", get(latest))
        .route(
            "/forecast/:id",
            get(read)
                .put(replace)
                .patch(patch_handler)
                .delete(delete_handler),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::postgres::PgPoolOptions;

    #[tokio::test]
    async fn router_builds() {
        let pool = PgPoolOptions::new()
            .connect_lazy("postgres://localhost/forecast")
            .expect("lazy pool");
        let _router = forecast_routes(AppState::new(pool));
    }
}
