//! Forecast server: ensures the database and table exist, mounts the
//! operational and forecast routes, and serves.

use axum::Router;
use forecast_api::{
    common_routes_with_ready, connect_pool, ensure_database_exists, ensure_forecast_table,
    forecast_routes, AppState,
};
use tokio::net::TcpListener;
use tower_http::{limit::RequestBodyLimitLayer, trace::TraceLayer};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("forecast_api=info".parse()?))
        .init();

    let database_url =
        std::env::var("DATABASE_URL").unwrap_or_else(|_| "postgres://localhost/forecast".into());
    let max_connections: u32 = std::env::var("PG_MAX_CONNECTIONS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(5);

    ensure_database_exists(&database_url).await?;
    let pool = connect_pool(&database_url, max_connections).await?;
    ensure_forecast_table(&pool).await?;

    let state = AppState::new(pool);
    let app = Router::new()
        .merge(common_routes_with_ready(state.clone()))
        .nest("/api/v1", forecast_routes(state))
        .layer(RequestBodyLimitLayer::new(1024 * 1024))
        .layer(TraceLayer::new_for_http());

    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());
    let listener = TcpListener::bind(&bind_addr).await?;
    tracing::info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}
