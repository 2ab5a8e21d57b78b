//! Demo server: reads settings from the environment (and `.env`), creates missing tables,
//! mounts common routes at the root and entity resources under /api.

use axum::Router;
use petclinic_api::{
    apply_migrations, common_routes_with_ready, entity_routes, AppState, PgClient, Settings,
    UnindexedSearch, API_PREFIX,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::limit::RequestBodyLimitLayer;
use tracing_subscriber::EnvFilter;

const MAX_BODY_BYTES: usize = 1024 * 1024;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("petclinic_api=info".parse()?))
        .init();

    let settings = Settings::from_env()?;
    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(settings.db_max_connections)
        .connect(&settings.database_url)
        .await?;
    let client = PgClient::new(pool);

    if settings.run_migrations {
        apply_migrations(&client, &settings.entities).await?;
    }

    let bind_addr = settings.bind_addr;
    let state = AppState::new(Arc::new(client), Arc::new(UnindexedSearch), settings);

    let app = Router::new()
        .merge(common_routes_with_ready(state.clone()))
        .nest(API_PREFIX, entity_routes(state))
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES));

    let listener = TcpListener::bind(bind_addr).await?;
    tracing::info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}
