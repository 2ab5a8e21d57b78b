//! Common routes: health, readiness, version.

use crate::sql;
use crate::state::AppState;
use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use futures::StreamExt;
use serde::Serialize;

#[derive(Serialize)]
struct HealthBody {
    status: &'static str,
}

#[derive(Serialize)]
struct ReadyBody {
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    database: Option<&'static str>,
}

async fn health() -> Json<HealthBody> {
    Json(HealthBody { status: "ok" })
}

async fn ready(State(state): State<AppState>) -> Result<Json<ReadyBody>, (StatusCode, Json<ReadyBody>)> {
    let mut rows = state.db.fetch(sql::ping());
    let reachable = matches!(rows.next().await, Some(Ok(_)));
    rows.close();
    if !reachable {
        return Err((
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ReadyBody {
                status: "degraded",
                database: Some("unavailable"),
            }),
        ));
    }
    Ok(Json(ReadyBody {
        status: "ok",
        database: Some("ok"),
    }))
}

async fn version() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "name": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Common routes including readiness with a database ping.
pub fn common_routes_with_ready(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/ready", get(ready))
        .route("/version", get(version))
        .route("/info", get(version))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use crate::error::AppError;
    use crate::search::UnindexedSearch;
    use crate::sql::SqlValue;
    use crate::testing::{row, ScriptedClient};
    use axum::body::Body;
    use axum::http::Request;
    use std::sync::Arc;
    use tower::ServiceExt;

    fn app(client: Arc<ScriptedClient>) -> Router {
        common_routes_with_ready(AppState::new(client, Arc::new(UnindexedSearch), Settings::default()))
    }

    #[tokio::test]
    async fn ready_pings_the_database() {
        let client = ScriptedClient::new();
        client.push_rows(vec![row(vec![SqlValue::BigInt(1)])]);
        let resp = app(client.clone())
            .oneshot(Request::get("/ready").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(client.executed()[0].sql, "SELECT 1::bigint");
        assert_eq!(client.released(), 1);
    }

    #[tokio::test]
    async fn ready_degrades_when_ping_fails() {
        let client = ScriptedClient::new();
        client.push_results(vec![Err(AppError::Db(sqlx::Error::PoolTimedOut))]);
        let resp = app(client)
            .oneshot(Request::get("/ready").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn health_needs_no_database() {
        let client = ScriptedClient::new();
        let resp = app(client.clone())
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert!(client.executed().is_empty());
    }
}
