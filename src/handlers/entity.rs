//! Entity resource handlers: create, read, update, partial update, delete, list, search.

use crate::domain::Entity;
use crate::error::AppError;
use crate::extractors::Pageable;
use crate::response::{creation_alert, deletion_alert, pagination_headers, update_alert};
use crate::routes::API_PREFIX;
use crate::state::AppState;
use axum::{
    extract::{OriginalUri, Path, State},
    http::{header, HeaderValue, StatusCode, Uri},
    response::{IntoResponse, Response},
    Json,
};
use futures::TryStreamExt;
use serde_json::Value;

fn bad_request<E: Entity>(state: &AppState, message: &str, key: &'static str) -> AppError {
    AppError::BadRequestAlert {
        message: message.to_string(),
        app: state.app_name().to_string(),
        entity: E::DESCRIPTOR.name,
        key,
    }
}

/// Rows returned by the database always carry their id.
fn persisted_id<E: Entity>(entity: &E) -> Result<i64, AppError> {
    entity
        .id()
        .ok_or_else(|| AppError::malformed(E::DESCRIPTOR.id_column().name, "stored row has no identifier"))
}

/// The body id must be present, match the path, and name an existing row.
async fn check_update_target<E: Entity>(state: &AppState, path_id: i64, body_id: Option<i64>) -> Result<(), AppError> {
    let Some(body_id) = body_id else {
        return Err(bad_request::<E>(state, "Invalid id", "idnull"));
    };
    if body_id != path_id {
        return Err(bad_request::<E>(state, "Invalid ID", "idinvalid"));
    }
    if !state.service::<E>().repository().exists_by_id(path_id).await? {
        return Err(bad_request::<E>(state, "Entity not found", "idnotfound"));
    }
    Ok(())
}

pub async fn create<E: Entity>(
    State(state): State<AppState>,
    Json(entity): Json<E>,
) -> Result<Response, AppError> {
    let name = E::DESCRIPTOR.name;
    tracing::debug!(entity = name, "REST request to create");
    if entity.id().is_some() {
        let message = format!("A new {} cannot already have an ID", name);
        return Err(bad_request::<E>(&state, &message, "idexists"));
    }
    let saved = state.service::<E>().save(&entity).await?;
    let id = persisted_id(&saved)?;
    let mut headers = creation_alert(state.app_name(), name, &id.to_string());
    if let Ok(location) = HeaderValue::from_str(&format!("{}/{}/{}", API_PREFIX, name, id)) {
        headers.insert(header::LOCATION, location);
    }
    Ok((StatusCode::CREATED, headers, Json(saved)).into_response())
}

pub async fn update<E: Entity>(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(entity): Json<E>,
) -> Result<Response, AppError> {
    let name = E::DESCRIPTOR.name;
    tracing::debug!(entity = name, id, "REST request to update");
    check_update_target::<E>(&state, id, entity.id()).await?;
    let saved = state.service::<E>().update(&entity).await?;
    let headers = update_alert(state.app_name(), name, &id.to_string());
    Ok((StatusCode::OK, headers, Json(saved)).into_response())
}

pub async fn partial_update<E: Entity>(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(patch): Json<Value>,
) -> Result<Response, AppError> {
    let name = E::DESCRIPTOR.name;
    tracing::debug!(entity = name, id, "REST request to partially update");
    check_update_target::<E>(&state, id, patch.get("id").and_then(Value::as_i64)).await?;
    let saved = state
        .service::<E>()
        .partial_update(id, &patch)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("{} {}", name, id)))?;
    let headers = update_alert(state.app_name(), name, &id.to_string());
    Ok((StatusCode::OK, headers, Json(saved)).into_response())
}

/// Paginated entities answer one page with `X-Total-Count` and `Link`; the others answer every row.
pub async fn list<E: Entity>(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    pageable: Pageable,
) -> Result<Response, AppError> {
    let descriptor = E::DESCRIPTOR;
    tracing::debug!(entity = descriptor.name, page = ?pageable.page, "REST request to list");
    let service = state.service::<E>();
    let page = descriptor.paginated.then_some(&pageable.page);
    let rows = match pageable.list_filter() {
        Some(filter) => service.find_matching(page, &filter)?,
        None => service.find_all(page)?,
    };
    let rows: Vec<E> = rows.try_collect().await?;
    match page {
        Some(page) => {
            let total = service.count_all().await?;
            let headers = pagination_headers(request_target(&uri), page, total);
            Ok((StatusCode::OK, headers, Json(rows)).into_response())
        }
        None => Ok(Json(rows).into_response()),
    }
}

pub async fn read<E: Entity>(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Response, AppError> {
    let name = E::DESCRIPTOR.name;
    tracing::debug!(entity = name, id, "REST request to get");
    let row = state
        .service::<E>()
        .find_one(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("{} {}", name, id)))?;
    Ok(Json(row).into_response())
}

pub async fn delete<E: Entity>(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Response, AppError> {
    let name = E::DESCRIPTOR.name;
    tracing::debug!(entity = name, id, "REST request to delete");
    state.service::<E>().delete(id).await?;
    let headers = deletion_alert(state.app_name(), name, &id.to_string());
    Ok((StatusCode::NO_CONTENT, headers).into_response())
}

/// Search results with pagination headers computed from the index count.
pub async fn search<E: Entity>(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    pageable: Pageable,
) -> Result<Response, AppError> {
    let query = pageable
        .query
        .as_deref()
        .ok_or_else(|| AppError::BadRequest("query is required".into()))?;
    tracing::debug!(entity = E::DESCRIPTOR.name, query, "REST request to search");
    let service = state.service::<E>();
    let total = service.search_count().await?;
    let rows = service.search(query, &pageable.page).await?;
    let headers = pagination_headers(request_target(&uri), &pageable.page, total);
    Ok((StatusCode::OK, headers, Json(rows)).into_response())
}

fn request_target(uri: &Uri) -> &str {
    uri.path_and_query().map_or(uri.path(), |pq| pq.as_str())
}
