//! Per-entity service: validation, partial updates and search over the repository.

use crate::db::DatabaseClient;
use crate::domain::Entity;
use crate::error::AppError;
use crate::repository::{EntityRepository, EntityStream};
use crate::search::SearchIndex;
use crate::service::RequestValidator;
use crate::sql::{Filter, PageRequest};
use serde_json::{Map, Value};
use std::sync::Arc;

pub struct EntityService<E> {
    repo: EntityRepository<E>,
    search: Arc<dyn SearchIndex>,
}

impl<E: Entity> EntityService<E> {
    pub fn new(client: Arc<dyn DatabaseClient>, search: Arc<dyn SearchIndex>) -> Self {
        EntityService {
            repo: EntityRepository::new(client),
            search,
        }
    }

    pub fn repository(&self) -> &EntityRepository<E> {
        &self.repo
    }

    /// Validate and persist; inserts when the entity has no id.
    pub async fn save(&self, entity: &E) -> Result<E, AppError> {
        tracing::debug!(entity = E::DESCRIPTOR.name, "save");
        validate(entity)?;
        self.repo.save(entity).await
    }

    pub async fn update(&self, entity: &E) -> Result<E, AppError> {
        tracing::debug!(entity = E::DESCRIPTOR.name, id = ?entity.id(), "update");
        validate(entity)?;
        self.repo.save(entity).await
    }

    /// Overlay the non-null properties of `patch` onto the stored row. `None` when no row has `id`.
    pub async fn partial_update(&self, id: i64, patch: &Value) -> Result<Option<E>, AppError> {
        tracing::debug!(entity = E::DESCRIPTOR.name, id, "partial update");
        let patch = patch
            .as_object()
            .ok_or_else(|| AppError::BadRequest("body must be a JSON object".into()))?;
        RequestValidator::validate_partial(patch, E::DESCRIPTOR)?;
        let Some(existing) = self.repo.find_by_id(id).await? else {
            return Ok(None);
        };
        let mut current = into_object(&existing)?;
        for (prop, value) in patch {
            if prop == "id" || value.is_null() || !current.contains_key(prop) {
                continue;
            }
            current.insert(prop.clone(), value.clone());
        }
        let merged: E = serde_json::from_value(Value::Object(current))
            .map_err(|e| AppError::Validation(e.to_string()))?;
        validate(&merged)?;
        self.repo.save(&merged).await.map(Some)
    }

    pub fn find_all(&self, page: Option<&PageRequest>) -> Result<EntityStream<E>, AppError> {
        self.repo.find_all(page)
    }

    /// Like `find_all` with a WHERE condition; criteria filters are rejected by the builder.
    pub fn find_matching(&self, page: Option<&PageRequest>, filter: &Filter) -> Result<EntityStream<E>, AppError> {
        self.repo.find_matching(page, Some(filter))
    }

    pub async fn count_all(&self) -> Result<u64, AppError> {
        self.repo.count().await
    }

    pub async fn find_one(&self, id: i64) -> Result<Option<E>, AppError> {
        self.repo.find_by_id(id).await
    }

    pub async fn delete(&self, id: i64) -> Result<bool, AppError> {
        tracing::debug!(entity = E::DESCRIPTOR.name, id, "delete");
        self.repo.delete_by_id(id).await
    }

    /// Ids from the search index, hydrated in index order. Ids whose row is gone are skipped.
    pub async fn search(&self, query: &str, page: &PageRequest) -> Result<Vec<E>, AppError> {
        let ids = self.search.search(E::DESCRIPTOR, query, page).await?;
        let mut out = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(entity) = self.repo.find_by_id(id).await? {
                out.push(entity);
            }
        }
        Ok(out)
    }

    pub async fn search_count(&self) -> Result<u64, AppError> {
        self.search.count(E::DESCRIPTOR).await
    }
}

fn into_object<E: Entity>(entity: &E) -> Result<Map<String, Value>, AppError> {
    match serde_json::to_value(entity) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(AppError::Validation(format!("{} is not a JSON object", E::DESCRIPTOR.name))),
        Err(e) => Err(AppError::Validation(e.to_string())),
    }
}

fn validate<E: Entity>(entity: &E) -> Result<(), AppError> {
    RequestValidator::validate(&into_object(entity)?, E::DESCRIPTOR)
}
