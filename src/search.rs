//! Full-text search seam. The index itself lives outside this crate.

use crate::error::AppError;
use crate::schema::EntityDescriptor;
use crate::sql::PageRequest;
use async_trait::async_trait;

/// Mirror of the entity tables in a search index.
///
/// Returns identifiers only; callers hydrate them from the database.
#[async_trait]
pub trait SearchIndex: Send + Sync {
    async fn search(
        &self,
        entity: &'static EntityDescriptor,
        query: &str,
        page: &PageRequest,
    ) -> Result<Vec<i64>, AppError>;

    async fn count(&self, entity: &'static EntityDescriptor) -> Result<u64, AppError>;
}

/// No index configured: every search is empty.
#[derive(Clone, Copy, Debug, Default)]
pub struct UnindexedSearch;

#[async_trait]
impl SearchIndex for UnindexedSearch {
    async fn search(
        &self,
        entity: &'static EntityDescriptor,
        query: &str,
        _page: &PageRequest,
    ) -> Result<Vec<i64>, AppError> {
        tracing::debug!(entity = entity.name, query, "search without index");
        Ok(Vec::new())
    }

    async fn count(&self, _entity: &'static EntityDescriptor) -> Result<u64, AppError> {
        Ok(0)
    }
}
