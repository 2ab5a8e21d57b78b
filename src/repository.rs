//! Generic repository façade: one implementation for every entity type.

use crate::db::{DatabaseClient, Record, RowStream};
use crate::domain::{map_row, Entity};
use crate::error::AppError;
use crate::sql::{self, Filter, PageRequest, QueryBuf, SqlValue};
use futures::stream::{Stream, StreamExt};
use std::marker::PhantomData;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{ready, Context, Poll};

/// Entities mapped lazily from a row stream, in database order.
///
/// A mapping or database error is yielded once and ends the stream; the
/// cursor is released at that point.
pub struct EntityStream<E> {
    rows: Option<RowStream>,
    _entity: PhantomData<fn() -> E>,
}

impl<E: Entity> EntityStream<E> {
    fn new(rows: RowStream) -> Self {
        EntityStream {
            rows: Some(rows),
            _entity: PhantomData,
        }
    }

    /// Stop reading; the cursor is released immediately.
    pub fn close(mut self) {
        if let Some(rows) = self.rows.take() {
            rows.close();
        }
    }
}

impl<E: Entity> Stream for EntityStream<E> {
    type Item = Result<E, AppError>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        let Some(rows) = this.rows.as_mut() else {
            return Poll::Ready(None);
        };
        let item = match ready!(rows.poll_next_unpin(cx)) {
            None => None,
            Some(Ok(record)) => match map_row::<E>(&record) {
                Ok(entity) => return Poll::Ready(Some(Ok(entity))),
                Err(e) => Some(Err(e)),
            },
            Some(Err(e)) => Some(Err(e)),
        };
        if let Some(rows) = this.rows.take() {
            rows.close();
        }
        Poll::Ready(item)
    }
}

pub struct EntityRepository<E> {
    client: Arc<dyn DatabaseClient>,
    _entity: PhantomData<fn() -> E>,
}

impl<E> Clone for EntityRepository<E> {
    fn clone(&self) -> Self {
        EntityRepository {
            client: self.client.clone(),
            _entity: PhantomData,
        }
    }
}

impl<E: Entity> EntityRepository<E> {
    pub fn new(client: Arc<dyn DatabaseClient>) -> Self {
        EntityRepository {
            client,
            _entity: PhantomData,
        }
    }

    /// All rows, or one page of them when `page` is given.
    pub fn find_all(&self, page: Option<&PageRequest>) -> Result<EntityStream<E>, AppError> {
        self.find_matching(page, None)
    }

    pub fn find_matching(
        &self,
        page: Option<&PageRequest>,
        filter: Option<&Filter>,
    ) -> Result<EntityStream<E>, AppError> {
        let q = sql::select(E::DESCRIPTOR, page, filter)?;
        Ok(EntityStream::new(self.client.fetch(q)))
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<E>, AppError> {
        let q = sql::select(E::DESCRIPTOR, None, Some(&Filter::IdEquals(id)))?;
        let mut rows = EntityStream::<E>::new(self.client.fetch(q));
        let first = rows.next().await.transpose()?;
        rows.close();
        Ok(first)
    }

    /// INSERT when the entity has no id yet, UPDATE otherwise. Returns the stored row.
    pub async fn save(&self, entity: &E) -> Result<E, AppError> {
        match entity.id() {
            None => {
                let q = sql::insert(E::DESCRIPTOR, entity.values());
                self.fetch_one(q)
                    .await?
                    .ok_or_else(|| AppError::malformed(E::DESCRIPTOR.table, "insert returned no row"))
            }
            Some(id) => {
                let q = sql::update(E::DESCRIPTOR, id, entity.values());
                self.fetch_one(q)
                    .await?
                    .ok_or_else(|| AppError::NotFound(format!("{} {}", E::DESCRIPTOR.name, id)))
            }
        }
    }

    pub async fn count(&self) -> Result<u64, AppError> {
        self.count_matching(None).await
    }

    pub async fn count_matching(&self, filter: Option<&Filter>) -> Result<u64, AppError> {
        let q = sql::count(E::DESCRIPTOR, filter)?;
        match self.first_record(q).await?.map(|r| r.values) {
            Some(values) => match values.as_slice() {
                [SqlValue::BigInt(n)] => Ok(u64::try_from(*n).unwrap_or(0)),
                _ => Err(AppError::malformed("count", "expected one BIGINT")),
            },
            None => Ok(0),
        }
    }

    pub async fn exists_by_id(&self, id: i64) -> Result<bool, AppError> {
        Ok(self.count_matching(Some(&Filter::IdEquals(id))).await? > 0)
    }

    /// `true` when a row was deleted.
    pub async fn delete_by_id(&self, id: i64) -> Result<bool, AppError> {
        let q = sql::delete_by_id(E::DESCRIPTOR, id);
        Ok(self.first_record(q).await?.is_some())
    }

    async fn fetch_one(&self, q: QueryBuf) -> Result<Option<E>, AppError> {
        self.first_record(q).await?.map(|r| map_row::<E>(&r)).transpose()
    }

    async fn first_record(&self, q: QueryBuf) -> Result<Option<Record>, AppError> {
        let mut rows = self.client.fetch(q);
        let first = rows.next().await.transpose()?;
        rows.close();
        Ok(first)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Owner, PetType};
    use crate::schema::ColumnType;
    use crate::testing::{row, text, ScriptedClient};
    use axum::http::StatusCode;
    use axum::response::IntoResponse;
    use futures::TryStreamExt;

    fn type_row(id: i64, name: &str) -> Record {
        row(vec![SqlValue::BigInt(id), text(name)])
    }

    #[tokio::test]
    async fn find_all_maps_rows_in_order() {
        let client = ScriptedClient::new();
        client.push_rows(vec![type_row(1, "Dog"), type_row(2, "Cat")]);
        let repo = EntityRepository::<PetType>::new(client.clone());
        let all: Vec<PetType> = repo.find_all(None).unwrap().try_collect().await.unwrap();
        assert_eq!(
            all.iter().map(|t| t.name.as_deref().unwrap()).collect::<Vec<_>>(),
            vec!["Dog", "Cat"]
        );
        assert_eq!(client.released(), 1);
    }

    #[tokio::test]
    async fn types_scenario() {
        let client = ScriptedClient::new();
        client.push_rows(vec![type_row(1, "Dog"), type_row(2, "Cat")]);
        client.push_rows(vec![type_row(2, "Cat")]);
        client.push_rows(vec![]);
        let repo = EntityRepository::<PetType>::new(client.clone());

        let page = PageRequest::new(0, 10).unwrap();
        let all: Vec<PetType> = repo.find_all(Some(&page)).unwrap().try_collect().await.unwrap();
        assert_eq!(
            all,
            vec![
                PetType { id: Some(1), name: Some("Dog".into()) },
                PetType { id: Some(2), name: Some("Cat".into()) },
            ]
        );
        assert_eq!(
            repo.find_by_id(2).await.unwrap(),
            Some(PetType { id: Some(2), name: Some("Cat".into()) })
        );
        assert_eq!(repo.find_by_id(99).await.unwrap(), None);
        assert!(client.executed()[0].sql.ends_with("LIMIT 10 OFFSET 0"));
    }

    #[tokio::test]
    async fn find_by_id_closes_after_first_row() {
        let client = ScriptedClient::new();
        client.push_rows(vec![type_row(7, "Dog"), type_row(8, "Cat")]);
        let repo = EntityRepository::<PetType>::new(client.clone());
        let found = repo.find_by_id(7).await.unwrap().unwrap();
        assert_eq!(found.id, Some(7));
        assert_eq!(client.released(), 1);
        assert_eq!(client.executed()[0].params, vec![SqlValue::BigInt(7)]);
    }

    #[tokio::test]
    async fn find_by_id_absent_is_none() {
        let client = ScriptedClient::new();
        let repo = EntityRepository::<PetType>::new(client.clone());
        assert_eq!(repo.find_by_id(99).await.unwrap(), None);
    }

    #[tokio::test]
    async fn malformed_row_ends_stream_after_one_error() {
        let client = ScriptedClient::new();
        client.push_rows(vec![
            type_row(1, "Dog"),
            row(vec![SqlValue::Null(ColumnType::BigInt), text("ghost")]),
            type_row(3, "Cat"),
        ]);
        let repo = EntityRepository::<PetType>::new(client.clone());
        let mut stream = repo.find_all(None).unwrap();
        assert!(stream.next().await.unwrap().is_ok());
        assert!(matches!(
            stream.next().await,
            Some(Err(AppError::MalformedRow { .. }))
        ));
        assert!(stream.next().await.is_none());
        assert_eq!(client.released(), 1);
    }

    #[tokio::test]
    async fn dropping_stream_early_releases_cursor() {
        let client = ScriptedClient::new();
        client.push_rows(vec![type_row(1, "Dog"), type_row(2, "Cat")]);
        let repo = EntityRepository::<PetType>::new(client.clone());
        let mut stream = repo.find_all(None).unwrap();
        stream.next().await.unwrap().unwrap();
        drop(stream);
        assert_eq!(client.released(), 1);
    }

    #[tokio::test]
    async fn save_inserts_without_id_and_updates_with_id() {
        let client = ScriptedClient::new();
        client.push_rows(vec![type_row(10, "Hamster")]);
        client.push_rows(vec![type_row(10, "Bird")]);
        let repo = EntityRepository::<PetType>::new(client.clone());

        let created = repo
            .save(&PetType { id: None, name: Some("Hamster".into()) })
            .await
            .unwrap();
        assert_eq!(created.id, Some(10));
        let updated = repo
            .save(&PetType { id: Some(10), name: Some("Bird".into()) })
            .await
            .unwrap();
        assert_eq!(updated.name.as_deref(), Some("Bird"));

        let executed = client.executed();
        assert!(executed[0].sql.starts_with("INSERT INTO"));
        assert!(executed[1].sql.starts_with("UPDATE"));
        assert_eq!(executed[1].params, vec![text("Bird"), SqlValue::BigInt(10)]);
    }

    #[tokio::test]
    async fn insert_without_returned_row_is_malformed() {
        let client = ScriptedClient::new();
        client.push_rows(vec![]);
        let repo = EntityRepository::<PetType>::new(client.clone());
        let err = repo
            .save(&PetType { id: None, name: Some("Hamster".into()) })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::MalformedRow { ref column, .. } if column == "types"));
        assert_eq!(err.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn update_of_missing_row_is_not_found() {
        let client = ScriptedClient::new();
        let repo = EntityRepository::<Owner>::new(client.clone());
        let owner = Owner { id: Some(404), ..Default::default() };
        assert!(matches!(repo.save(&owner).await, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn count_exists_and_delete() {
        let client = ScriptedClient::new();
        client.push_rows(vec![row(vec![SqlValue::BigInt(3)])]);
        client.push_rows(vec![row(vec![SqlValue::BigInt(0)])]);
        client.push_rows(vec![row(vec![SqlValue::BigInt(5)])]);
        client.push_rows(vec![]);
        let repo = EntityRepository::<PetType>::new(client.clone());
        assert_eq!(repo.count().await.unwrap(), 3);
        assert!(!repo.exists_by_id(1).await.unwrap());
        assert!(repo.delete_by_id(5).await.unwrap());
        assert!(!repo.delete_by_id(6).await.unwrap());
        assert_eq!(client.released(), 4);
    }
}
