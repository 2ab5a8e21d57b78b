//! PostgreSQL client over a shared sqlx pool.

use crate::db::{DatabaseClient, Record, RowStream};
use crate::error::AppError;
use crate::schema::ColumnType;
use crate::sql::{QueryBuf, SqlValue};
use chrono::NaiveDate;
use futures::stream::BoxStream;
use futures::TryStreamExt;
use sqlx::postgres::PgRow;
use sqlx::{Column, PgPool, Row};

#[derive(Clone)]
pub struct PgClient {
    pool: PgPool,
}

impl PgClient {
    pub fn new(pool: PgPool) -> Self {
        PgClient { pool }
    }
}

impl DatabaseClient for PgClient {
    fn fetch(&self, query: QueryBuf) -> RowStream {
        tracing::debug!(sql = %query.sql, params = ?query.params, "query");
        let pool = self.pool.clone();
        let rows: BoxStream<'static, Result<Record, AppError>> = Box::pin(async_stream::try_stream! {
            let mut q = sqlx::query(&query.sql);
            for p in &query.params {
                q = q.bind(p.clone());
            }
            let mut rows = q.fetch(&pool);
            while let Some(row) = rows.try_next().await? {
                yield decode_row(&row, &query.shape)?;
            }
        });
        RowStream::new(rows).on_release(|| tracing::trace!("cursor released"))
    }
}

/// Decode each cell by the type the statement declared for that position.
fn decode_row(row: &PgRow, shape: &[ColumnType]) -> Result<Record, AppError> {
    if row.len() != shape.len() {
        return Err(AppError::malformed(
            "*",
            format!("expected {} columns, got {}", shape.len(), row.len()),
        ));
    }
    let mut values = Vec::with_capacity(shape.len());
    for (idx, ty) in shape.iter().enumerate() {
        let value = match ty {
            ColumnType::BigInt => row.try_get::<Option<i64>, _>(idx).map(SqlValue::from),
            ColumnType::Text => row.try_get::<Option<String>, _>(idx).map(SqlValue::from),
            ColumnType::Date => row.try_get::<Option<NaiveDate>, _>(idx).map(SqlValue::from),
        };
        let value = value.map_err(|e| AppError::malformed(row.columns()[idx].name(), e.to_string()))?;
        values.push(value);
    }
    Ok(Record::new(values))
}
