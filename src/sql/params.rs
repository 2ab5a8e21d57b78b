//! Column values: bound as query parameters and decoded from result rows.

use crate::schema::ColumnType;
use chrono::NaiveDate;
use sqlx::encode::{Encode, IsNull};
use sqlx::postgres::{PgTypeInfo, Postgres};
use sqlx::Database;

/// One cell of a row or one bound parameter.
///
/// NULL keeps its column type: a prepared statement is cached by its text, so
/// the parameter type sent with the first execution must be the one every
/// later execution uses.
#[derive(Clone, Debug, PartialEq)]
pub enum SqlValue {
    Null(ColumnType),
    BigInt(i64),
    Text(String),
    Date(NaiveDate),
}

impl SqlValue {
    /// Whether the value has the shape declared for a column.
    pub fn matches(&self, ty: ColumnType) -> bool {
        self.column_type() == ty
    }

    pub fn column_type(&self) -> ColumnType {
        match self {
            SqlValue::Null(t) => *t,
            SqlValue::BigInt(_) => ColumnType::BigInt,
            SqlValue::Text(_) => ColumnType::Text,
            SqlValue::Date(_) => ColumnType::Date,
        }
    }

    /// Same value, with a NULL retyped to `ty`.
    pub fn typed_as(self, ty: ColumnType) -> Self {
        match self {
            SqlValue::Null(_) => SqlValue::Null(ty),
            v => v,
        }
    }
}

impl From<Option<i64>> for SqlValue {
    fn from(v: Option<i64>) -> Self {
        v.map(SqlValue::BigInt).unwrap_or(SqlValue::Null(ColumnType::BigInt))
    }
}

impl From<Option<String>> for SqlValue {
    fn from(v: Option<String>) -> Self {
        v.map(SqlValue::Text).unwrap_or(SqlValue::Null(ColumnType::Text))
    }
}

impl From<Option<NaiveDate>> for SqlValue {
    fn from(v: Option<NaiveDate>) -> Self {
        v.map(SqlValue::Date).unwrap_or(SqlValue::Null(ColumnType::Date))
    }
}

impl<'q> Encode<'q, Postgres> for SqlValue {
    fn encode_by_ref(
        &self,
        buf: &mut <Postgres as Database>::ArgumentBuffer<'q>,
    ) -> Result<IsNull, Box<dyn std::error::Error + Send + Sync>> {
        Ok(match self {
            SqlValue::Null(_) => IsNull::Yes,
            SqlValue::BigInt(n) => <i64 as Encode<Postgres>>::encode_by_ref(n, buf)?,
            SqlValue::Text(s) => {
                let s_ref: &str = s.as_str();
                <&str as Encode<Postgres>>::encode_by_ref(&s_ref, buf)?
            }
            SqlValue::Date(d) => <NaiveDate as Encode<Postgres>>::encode_by_ref(d, buf)?,
        })
    }

    fn produces(&self) -> Option<PgTypeInfo> {
        match self {
            SqlValue::BigInt(_) | SqlValue::Null(ColumnType::BigInt) => {
                Some(<i64 as sqlx::Type<Postgres>>::type_info())
            }
            SqlValue::Text(_) | SqlValue::Null(ColumnType::Text) => {
                Some(<&str as sqlx::Type<Postgres>>::type_info())
            }
            SqlValue::Date(_) | SqlValue::Null(ColumnType::Date) => {
                Some(<NaiveDate as sqlx::Type<Postgres>>::type_info())
            }
        }
    }
}

/// Fallback only: `produces` always reports the concrete type of each value.
impl sqlx::Type<Postgres> for SqlValue {
    fn type_info() -> PgTypeInfo {
        PgTypeInfo::with_name("TEXT")
    }
}
