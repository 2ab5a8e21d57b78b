use crate::db::RowReader;
use crate::domain::Entity;
use crate::error::AppError;
use crate::schema::{ColumnDef, ColumnType, EntityDescriptor};
use crate::sql::SqlValue;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Visit {
    pub id: Option<i64>,
    pub visit_date: Option<NaiveDate>,
    pub description: Option<String>,
    pub pet_id: Option<i64>,
}

impl Entity for Visit {
    const DESCRIPTOR: &'static EntityDescriptor = &EntityDescriptor {
        name: "visits",
        table: "visits",
        columns: &[
            ColumnDef::new("id", ColumnType::BigInt),
            ColumnDef::new("visit_date", ColumnType::Date).required(),
            ColumnDef::new("description", ColumnType::Text).required().max_length(255),
            ColumnDef::new("pet_id", ColumnType::BigInt),
        ],
        paginated: true,
    };

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn from_row(row: &mut RowReader<'_>) -> Result<Self, AppError> {
        Ok(Visit {
            id: Some(row.id()?),
            visit_date: row.date()?,
            description: row.text()?,
            pet_id: row.big_int()?,
        })
    }

    fn values(&self) -> Vec<SqlValue> {
        vec![
            self.visit_date.into(),
            self.description.clone().into(),
            self.pet_id.into(),
        ]
    }
}
