use crate::db::RowReader;
use crate::domain::Entity;
use crate::error::AppError;
use crate::schema::{ColumnDef, ColumnType, EntityDescriptor};
use crate::sql::SqlValue;
use serde::{Deserialize, Serialize};

/// Kind of animal (dog, cat, ...).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PetType {
    pub id: Option<i64>,
    pub name: Option<String>,
}

impl Entity for PetType {
    const DESCRIPTOR: &'static EntityDescriptor = &EntityDescriptor {
        name: "types",
        table: "types",
        columns: &[
            ColumnDef::new("id", ColumnType::BigInt),
            ColumnDef::new("name", ColumnType::Text).required().max_length(80),
        ],
        paginated: false,
    };

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn from_row(row: &mut RowReader<'_>) -> Result<Self, AppError> {
        Ok(PetType {
            id: Some(row.id()?),
            name: row.text()?,
        })
    }

    fn values(&self) -> Vec<SqlValue> {
        vec![self.name.clone().into()]
    }
}
