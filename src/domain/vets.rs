use crate::db::RowReader;
use crate::domain::Entity;
use crate::error::AppError;
use crate::schema::{ColumnDef, ColumnType, EntityDescriptor};
use crate::sql::SqlValue;
use serde::{Deserialize, Serialize};

/// A veterinarian. Specialties are linked through a join table that is not hydrated here.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vet {
    pub id: Option<i64>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

impl Entity for Vet {
    const DESCRIPTOR: &'static EntityDescriptor = &EntityDescriptor {
        name: "vets",
        table: "vets",
        columns: &[
            ColumnDef::new("id", ColumnType::BigInt),
            ColumnDef::new("first_name", ColumnType::Text).required().max_length(30),
            ColumnDef::new("last_name", ColumnType::Text).required().max_length(30),
        ],
        paginated: true,
    };

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn from_row(row: &mut RowReader<'_>) -> Result<Self, AppError> {
        Ok(Vet {
            id: Some(row.id()?),
            first_name: row.text()?,
            last_name: row.text()?,
        })
    }

    fn values(&self) -> Vec<SqlValue> {
        vec![self.first_name.clone().into(), self.last_name.clone().into()]
    }
}
