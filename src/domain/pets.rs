use crate::db::RowReader;
use crate::domain::Entity;
use crate::error::AppError;
use crate::schema::{ColumnDef, ColumnType, EntityDescriptor};
use crate::sql::SqlValue;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A pet. `type_id` and `owner_id` reference `types` and `owners`; they are
/// exposed as plain ids.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pet {
    pub id: Option<i64>,
    pub name: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub type_id: Option<i64>,
    pub owner_id: Option<i64>,
}

impl Entity for Pet {
    const DESCRIPTOR: &'static EntityDescriptor = &EntityDescriptor {
        name: "pets",
        table: "pets",
        columns: &[
            ColumnDef::new("id", ColumnType::BigInt),
            ColumnDef::new("name", ColumnType::Text).required().max_length(30),
            ColumnDef::new("birth_date", ColumnType::Date).required(),
            ColumnDef::new("type_id", ColumnType::BigInt),
            ColumnDef::new("owner_id", ColumnType::BigInt),
        ],
        paginated: true,
    };

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn from_row(row: &mut RowReader<'_>) -> Result<Self, AppError> {
        Ok(Pet {
            id: Some(row.id()?),
            name: row.text()?,
            birth_date: row.date()?,
            type_id: row.big_int()?,
            owner_id: row.big_int()?,
        })
    }

    fn values(&self) -> Vec<SqlValue> {
        vec![
            self.name.clone().into(),
            self.birth_date.into(),
            self.type_id.into(),
            self.owner_id.into(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn birth_date_is_iso_date_in_json() {
        let pet: Pet = serde_json::from_value(serde_json::json!({
            "name": "Basil",
            "birthDate": "2012-08-06",
            "typeId": 6
        }))
        .unwrap();
        assert_eq!(pet.birth_date, NaiveDate::from_ymd_opt(2012, 8, 6));
        assert_eq!(pet.type_id, Some(6));
        assert_eq!(pet.owner_id, None);
    }
}
