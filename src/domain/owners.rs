use crate::db::RowReader;
use crate::domain::Entity;
use crate::error::AppError;
use crate::schema::{ColumnDef, ColumnType, EntityDescriptor};
use crate::sql::SqlValue;
use serde::{Deserialize, Serialize};

/// A pet owner. Every contact field is required on write.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Owner {
    pub id: Option<i64>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub telephone: Option<String>,
}

impl Entity for Owner {
    const DESCRIPTOR: &'static EntityDescriptor = &EntityDescriptor {
        name: "owners",
        table: "owners",
        columns: &[
            ColumnDef::new("id", ColumnType::BigInt),
            ColumnDef::new("first_name", ColumnType::Text).required().max_length(30),
            ColumnDef::new("last_name", ColumnType::Text).required().max_length(30),
            ColumnDef::new("address", ColumnType::Text).required().max_length(255),
            ColumnDef::new("city", ColumnType::Text).required().max_length(80),
            ColumnDef::new("telephone", ColumnType::Text).required().max_length(20),
        ],
        paginated: true,
    };

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn from_row(row: &mut RowReader<'_>) -> Result<Self, AppError> {
        Ok(Owner {
            id: Some(row.id()?),
            first_name: row.text()?,
            last_name: row.text()?,
            address: row.text()?,
            city: row.text()?,
            telephone: row.text()?,
        })
    }

    fn values(&self) -> Vec<SqlValue> {
        vec![
            self.first_name.clone().into(),
            self.last_name.clone().into(),
            self.address.clone().into(),
            self.city.clone().into(),
            self.telephone.clone().into(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_uses_camel_case_properties() {
        let owner = Owner {
            id: Some(1),
            first_name: Some("Betty".into()),
            ..Default::default()
        };
        let json = serde_json::to_value(&owner).unwrap();
        assert_eq!(json["firstName"], "Betty");
        assert!(json["lastName"].is_null());
        let back: Owner = serde_json::from_value(serde_json::json!({"firstName": "Betty", "id": 1})).unwrap();
        assert_eq!(back, owner);
    }
}
