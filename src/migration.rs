//! Schema bootstrap: idempotent CREATE TABLE for each entity descriptor.

use crate::db::DatabaseClient;
use crate::error::AppError;
use crate::schema::{ColumnDef, ColumnType, EntityDescriptor};
use crate::sql::{quoted, QueryBuf};
use futures::StreamExt;

fn column_type(c: &ColumnDef) -> String {
    match (c.ty, c.max_length) {
        (ColumnType::BigInt, _) => "BIGINT".into(),
        (ColumnType::Text, Some(n)) => format!("VARCHAR({})", n),
        (ColumnType::Text, None) => "TEXT".into(),
        (ColumnType::Date, _) => "DATE".into(),
    }
}

/// `CREATE TABLE IF NOT EXISTS` with a BIGSERIAL identifier; required columns are NOT NULL.
pub fn create_table(entity: &EntityDescriptor) -> QueryBuf {
    let mut col_defs = vec![format!("{} BIGSERIAL PRIMARY KEY", quoted(entity.id_column().name))];
    for c in entity.value_columns() {
        let mut def = format!("{} {}", quoted(c.name), column_type(c));
        if c.required {
            def.push_str(" NOT NULL");
        }
        col_defs.push(def);
    }
    QueryBuf {
        sql: format!(
            "CREATE TABLE IF NOT EXISTS {} ({})",
            quoted(entity.table),
            col_defs.join(", ")
        ),
        params: Vec::new(),
        shape: Vec::new(),
    }
}

/// Create every missing table, in the given order.
pub async fn apply_migrations(
    client: &dyn DatabaseClient,
    entities: &[&'static EntityDescriptor],
) -> Result<(), AppError> {
    for entity in entities {
        tracing::info!(table = entity.table, "ensuring table");
        let mut rows = client.fetch(create_table(entity));
        while let Some(row) = rows.next().await {
            row?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Entity, Pet, PetType};
    use crate::testing::ScriptedClient;

    #[test]
    fn pets_ddl() {
        assert_eq!(
            create_table(Pet::DESCRIPTOR).sql,
            r#"CREATE TABLE IF NOT EXISTS "pets" ("id" BIGSERIAL PRIMARY KEY, "name" VARCHAR(30) NOT NULL, "birth_date" DATE NOT NULL, "type_id" BIGINT, "owner_id" BIGINT)"#
        );
    }

    #[tokio::test]
    async fn runs_one_statement_per_entity() {
        let client = ScriptedClient::new();
        apply_migrations(client.as_ref(), &[PetType::DESCRIPTOR, Pet::DESCRIPTOR])
            .await
            .unwrap();
        let executed = client.executed();
        assert_eq!(executed.len(), 2);
        assert!(executed[0].sql.contains(r#""types""#));
        assert_eq!(client.released(), 2);
    }
}
