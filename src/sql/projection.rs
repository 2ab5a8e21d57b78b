//! Column projection of an entity under a table alias.

use crate::schema::EntityDescriptor;

/// Alias of the entity table in every generated statement.
pub const ENTITY_ALIAS: &str = "e";

/// Quote identifier for PostgreSQL (safe: only from descriptors).
pub(crate) fn quoted(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

/// Ordered column expressions that fully reconstruct the entity, id first:
/// `e."first_name" AS "e_first_name"`. Order matches the descriptor and
/// therefore the row reader.
pub fn projection(entity: &EntityDescriptor, alias: &str) -> Vec<String> {
    entity
        .columns
        .iter()
        .map(|c| {
            format!(
                "{}.{} AS {}",
                alias,
                quoted(c.name),
                quoted(&format!("{}_{}", alias, c.name))
            )
        })
        .collect()
}
