//! Static description of an entity table: name, columns, validation rules.

use crate::case::{to_camel_case, to_snake_case};

/// Semantic type of a persisted column. Drives SQL casts, row decoding and DDL.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColumnType {
    BigInt,
    Text,
    Date,
}

impl ColumnType {
    /// PostgreSQL type name used in placeholder casts (`$1::bigint`).
    pub fn pg_cast(self) -> &'static str {
        match self {
            ColumnType::BigInt => "bigint",
            ColumnType::Text => "text",
            ColumnType::Date => "date",
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct ColumnDef {
    pub name: &'static str,
    pub ty: ColumnType,
    /// Rejected by validation when absent; NULL is still readable from a row.
    pub required: bool,
    pub max_length: Option<u32>,
}

impl ColumnDef {
    pub const fn new(name: &'static str, ty: ColumnType) -> Self {
        ColumnDef {
            name,
            ty,
            required: false,
            max_length: None,
        }
    }

    pub const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub const fn max_length(mut self, n: u32) -> Self {
        self.max_length = Some(n);
        self
    }

    /// JSON property name (camelCase) for this column.
    pub fn property(&self) -> String {
        to_camel_case(self.name)
    }
}

/// Shape of one entity. The identifier column is always the first column.
#[derive(Debug)]
pub struct EntityDescriptor {
    /// Entity name used in REST paths and alert headers (e.g. "types").
    pub name: &'static str,
    pub table: &'static str,
    pub columns: &'static [ColumnDef],
    /// List endpoint takes page/size/sort and returns pagination headers.
    pub paginated: bool,
}

impl EntityDescriptor {
    pub fn id_column(&self) -> &ColumnDef {
        &self.columns[0]
    }

    /// Persisted columns other than the identifier, in projection order.
    pub fn value_columns(&self) -> &[ColumnDef] {
        &self.columns[1..]
    }

    /// Resolve a JSON property (camelCase or snake_case) to its column.
    pub fn column_for_property(&self, property: &str) -> Option<&ColumnDef> {
        let name = to_snake_case(property);
        self.columns.iter().find(|c| c.name == name)
    }
}
