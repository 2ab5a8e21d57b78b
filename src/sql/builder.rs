//! Builds parameterized SELECT, COUNT, INSERT, UPDATE, DELETE from an entity descriptor.

use crate::error::AppError;
use crate::schema::{ColumnType, EntityDescriptor};
use crate::sql::{projection, quoted, Filter, PageRequest, SqlValue, ENTITY_ALIAS};

/// Statement text, bound values, and the type of every returned column.
#[derive(Clone, Debug, PartialEq)]
pub struct QueryBuf {
    pub sql: String,
    pub params: Vec<SqlValue>,
    pub shape: Vec<ColumnType>,
}

impl QueryBuf {
    fn new(shape: Vec<ColumnType>) -> Self {
        QueryBuf {
            sql: String::new(),
            params: Vec::new(),
            shape,
        }
    }

    fn push_param(&mut self, v: SqlValue) -> u32 {
        self.params.push(v);
        self.params.len() as u32
    }

    /// Bind `v` and return its placeholder with an explicit cast (`$1::bigint`).
    /// A NULL is retyped to the column it binds to.
    fn placeholder(&mut self, v: SqlValue, ty: ColumnType) -> String {
        let n = self.push_param(v.typed_as(ty));
        format!("${}::{}", n, ty.pg_cast())
    }
}

/// Table with its alias, as it appears after FROM.
fn aliased_table(entity: &EntityDescriptor) -> String {
    format!("{} {}", quoted(entity.table), ENTITY_ALIAS)
}

fn aliased_column(name: &str) -> String {
    format!("{}.{}", ENTITY_ALIAS, quoted(name))
}

fn entity_shape(entity: &EntityDescriptor) -> Vec<ColumnType> {
    entity.columns.iter().map(|c| c.ty).collect()
}

fn where_clause(entity: &EntityDescriptor, filter: Option<&Filter>, q: &mut QueryBuf) -> Result<String, AppError> {
    match filter {
        None => Ok(String::new()),
        Some(Filter::IdEquals(id)) => {
            let id_col = entity.id_column();
            let ph = q.placeholder(SqlValue::BigInt(*id), id_col.ty);
            Ok(format!(" WHERE {} = {}", aliased_column(id_col.name), ph))
        }
        Some(Filter::Criteria(criteria)) => {
            let keys: Vec<String> = criteria
                .iter()
                .map(|c| format!("{}.{}", c.property, c.operator))
                .collect();
            Err(AppError::UnsupportedQuery(format!(
                "criteria filtering is not supported for {} ({})",
                entity.name,
                keys.join(", ")
            )))
        }
    }
}

/// ORDER BY the requested keys, then the identifier so pages never overlap.
fn order_clause(entity: &EntityDescriptor, page: &PageRequest) -> Result<String, AppError> {
    let id_name = entity.id_column().name;
    let mut parts = Vec::with_capacity(page.sort.len() + 1);
    let mut has_id = false;
    for s in &page.sort {
        let col = entity.column_for_property(&s.property).ok_or_else(|| {
            AppError::UnsupportedQuery(format!("unknown sort property '{}' for {}", s.property, entity.name))
        })?;
        has_id |= col.name == id_name;
        parts.push(format!("{} {}", aliased_column(col.name), s.direction.as_sql()));
    }
    if !has_id {
        parts.push(format!("{} ASC", aliased_column(id_name)));
    }
    Ok(format!(" ORDER BY {}", parts.join(", ")))
}

/// SELECT projection FROM table, optional id filter, optional pagination.
/// Without pagination no ORDER BY is emitted and rows come in natural order.
pub fn select(
    entity: &EntityDescriptor,
    page: Option<&PageRequest>,
    filter: Option<&Filter>,
) -> Result<QueryBuf, AppError> {
    let mut q = QueryBuf::new(entity_shape(entity));
    let cols = projection(entity, ENTITY_ALIAS).join(", ");
    let where_clause = where_clause(entity, filter, &mut q)?;
    let (order_clause, limit_clause) = match page {
        Some(p) => (
            order_clause(entity, p)?,
            format!(" LIMIT {} OFFSET {}", p.size, p.offset()),
        ),
        None => (String::new(), String::new()),
    };
    q.sql = format!(
        "SELECT {} FROM {}{}{}{}",
        cols,
        aliased_table(entity),
        where_clause,
        order_clause,
        limit_clause
    );
    Ok(q)
}

/// SELECT COUNT(*) with the same filter rules as `select`.
pub fn count(entity: &EntityDescriptor, filter: Option<&Filter>) -> Result<QueryBuf, AppError> {
    let mut q = QueryBuf::new(vec![ColumnType::BigInt]);
    let where_clause = where_clause(entity, filter, &mut q)?;
    q.sql = format!("SELECT COUNT(*) FROM {}{}", aliased_table(entity), where_clause);
    Ok(q)
}

/// INSERT every non-id column; the database assigns the id. Returns the full projection.
/// `values` follow `entity.value_columns()` order.
pub fn insert(entity: &EntityDescriptor, values: Vec<SqlValue>) -> QueryBuf {
    debug_assert_eq!(values.len(), entity.value_columns().len());
    let mut q = QueryBuf::new(entity_shape(entity));
    let mut cols = Vec::new();
    let mut placeholders = Vec::new();
    for (c, v) in entity.value_columns().iter().zip(values) {
        cols.push(quoted(c.name));
        placeholders.push(q.placeholder(v, c.ty));
    }
    let returning = projection(entity, ENTITY_ALIAS).join(", ");
    let table = format!("{} AS {}", quoted(entity.table), ENTITY_ALIAS);
    q.sql = if cols.is_empty() {
        format!("INSERT INTO {} DEFAULT VALUES RETURNING {}", table, returning)
    } else {
        format!(
            "INSERT INTO {} ({}) VALUES ({}) RETURNING {}",
            table,
            cols.join(", "),
            placeholders.join(", "),
            returning
        )
    };
    q
}

/// UPDATE every non-id column of the row with `id`. Returns the full projection, or no row.
pub fn update(entity: &EntityDescriptor, id: i64, values: Vec<SqlValue>) -> QueryBuf {
    debug_assert_eq!(values.len(), entity.value_columns().len());
    let mut q = QueryBuf::new(entity_shape(entity));
    let mut sets = Vec::new();
    for (c, v) in entity.value_columns().iter().zip(values) {
        let ph = q.placeholder(v, c.ty);
        sets.push(format!("{} = {}", quoted(c.name), ph));
    }
    let id_col = entity.id_column();
    if sets.is_empty() {
        sets.push(format!("{} = {}", quoted(id_col.name), aliased_column(id_col.name)));
    }
    let id_ph = q.placeholder(SqlValue::BigInt(id), id_col.ty);
    let returning = projection(entity, ENTITY_ALIAS).join(", ");
    q.sql = format!(
        "UPDATE {} AS {} SET {} WHERE {} = {} RETURNING {}",
        quoted(entity.table),
        ENTITY_ALIAS,
        sets.join(", "),
        aliased_column(id_col.name),
        id_ph,
        returning
    );
    q
}

/// DELETE by id. Returns the deleted id, so zero rows means nothing was deleted.
pub fn delete_by_id(entity: &EntityDescriptor, id: i64) -> QueryBuf {
    let id_col = entity.id_column();
    let mut q = QueryBuf::new(vec![id_col.ty]);
    let ph = q.placeholder(SqlValue::BigInt(id), id_col.ty);
    let returning = projection(entity, ENTITY_ALIAS).swap_remove(0);
    q.sql = format!(
        "DELETE FROM {} AS {} WHERE {} = {} RETURNING {}",
        quoted(entity.table),
        ENTITY_ALIAS,
        aliased_column(id_col.name),
        ph,
        returning
    );
    q
}

/// Connectivity check.
pub fn ping() -> QueryBuf {
    let mut q = QueryBuf::new(vec![ColumnType::BigInt]);
    q.sql = "SELECT 1::bigint".into();
    q
}
