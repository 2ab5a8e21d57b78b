//! One decoded result row and a reader bound to an entity's projection.

use crate::error::AppError;
use crate::schema::{ColumnDef, ColumnType, EntityDescriptor};
use crate::sql::SqlValue;
use chrono::NaiveDate;

/// Positional values of one row, in the order of the statement's projection.
#[derive(Clone, Debug, PartialEq)]
pub struct Record {
    pub values: Vec<SqlValue>,
}

impl Record {
    pub fn new(values: Vec<SqlValue>) -> Self {
        Record { values }
    }
}

/// Reads a record column by column in descriptor order.
///
/// Entities read their fields in the same order the projection selects them;
/// any mismatch (width, value shape, NULL identifier, unread columns) is a
/// `MalformedRow` error rather than a silently misplaced value.
pub struct RowReader<'r> {
    record: &'r Record,
    descriptor: &'static EntityDescriptor,
    pos: usize,
}

impl<'r> RowReader<'r> {
    pub fn new(record: &'r Record, descriptor: &'static EntityDescriptor) -> Result<Self, AppError> {
        if record.values.len() != descriptor.columns.len() {
            return Err(AppError::malformed(
                descriptor.table,
                format!(
                    "expected {} columns, got {}",
                    descriptor.columns.len(),
                    record.values.len()
                ),
            ));
        }
        Ok(RowReader {
            record,
            descriptor,
            pos: 0,
        })
    }

    fn next(&mut self, ty: ColumnType) -> Result<(&'static ColumnDef, &'r SqlValue), AppError> {
        let descriptor = self.descriptor;
        let Some(column) = descriptor.columns.get(self.pos) else {
            return Err(AppError::malformed(descriptor.table, "read past last column"));
        };
        if column.ty != ty {
            return Err(AppError::malformed(
                column.name,
                format!("declared {:?}, read as {:?}", column.ty, ty),
            ));
        }
        let record = self.record;
        let value = &record.values[self.pos];
        if !value.matches(ty) {
            return Err(AppError::malformed(column.name, format!("expected {:?}, got {:?}", ty, value)));
        }
        self.pos += 1;
        Ok((column, value))
    }

    /// The identifier column. NULL here means the row is unusable.
    pub fn id(&mut self) -> Result<i64, AppError> {
        match self.next(ColumnType::BigInt)? {
            (_, SqlValue::BigInt(n)) => Ok(*n),
            (column, _) => Err(AppError::malformed(column.name, "identifier is NULL")),
        }
    }

    pub fn big_int(&mut self) -> Result<Option<i64>, AppError> {
        Ok(match self.next(ColumnType::BigInt)? {
            (_, SqlValue::BigInt(n)) => Some(*n),
            _ => None,
        })
    }

    pub fn text(&mut self) -> Result<Option<String>, AppError> {
        Ok(match self.next(ColumnType::Text)? {
            (_, SqlValue::Text(s)) => Some(s.clone()),
            _ => None,
        })
    }

    pub fn date(&mut self) -> Result<Option<NaiveDate>, AppError> {
        Ok(match self.next(ColumnType::Date)? {
            (_, SqlValue::Date(d)) => Some(*d),
            _ => None,
        })
    }

    /// Every projected column must have been read.
    pub fn finish(self) -> Result<(), AppError> {
        match self.descriptor.columns.get(self.pos) {
            None => Ok(()),
            Some(column) => Err(AppError::malformed(column.name, "column not read")),
        }
    }
}
