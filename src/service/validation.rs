//! Request validation from column rules (required, maximum length).

use crate::error::AppError;
use crate::schema::{ColumnDef, ColumnType, EntityDescriptor};
use serde_json::{Map, Value};

pub struct RequestValidator;

impl RequestValidator {
    /// Validate a full body. Every required column must be present and non-null.
    pub fn validate(body: &Map<String, Value>, entity: &EntityDescriptor) -> Result<(), AppError> {
        for col in entity.value_columns() {
            let prop = col.property();
            let val = body.get(&prop);
            if col.required && (val.is_none() || val == Some(&Value::Null)) {
                return Err(AppError::Validation(format!("{} is required", prop)));
            }
            if let Some(v) = val {
                validate_field(&prop, v, col)?;
            }
        }
        Ok(())
    }

    /// Validate only the fields present in body (for PATCH). Required is not enforced for missing fields.
    pub fn validate_partial(body: &Map<String, Value>, entity: &EntityDescriptor) -> Result<(), AppError> {
        for (prop, v) in body {
            if let Some(col) = entity.value_columns().iter().find(|c| c.property() == *prop) {
                validate_field(prop, v, col)?;
            }
        }
        Ok(())
    }
}

fn validate_field(prop: &str, v: &Value, col: &ColumnDef) -> Result<(), AppError> {
    if v.is_null() {
        return Ok(());
    }
    let type_ok = match col.ty {
        ColumnType::BigInt => v.is_i64(),
        ColumnType::Text | ColumnType::Date => v.is_string(),
    };
    if !type_ok {
        return Err(AppError::Validation(format!("{} has the wrong type", prop)));
    }
    if let (Some(max), Some(s)) = (col.max_length, v.as_str()) {
        if s.chars().count() > max as usize {
            return Err(AppError::Validation(format!(
                "{} must be at most {} characters",
                prop, max
            )));
        }
    }
    Ok(())
}
