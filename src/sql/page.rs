//! Pagination, sort and filter inputs of the query builder.

use crate::error::AppError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

impl Direction {
    pub fn as_sql(self) -> &'static str {
        match self {
            Direction::Asc => "ASC",
            Direction::Desc => "DESC",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SortOrder {
    pub property: String,
    pub direction: Direction,
}

impl SortOrder {
    pub fn asc(property: &str) -> Self {
        SortOrder {
            property: property.to_string(),
            direction: Direction::Asc,
        }
    }

    pub fn desc(property: &str) -> Self {
        SortOrder {
            property: property.to_string(),
            direction: Direction::Desc,
        }
    }

    /// Parse one `sort` query value: `prop(,prop)*(,asc|desc)?`. Direction defaults to ascending.
    pub fn parse(raw: &str) -> Vec<SortOrder> {
        let mut parts: Vec<&str> = raw.split(',').map(str::trim).filter(|p| !p.is_empty()).collect();
        let direction = match parts.last().map(|p| p.to_ascii_lowercase()) {
            Some(d) if d == "asc" => {
                parts.pop();
                Direction::Asc
            }
            Some(d) if d == "desc" => {
                parts.pop();
                Direction::Desc
            }
            _ => Direction::Asc,
        };
        parts
            .into_iter()
            .map(|property| SortOrder {
                property: property.to_string(),
                direction,
            })
            .collect()
    }
}

/// Zero-based page index, page size, sort keys.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u64,
    pub size: u64,
    pub sort: Vec<SortOrder>,
}

impl PageRequest {
    pub fn new(page: u64, size: u64) -> Result<Self, AppError> {
        if size == 0 {
            return Err(AppError::BadRequest("page size must be greater than zero".into()));
        }
        // LIMIT and OFFSET are BIGINT.
        let max = i64::MAX as u64;
        if size > max || page.checked_mul(size).map_or(true, |offset| offset > max) {
            return Err(AppError::BadRequest(format!("page {} of size {} is out of range", page, size)));
        }
        Ok(PageRequest {
            page,
            size,
            sort: Vec::new(),
        })
    }

    pub fn with_sort(mut self, sort: Vec<SortOrder>) -> Self {
        self.sort = sort;
        self
    }

    pub fn offset(&self) -> u64 {
        self.page.saturating_mul(self.size)
    }

    pub fn next(&self) -> Self {
        PageRequest {
            page: self.page.saturating_add(1),
            ..self.clone()
        }
    }

    pub fn total_pages(&self, total: u64) -> u64 {
        total.div_ceil(self.size)
    }
}

/// One `property.operator=value` query-string condition.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Criterion {
    pub property: String,
    pub operator: String,
    pub value: String,
}

impl Criterion {
    /// `name.contains=x` → (name, contains, x); a bare key means `equals`.
    pub fn parse(key: &str, value: &str) -> Self {
        let (property, operator) = key.split_once('.').unwrap_or((key, "equals"));
        Criterion {
            property: property.to_string(),
            operator: operator.to_string(),
            value: value.to_string(),
        }
    }
}

/// WHERE condition requested of the query builder.
///
/// Only identifier equality is translated; criteria are representable so that
/// they can be rejected explicitly instead of being dropped.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Filter {
    IdEquals(i64),
    Criteria(Vec<Criterion>),
}
