//! Extract page, size, sort and filter criteria from the query string.

use crate::config::Settings;
use crate::error::AppError;
use crate::sql::{Criterion, Filter, PageRequest, SortOrder};
use crate::state::AppState;
use async_trait::async_trait;
use axum::{
    extract::{FromRequestParts, Query},
    http::request::Parts,
};

/// Query parameter ignored everywhere (client-side cache busting).
pub const CACHE_BUSTER: &str = "cacheBuster";

/// Paging and filtering requested by a list or search call.
///
/// `page` and `size` default to 0 and the configured default size; `size` is
/// capped at the configured maximum. `sort` may repeat. Every other parameter
/// is kept as a criterion.
#[derive(Clone, Debug, PartialEq)]
pub struct Pageable {
    pub page: PageRequest,
    pub query: Option<String>,
    pub criteria: Vec<Criterion>,
}

impl Pageable {
    pub fn from_pairs(pairs: Vec<(String, String)>, settings: &Settings) -> Result<Self, AppError> {
        let mut page = 0;
        let mut size = settings.default_page_size;
        let mut sort = Vec::new();
        let mut query = None;
        let mut criteria = Vec::new();
        for (k, v) in pairs {
            match k.as_str() {
                "page" => page = parse_number(&k, &v)?,
                "size" => size = parse_number(&k, &v)?.min(settings.max_page_size),
                "sort" => sort.extend(SortOrder::parse(&v)),
                "query" => query = Some(v),
                CACHE_BUSTER => {}
                _ => criteria.push(Criterion::parse(&k, &v)),
            }
        }
        Ok(Pageable {
            page: PageRequest::new(page, size)?.with_sort(sort),
            query,
            criteria,
        })
    }

    /// WHERE condition for a list call. A `query` parameter outside search counts as a criterion.
    pub fn list_filter(&self) -> Option<Filter> {
        let mut criteria = self.criteria.clone();
        if let Some(q) = &self.query {
            criteria.push(Criterion::parse("query", q));
        }
        (!criteria.is_empty()).then_some(Filter::Criteria(criteria))
    }
}

fn parse_number(key: &str, raw: &str) -> Result<u64, AppError> {
    raw.trim()
        .parse()
        .map_err(|_| AppError::BadRequest(format!("{} must be a non-negative integer", key)))
}

#[async_trait]
impl FromRequestParts<AppState> for Pageable {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let Query(pairs) = Query::<Vec<(String, String)>>::try_from_uri(&parts.uri)
            .map_err(|e| AppError::BadRequest(e.body_text()))?;
        Pageable::from_pairs(pairs, &state.settings)
    }
}
