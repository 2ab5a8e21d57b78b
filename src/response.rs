//! Response header helpers: alerts and pagination.

use crate::sql::{PageRequest, SortOrder};
use axum::http::{HeaderMap, HeaderName, HeaderValue};

pub const TOTAL_COUNT_HEADER: &str = "x-total-count";

/// Insert a header, skipping names or values that are not valid HTTP.
fn put(headers: &mut HeaderMap, name: &str, value: &str) {
    match (HeaderName::from_bytes(name.as_bytes()), HeaderValue::from_str(value)) {
        (Ok(name), Ok(value)) => {
            headers.insert(name, value);
        }
        _ => tracing::warn!(header = name, "skipping invalid header"),
    }
}

fn alert(app: &str, message: &str, param: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    put(&mut headers, &format!("X-{}-alert", app), message);
    put(&mut headers, &format!("X-{}-params", app), param);
    headers
}

pub fn creation_alert(app: &str, entity: &str, id: &str) -> HeaderMap {
    alert(app, &format!("{}.{}.created", app, entity), id)
}

pub fn update_alert(app: &str, entity: &str, id: &str) -> HeaderMap {
    alert(app, &format!("{}.{}.updated", app, entity), id)
}

pub fn deletion_alert(app: &str, entity: &str, id: &str) -> HeaderMap {
    alert(app, &format!("{}.{}.deleted", app, entity), id)
}

pub(crate) fn failure_alert(app: &str, entity: &str, key: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    put(&mut headers, &format!("X-{}-error", app), &format!("error.{}", key));
    put(&mut headers, &format!("X-{}-params", app), entity);
    headers
}

/// Query pairs of the current request other than paging ones, re-encoded for links.
fn carried_query(query: &str) -> String {
    let mut out = form_urlencoded::Serializer::new(String::new());
    for (k, v) in form_urlencoded::parse(query.as_bytes()) {
        if !matches!(k.as_ref(), "page" | "size" | "sort") {
            out.append_pair(&k, &v);
        }
    }
    out.finish()
}

fn page_link(path: &str, carried: &str, page: u64, size: u64, sort: &[SortOrder], rel: &str) -> String {
    let mut query = format!("page={}&size={}", page, size);
    for s in sort {
        query.push_str(&format!("&sort={},{}", s.property, s.direction.as_sql().to_ascii_lowercase()));
    }
    if !carried.is_empty() {
        query.push('&');
        query.push_str(carried);
    }
    format!("<{}?{}>; rel=\"{}\"", path, query, rel)
}

/// `X-Total-Count` and a `Link` header with next, prev, last and first pages.
///
/// `uri` is the request path with its query; parameters other than page, size
/// and sort are kept on every link.
pub fn pagination_headers(uri: &str, page: &PageRequest, total: u64) -> HeaderMap {
    let (path, query) = uri.split_once('?').unwrap_or((uri, ""));
    let carried = carried_query(query);
    let link = |n: u64, rel: &str| page_link(path, &carried, n, page.size, &page.sort, rel);
    let pages = page.total_pages(total);
    let mut links = Vec::with_capacity(4);
    if page.page.saturating_add(1) < pages {
        links.push(link(page.page + 1, "next"));
    }
    if page.page > 0 {
        links.push(link(page.page - 1, "prev"));
    }
    links.push(link(pages.saturating_sub(1), "last"));
    links.push(link(0, "first"));

    let mut headers = HeaderMap::new();
    put(&mut headers, TOTAL_COUNT_HEADER, &total.to_string());
    put(&mut headers, "link", &links.join(","));
    headers
}
