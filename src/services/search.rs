use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;

use crate::config::BannerConfig;
use crate::models::banner::Banner;
use crate::services::error::BannerError;

/// Query-string parameters for the admin banner search.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
    pub sort: Option<String>,
    pub sort_direction: Option<String>,
    pub page: Option<i64>,
    pub size: Option<i64>,
}

/// One page of search results. `total` counts every match, independent of
/// the requested page slice.
#[derive(Debug)]
pub struct BannerPage {
    pub items: Vec<Banner>,
    pub total: i64,
    pub page: i64,
    pub size: i64,
}

/// A value bound into a built SQL predicate.
#[derive(Debug, Clone)]
pub(crate) enum SearchBind {
    Text(String),
    Bool(bool),
}

/// A SQL predicate fragment plus its bind values.
#[derive(Debug)]
pub(crate) struct SqlFilter {
    pub clause: String,
    pub binds: Vec<SearchBind>,
}

/// The fully composed search query, ready to execute.
#[derive(Debug)]
pub(crate) struct SearchQuery {
    /// Empty, or a complete `WHERE ...` clause.
    pub where_sql: String,
    pub order_sql: String,
    pub binds: Vec<SearchBind>,
    pub page: i64,
    pub size: i64,
    pub offset: i64,
}

type Interpreter = fn(&str) -> Option<SqlFilter>;

/// Ordered list of free-text interpreters. Each yields at most one
/// predicate; every applicable interpretation is OR'd together, so a token
/// that is both a valid date and a valid boolean contributes both.
const INTERPRETERS: &[Interpreter] = &[substring_filter, boolean_filter, date_filter];

// SQLite's lower() only folds ASCII, so substring matching is
// case-insensitive for ASCII text only; non-ASCII tokens match
// case-sensitively.
fn substring_filter(q: &str) -> Option<SqlFilter> {
    let pattern = format!("%{}%", q.to_lowercase());
    Some(SqlFilter {
        clause: "(lower(message) LIKE ? OR lower(url_path) LIKE ? OR lower(category) LIKE ?)"
            .into(),
        binds: vec![
            SearchBind::Text(pattern.clone()),
            SearchBind::Text(pattern.clone()),
            SearchBind::Text(pattern),
        ],
    })
}

fn boolean_filter(q: &str) -> Option<SqlFilter> {
    let value = match q.to_ascii_lowercase().as_str() {
        "true" => true,
        "false" => false,
        _ => return None,
    };
    Some(SqlFilter {
        clause: "active = ?".into(),
        binds: vec![SearchBind::Bool(value)],
    })
}

fn date_filter(q: &str) -> Option<SqlFilter> {
    let day = parse_query_date(q)?;
    let day = day.format("%Y-%m-%d").to_string();
    Some(SqlFilter {
        clause: "(date(start_datetime) = ? OR date(end_datetime) = ? \
                  OR date(created) = ? OR date(updated) = ?)"
            .into(),
        binds: vec![
            SearchBind::Text(day.clone()),
            SearchBind::Text(day.clone()),
            SearchBind::Text(day.clone()),
            SearchBind::Text(day),
        ],
    })
}

/// Accept a plain calendar date, or a full RFC 3339 timestamp reduced to
/// its UTC date.
fn parse_query_date(q: &str) -> Option<NaiveDate> {
    if let Ok(day) = NaiveDate::parse_from_str(q, "%Y-%m-%d") {
        return Some(day);
    }
    DateTime::parse_from_rfc3339(q)
        .ok()
        .map(|dt| dt.with_timezone(&Utc).date_naive())
}

/// Union all applicable interpretations of `q` into one OR'd filter.
pub(crate) fn build_filter(q: &str) -> Option<SqlFilter> {
    let filters: Vec<SqlFilter> = INTERPRETERS.iter().filter_map(|interp| interp(q)).collect();
    if filters.is_empty() {
        return None;
    }

    let mut clauses = Vec::with_capacity(filters.len());
    let mut binds = Vec::new();
    for filter in filters {
        clauses.push(filter.clause);
        binds.extend(filter.binds);
    }
    Some(SqlFilter {
        clause: clauses.join(" OR "),
        binds,
    })
}

/// Validate sort/direction against the configured whitelist and compose the
/// final WHERE / ORDER BY / pagination parts. Fails before any query runs.
pub(crate) fn build_query(
    cfg: &BannerConfig,
    params: &SearchParams,
) -> Result<SearchQuery, BannerError> {
    let sort = params.sort.as_deref().unwrap_or(&cfg.default_sort);
    if !cfg.sort_fields.iter().any(|f| f == sort) {
        return Err(BannerError::InvalidSortField {
            field: sort.to_string(),
        });
    }

    let direction = params
        .sort_direction
        .as_deref()
        .unwrap_or(&cfg.default_sort_direction)
        .to_ascii_lowercase();
    let direction = match direction.as_str() {
        "asc" => "ASC",
        "desc" => "DESC",
        _ => {
            return Err(BannerError::InvalidSortDirection {
                direction: direction.to_string(),
            })
        }
    };

    let page = params.page.unwrap_or(1).max(1);
    // max(1) guards against a misconfigured bound below the minimum
    let size = params
        .size
        .unwrap_or(cfg.default_page_size)
        .clamp(1, cfg.max_page_size.max(1));

    let q = params.q.as_deref().map(str::trim).filter(|s| !s.is_empty());
    let (where_sql, binds) = match q.and_then(build_filter) {
        Some(filter) => (format!("WHERE {}", filter.clause), filter.binds),
        None => (String::new(), Vec::new()),
    };

    Ok(SearchQuery {
        where_sql,
        // rowid tiebreak keeps pages deterministic under equal sort keys
        order_sql: format!("ORDER BY {sort} {direction}, rowid"),
        binds,
        page,
        size,
        // saturate: page is caller-controlled and may be arbitrarily large
        offset: (page - 1).saturating_mul(size),
    })
}
