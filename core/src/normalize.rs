//! Response-shape normalization.
//!
//! # Design
//! The backend nests the same payload in several ways depending on the
//! endpoint and the collection:
//!
//! - lists: `{data: {<list key>: [...], pagination: {total, page, limit, pages}}}`,
//!   with some or all pagination fields at a root-level `pagination` instead;
//! - single records: bare, `{<record key>: {...}}`, `{data: {...}}` or
//!   `{data: {<record key>: {...}}}`.
//!
//! Every accepted key comes from `Resource::LIST_KEYS` / `RECORD_KEYS` and is
//! tried in order. These functions are pure: raw JSON in, canonical shape out.

use serde::Deserialize;
use serde_json::Value;

use crate::error::ApiError;
use crate::types::{ApiResponse, PaginatedResult, Resource};

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_LIMIT: u32 = 10;
pub const DEFAULT_TOTAL_PAGES: u32 = 1;
pub const DEFAULT_TOTAL: u64 = 0;

/// Normalize a list payload into a `PaginatedResult`.
///
/// Missing records yield an empty page. Each pagination field is read from
/// `data.pagination` first, then from a root `pagination`; missing, null or
/// zero values fall back to the defaults above.
pub fn list_page<R: Resource>(body: &Value) -> Result<PaginatedResult<R>, ApiError> {
    let data = envelope(body);

    let data_records = R::LIST_KEYS
        .iter()
        .find_map(|key| data.get(*key).filter(|v| v.is_array()));
    let records = match data_records {
        Some(array) => serde_json::from_value(array.clone())
            .map_err(|e| ApiError::DeserializationError(e.to_string()))?,
        None => Vec::new(),
    };

    let nested = data.get("pagination").filter(|p| p.is_object());
    let root = body.get("pagination").filter(|p| p.is_object());
    let field = |key: &str| positive(nested, key).or_else(|| positive(root, key));
    let field_u32 = |key: &str| field(key).and_then(|n| u32::try_from(n).ok());

    Ok(PaginatedResult {
        data: records,
        total: field("total").unwrap_or(DEFAULT_TOTAL),
        page: field_u32("page").unwrap_or(DEFAULT_PAGE),
        limit: field_u32("limit").unwrap_or(DEFAULT_LIMIT),
        total_pages: field_u32("pages").unwrap_or(DEFAULT_TOTAL_PAGES),
    })
}

/// Normalize a single-record payload.
pub fn record<R: Resource>(body: &Value) -> Result<R, ApiError> {
    let candidate = keyed::<R>(body)
        .or_else(|| {
            let inner = body.get("data").filter(|v| v.is_object())?;
            keyed::<R>(inner).or(Some(inner))
        })
        .unwrap_or(body);

    serde_json::from_value(candidate.clone())
        .map_err(|e| ApiError::DeserializationError(e.to_string()))
}

/// The server's message when `body` is a `{success: false}` envelope.
///
/// Returns `None` for every other shape, including bodies without a
/// `success` field. A rejection without text yields an empty message.
pub fn rejection(body: &Value) -> Option<String> {
    if body.get("success") != Some(&Value::Bool(false)) {
        return None;
    }
    let envelope = ApiResponse::<Value>::deserialize(body).ok()?;
    Some(envelope.error.or(envelope.message).unwrap_or_default())
}

/// The `data` object when present, otherwise the root.
fn envelope(body: &Value) -> &Value {
    match body.get("data") {
        Some(inner) if inner.is_object() => inner,
        _ => body,
    }
}

fn keyed<'a, R: Resource>(value: &'a Value) -> Option<&'a Value> {
    R::RECORD_KEYS
        .iter()
        .find_map(|key| value.get(*key).filter(|v| v.is_object()))
}

/// Whole numbers are accepted as integers, integral floats (`5.0`) or
/// numeric strings (`"5"`). Fractions, negatives and zero are rejected.
fn positive(pagination: Option<&Value>, key: &str) -> Option<u64> {
    let n = match pagination?.get(key)? {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0 && *f >= 0.0).map(|f| f as u64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }?;
    (n > 0).then_some(n)
}
