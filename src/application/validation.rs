//! Paging and path parameter helpers shared by the read use cases.

use crate::application::errors::UseCaseError;
use crate::application::query::{ArgSpec, ArgValue, ArgumentError, FilterArgs, FilterSchema};
use crate::domain::value_objects::{Pagination, SortOrder};

/// `page`, `limit` and `order` with their defaults.
///
/// `limit` has no upper bound here; it is clamped to the configured maximum
/// when the pagination is built.
pub fn paging_schema(default_order: SortOrder) -> FilterSchema {
    FilterSchema::new()
        .arg(
            "page",
            ArgSpec::int().min(1.0).default(ArgValue::Int(Pagination::DEFAULT_PAGE)),
        )
        .arg(
            "limit",
            ArgSpec::int().min(1.0).default(ArgValue::Int(Pagination::DEFAULT_LIMIT)),
        )
        .arg(
            "order",
            ArgSpec::string()
                .values(SortOrder::VALUES)
                .default(ArgValue::Str(default_order.to_string())),
        )
}

pub fn pagination(args: &FilterArgs, max_limit: i64) -> Result<Pagination, UseCaseError> {
    let page = args.int("page").unwrap_or(Pagination::DEFAULT_PAGE);
    let limit = args.int("limit").unwrap_or(Pagination::DEFAULT_LIMIT);

    Ok(Pagination::new(page, limit, max_limit)?)
}

pub fn sort_order(args: &FilterArgs) -> Result<SortOrder, UseCaseError> {
    let raw = args.str("order").unwrap_or("desc");
    Ok(raw.parse()?)
}

/// Numeric id taken from a request path.
pub fn parse_id(name: &str, raw: &str) -> Result<i64, UseCaseError> {
    raw.parse::<i64>()
        .ok()
        .filter(|id| *id >= 0)
        .ok_or_else(|| {
            ArgumentError::InvalidType {
                name: name.to_string(),
                expected: "integer",
            }
            .into()
        })
}
