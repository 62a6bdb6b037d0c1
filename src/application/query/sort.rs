//! Sort key resolution and the ORDER BY / LIMIT tail of list statements.

use super::args::ArgumentError;
use super::builder::QueryBuilder;
use crate::domain::value_objects::{Pagination, SortOrder};

pub const SALE_SORT_KEYS: &[&str] = &["created", "updated", "sale_id", "price", "template_mint"];

/// Join that makes the `data_table` alias available for attribute sorts.
pub const ASSET_DATA_JOIN: &str = "LEFT JOIN atomicassets_asset_data data_table \
     ON (asset.contract = data_table.contract AND asset.asset_id = data_table.asset_id)";

#[derive(Debug, Clone, PartialEq)]
pub enum SortExpr {
    Column(&'static str),
    /// `data_table.data->>key`, key bound as a variable
    JsonText(String),
    /// Same as `JsonText`, cast to double precision
    JsonNumber(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct SortDescriptor {
    pub expr: SortExpr,
    pub nullable: bool,
    /// Backed by an ordering index usable for pagination
    pub index_eligible: bool,
}

impl SortDescriptor {
    const fn column(column: &'static str, nullable: bool, index_eligible: bool) -> Self {
        Self {
            expr: SortExpr::Column(column),
            nullable,
            index_eligible,
        }
    }

    pub fn requires_data_join(&self) -> bool {
        !matches!(self.expr, SortExpr::Column(_))
    }

    fn render(&self, query: &mut QueryBuilder) -> String {
        match &self.expr {
            SortExpr::Column(column) => column.to_string(),
            SortExpr::JsonText(key) => {
                format!("data_table.data->>{}", query.add_variable(key.as_str()))
            }
            SortExpr::JsonNumber(key) => format!(
                "(data_table.data->>{})::double precision",
                query.add_variable(key.as_str())
            ),
        }
    }
}

fn attribute_key<'a>(sort: &'a str, prefix: &str) -> Result<Option<&'a str>, ArgumentError> {
    match sort.strip_prefix(prefix) {
        Some(key) if key.is_empty() || key.chars().count() > 64 => Err(ArgumentError::NotAllowed {
            name: "sort".to_string(),
            value: sort.to_string(),
        }),
        other => Ok(other),
    }
}

/// Asset sort keys; `None` sorts by asset id.
pub fn resolve_asset_sort(sort: Option<&str>) -> Result<SortDescriptor, ArgumentError> {
    let Some(sort) = sort else {
        return Ok(SortDescriptor::column("asset.asset_id", false, true));
    };

    if let Some(key) = attribute_key(sort, "data:number.")? {
        return Ok(SortDescriptor {
            expr: SortExpr::JsonNumber(key.to_string()),
            nullable: true,
            index_eligible: false,
        });
    }

    for prefix in ["data:text.", "data."] {
        if let Some(key) = attribute_key(sort, prefix)? {
            return Ok(SortDescriptor {
                expr: SortExpr::JsonText(key.to_string()),
                nullable: true,
                index_eligible: false,
            });
        }
    }

    let descriptor = match sort {
        "asset_id" | "minted" => SortDescriptor::column("asset.asset_id", false, true),
        "updated" => SortDescriptor::column("asset.updated_at_block", false, true),
        "template_mint" => SortDescriptor::column("mint.template_mint", true, false),
        "schema_mint" => SortDescriptor::column("mint.schema_mint", true, false),
        "collection_mint" => SortDescriptor::column("mint.collection_mint", true, false),
        other => {
            return Err(ArgumentError::NotAllowed {
                name: "sort".to_string(),
                value: other.to_string(),
            })
        }
    };

    Ok(descriptor)
}

/// Sale sort keys. `state` is the raw state filter; price sorts use the
/// final price when only sold sales are requested.
pub fn resolve_sale_sort(sort: &str, state: Option<&[String]>) -> Result<SortDescriptor, ArgumentError> {
    let only_sold = matches!(state, Some([s]) if s == "3");

    let descriptor = match sort {
        "sale_id" => SortDescriptor::column("listing.sale_id", false, true),
        "created" => SortDescriptor::column("listing.created_at_time", false, true),
        "updated" => SortDescriptor::column("listing.updated_at_time", false, true),
        "price" if only_sold => SortDescriptor::column("listing.final_price", true, false),
        "price" => SortDescriptor::column("price.price", true, false),
        "template_mint" => SortDescriptor::column("LOWER(listing.template_mint)", true, false),
        other => {
            return Err(ArgumentError::NotAllowed {
                name: "sort".to_string(),
                value: other.to_string(),
            })
        }
    };

    Ok(descriptor)
}

/// `ORDER BY <expr> [+ 1] <order> [NULLS LAST], <tie_breaker> ASC`
///
/// `ignore_index` adds the constant offset that keeps the planner off the
/// ordering index when non-indexed predicates are present. It only applies
/// to index-eligible sorts.
pub fn apply_order(
    query: &mut QueryBuilder,
    sort: &SortDescriptor,
    order: SortOrder,
    tie_breaker: &str,
    ignore_index: bool,
) {
    let mut clause = format!("ORDER BY {}", sort.render(query));

    if ignore_index && sort.index_eligible {
        clause.push_str(" + 1");
    }

    clause.push(' ');
    clause.push_str(order.as_sql());

    if sort.nullable {
        clause.push_str(" NULLS LAST");
    }

    clause.push_str(&format!(", {} ASC", tie_breaker));
    query.append(clause);
}

pub fn apply_pagination(query: &mut QueryBuilder, pagination: &Pagination) {
    let limit = query.add_variable(pagination.limit());
    let offset = query.add_variable(pagination.offset());
    query.append(format!("LIMIT {} OFFSET {}", limit, offset));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::query::builder::SqlValue;

    #[test]
    fn test_default_asset_sort() {
        let sort = resolve_asset_sort(None).unwrap();
        assert_eq!(sort.expr, SortExpr::Column("asset.asset_id"));
        assert!(sort.index_eligible);
        assert!(!sort.requires_data_join());
    }

    #[test]
    fn test_unknown_sort_rejected() {
        assert!(resolve_asset_sort(Some("owner")).is_err());
        assert!(resolve_sale_sort("owner", None).is_err());
        assert!(resolve_asset_sort(Some("data.")).is_err());
    }

    #[test]
    fn test_order_with_hint() {
        let mut query = QueryBuilder::new("SELECT listing.sale_id FROM atomicmarket_sales listing");
        let sort = resolve_sale_sort("created", None).unwrap();
        apply_order(&mut query, &sort, SortOrder::Desc, "listing.sale_id", true);

        assert_eq!(
            query.build_string(),
            "SELECT listing.sale_id FROM atomicmarket_sales listing \
             ORDER BY listing.created_at_time + 1 DESC, listing.sale_id ASC"
        );
    }

    #[test]
    fn test_hint_ignored_for_non_indexed_sort() {
        let mut query = QueryBuilder::new("SELECT 1");
        let sort = resolve_sale_sort("price", None).unwrap();
        apply_order(&mut query, &sort, SortOrder::Asc, "listing.sale_id", true);

        assert_eq!(
            query.build_string(),
            "SELECT 1 ORDER BY price.price ASC NULLS LAST, listing.sale_id ASC"
        );
    }

    #[test]
    fn test_price_sort_for_sold() {
        let state = vec!["3".to_string()];
        let sort = resolve_sale_sort("price", Some(state.as_slice())).unwrap();
        assert_eq!(sort.expr, SortExpr::Column("listing.final_price"));

        let state = vec!["1".to_string(), "3".to_string()];
        let sort = resolve_sale_sort("price", Some(state.as_slice())).unwrap();
        assert_eq!(sort.expr, SortExpr::Column("price.price"));
    }

    #[test]
    fn test_data_sort_key_is_bound() {
        let mut query = QueryBuilder::new("SELECT 1");
        query.equal("asset.contract", "atomicassets");

        let sort = resolve_asset_sort(Some("data:number.level")).unwrap();
        assert!(sort.requires_data_join());

        apply_order(&mut query, &sort, SortOrder::Asc, "asset.asset_id", false);
        apply_pagination(&mut query, &Pagination::new(2, 10, 100).unwrap());

        assert_eq!(
            query.build_string(),
            "SELECT 1 WHERE asset.contract = $1 \
             ORDER BY (data_table.data->>$2)::double precision ASC NULLS LAST, asset.asset_id ASC \
             LIMIT $3 OFFSET $4"
        );
        assert_eq!(
            &query.build_values()[1..],
            &[
                SqlValue::Text("level".to_string()),
                SqlValue::Int(10),
                SqlValue::Int(10),
            ]
        );
    }
}
