use once_cell::sync::Lazy;

use super::args::{ArgSpec, FilterArgs, FilterSchema};
use super::builder::QueryBuilder;

/// Primary-id and time/block bounds. All bounds are inclusive.
pub static BOUNDARY_SCHEMA: Lazy<FilterSchema> = Lazy::new(|| {
    FilterSchema::new()
        .arg("ids", ArgSpec::int_list().min(0.0))
        .arg("lower_bound", ArgSpec::int().min(0.0))
        .arg("upper_bound", ArgSpec::int().min(0.0))
        .arg("after", ArgSpec::int().min(0.0))
        .arg("before", ArgSpec::int().min(0.0))
        .arg("min_block", ArgSpec::int().min(0.0))
        .arg("max_block", ArgSpec::int().min(0.0))
});

/// Columns of one logical axis. The caller picks `time`/`block` from the
/// active sort key (e.g. `updated_at_*` when sorting by `updated`).
#[derive(Debug, Clone, Copy)]
pub struct BoundaryColumns {
    pub primary: &'static str,
    pub time: Option<&'static str>,
    pub block: Option<&'static str>,
}

pub fn build_boundary_filter(args: &FilterArgs, query: &mut QueryBuilder, columns: BoundaryColumns) {
    if let Some(ids) = args.int_list("ids") {
        query.equal_many(columns.primary, ids.to_vec());
    }

    range(query, columns.primary, args.int("lower_bound"), args.int("upper_bound"));

    if let Some(time) = columns.time {
        range(query, time, args.int("after"), args.int("before"));
    }

    if let Some(block) = columns.block {
        range(query, block, args.int("min_block"), args.int("max_block"));
    }
}

fn range(query: &mut QueryBuilder, column: &str, lower: Option<i64>, upper: Option<i64>) {
    if let Some(lower) = lower {
        let placeholder = query.add_variable(lower);
        query.add_condition(format!("{} >= {}", column, placeholder));
    }

    if let Some(upper) = upper {
        let placeholder = query.add_variable(upper);
        query.add_condition(format!("{} <= {}", column, placeholder));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::query::args::RequestParams;
    use crate::application::query::builder::SqlValue;

    const COLUMNS: BoundaryColumns = BoundaryColumns {
        primary: "asset.asset_id",
        time: Some("asset.minted_at_time"),
        block: Some("asset.minted_at_block"),
    };

    fn parse(pairs: &[(&str, &str)]) -> FilterArgs {
        let params: RequestParams = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        BOUNDARY_SCHEMA.parse(&params).unwrap()
    }

    #[test]
    fn test_only_supplied_bounds_emitted() {
        let mut query = QueryBuilder::new("SELECT 1 FROM atomicassets_assets asset");
        build_boundary_filter(&parse(&[("lower_bound", "10")]), &mut query, COLUMNS);

        assert_eq!(
            query.build_string(),
            "SELECT 1 FROM atomicassets_assets asset WHERE asset.asset_id >= $1"
        );
    }

    #[test]
    fn test_all_bounds_inclusive() {
        let mut query = QueryBuilder::new("SELECT 1 FROM atomicassets_assets asset");
        build_boundary_filter(
            &parse(&[
                ("ids", "1,2"),
                ("lower_bound", "1"),
                ("upper_bound", "9"),
                ("after", "1000"),
                ("before", "2000"),
                ("min_block", "5"),
                ("max_block", "6"),
            ]),
            &mut query,
            COLUMNS,
        );

        let sql = query.build_string();
        assert!(sql.contains("asset.asset_id = ANY($1)"));
        assert!(sql.contains("asset.asset_id >= $2 AND asset.asset_id <= $3"));
        assert!(sql.contains("asset.minted_at_time >= $4 AND asset.minted_at_time <= $5"));
        assert!(sql.contains("asset.minted_at_block >= $6 AND asset.minted_at_block <= $7"));
        assert_eq!(query.build_values()[0], SqlValue::IntList(vec![1, 2]));
        assert_eq!(query.variable_count(), 7);
    }

    #[test]
    fn test_time_bounds_ignored_without_column() {
        let mut query = QueryBuilder::new("SELECT 1 FROM t");
        build_boundary_filter(
            &parse(&[("after", "1000")]),
            &mut query,
            BoundaryColumns {
                primary: "t.id",
                time: None,
                block: None,
            },
        );

        assert!(!query.has_conditions());
    }
}
