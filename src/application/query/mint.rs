use once_cell::sync::Lazy;

use super::args::{ArgSpec, FilterArgs, FilterSchema};
use super::builder::QueryBuilder;

const MINT_COLUMNS: [&str; 3] = ["template_mint", "schema_mint", "collection_mint"];

pub static MINT_SCHEMA: Lazy<FilterSchema> = Lazy::new(|| {
    let spec = || ArgSpec::int().min(1.0);

    FilterSchema::new()
        .arg("template_mint", spec())
        .arg("schema_mint", spec())
        .arg("collection_mint", spec())
        .arg("min_template_mint", spec())
        .arg("max_template_mint", spec())
        .arg("min_schema_mint", spec())
        .arg("max_schema_mint", spec())
        .arg("min_collection_mint", spec())
        .arg("max_collection_mint", spec())
});

/// Exact and ranged mint-number conditions against `mint_table`. Does
/// nothing when the statement has no mint table joined.
pub fn build_mint_filter(args: &FilterArgs, query: &mut QueryBuilder, mint_table: Option<&str>) {
    let Some(table) = mint_table else {
        return;
    };

    for column in MINT_COLUMNS {
        let qualified = format!("{}.{}", table, column);

        if let Some(exact) = args.int(column) {
            query.equal(&qualified, exact);
        }

        if let Some(min) = args.int(&format!("min_{}", column)) {
            let placeholder = query.add_variable(min);
            query.add_condition(format!("{} >= {}", qualified, placeholder));
        }

        if let Some(max) = args.int(&format!("max_{}", column)) {
            let placeholder = query.add_variable(max);
            query.add_condition(format!("{} <= {}", qualified, placeholder));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::query::args::RequestParams;

    fn parse(pairs: &[(&str, &str)]) -> FilterArgs {
        let params: RequestParams = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        MINT_SCHEMA.parse(&params).unwrap()
    }

    #[test]
    fn test_mint_conditions() {
        let mut query = QueryBuilder::new("SELECT 1 FROM m mint");
        build_mint_filter(
            &parse(&[("template_mint", "1"), ("max_collection_mint", "50")]),
            &mut query,
            Some("mint"),
        );

        assert_eq!(
            query.build_string(),
            "SELECT 1 FROM m mint WHERE mint.template_mint = $1 AND mint.collection_mint <= $2"
        );
    }

    #[test]
    fn test_no_mint_table_no_conditions() {
        let mut query = QueryBuilder::new("SELECT 1 FROM t");
        build_mint_filter(&parse(&[("template_mint", "1")]), &mut query, None);

        assert!(!query.has_conditions());
        assert_eq!(query.variable_count(), 0);
    }

    #[test]
    fn test_zero_mint_rejected() {
        let params: RequestParams = [("schema_mint".to_string(), "0".to_string())].into();
        assert!(MINT_SCHEMA.parse(&params).is_err());
    }
}
