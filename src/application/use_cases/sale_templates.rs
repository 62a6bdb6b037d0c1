use std::sync::Arc;

use once_cell::sync::Lazy;

use crate::application::dto::SaleRecord;
use crate::application::errors::UseCaseError;
use crate::application::filler::{Filled, ResultFiller};
use crate::application::ports::QueryExecutor;
use crate::application::query::asset_filter::{
    build_asset_filter, has_asset_filter, AssetTables, ASSET_FILTER_SCHEMA,
};
use crate::application::query::greylist::{build_greylist_filter, COLLECTION_GREYLIST_SCHEMA};
use crate::application::query::{
    ArgSpec, ArgValue, ArgumentError, FilterSchema, QueryBuilder, RequestParams,
};
use crate::application::use_cases::list_sales::SALE_MAX_LIMIT;
use crate::application::validation::{pagination, paging_schema, sort_order};
use crate::domain::value_objects::{SaleApiState, SortOrder, OFFER_STATE_PENDING};

static SALE_TEMPLATES_SCHEMA: Lazy<FilterSchema> = Lazy::new(|| {
    FilterSchema::merge([
        &paging_schema(SortOrder::Desc),
        &*ASSET_FILTER_SCHEMA,
        &*COLLECTION_GREYLIST_SCHEMA,
        &FilterSchema::new()
            .arg("symbol", ArgSpec::string().min(1.0).max(7.0))
            .arg("collection_name", ArgSpec::list().min(1.0).max(12.0))
            .arg("min_price", ArgSpec::float().min(0.0))
            .arg("max_price", ArgSpec::float().min(0.0))
            .arg(
                "sort",
                ArgSpec::string()
                    .values(&["template_id", "price"])
                    .default(ArgValue::Str("template_id".to_string())),
            ),
    ])
});

const TABLES: AssetTables = AssetTables {
    asset: "asset",
    template: "\"template\"",
};

/// Use case: the cheapest listed sale for every template matching the
/// asset filter
pub struct SaleTemplatesUseCase {
    executor: Arc<dyn QueryExecutor>,
    filler: Arc<ResultFiller>,
    max_limit: i64,
}

impl SaleTemplatesUseCase {
    pub fn new(executor: Arc<dyn QueryExecutor>, filler: Arc<ResultFiller>, max_limit: i64) -> Self {
        Self {
            executor,
            filler,
            max_limit: max_limit.min(SALE_MAX_LIMIT),
        }
    }

    /// Statement text and its bind values.
    pub fn build_query(&self, params: &RequestParams) -> Result<QueryBuilder, UseCaseError> {
        let args = SALE_TEMPLATES_SCHEMA.parse(params)?;

        let Some(symbol) = args.str("symbol") else {
            return Err(ArgumentError::Invalid("symbol parameter is required".to_string()).into());
        };

        if !has_asset_filter(&args) && !args.contains("collection_whitelist") {
            return Err(ArgumentError::Invalid("You need to specify an asset filter!".to_string()).into());
        }

        let order = sort_order(&args)?;
        let pagination = pagination(&args, self.max_limit)?;

        let mut query = QueryBuilder::new(
            "SELECT DISTINCT ON (asset.contract, asset.template_id) \
                listing.sale_id, asset.template_id, price.price \
             FROM atomicmarket_sales listing, atomicassets_offers offer, atomicassets_offers_assets offer_asset, \
                atomicassets_assets asset, atomicmarket_sale_prices price, atomicassets_templates \"template\"",
        );

        query.add_condition(format!(
            "listing.assets_contract = offer.contract AND listing.offer_id = offer.offer_id \
             AND offer.contract = offer_asset.contract AND offer.offer_id = offer_asset.offer_id \
             AND offer_asset.contract = asset.contract AND offer_asset.asset_id = asset.asset_id \
             AND asset.contract = \"template\".contract AND asset.template_id = \"template\".template_id \
             AND listing.market_contract = price.market_contract AND listing.sale_id = price.sale_id \
             AND asset.template_id IS NOT NULL AND offer_asset.index = 1 \
             AND offer.state = {} AND listing.state = {}",
            OFFER_STATE_PENDING,
            SaleApiState::Listed as i16
        ));

        query.equal("listing.market_contract", self.filler.market_contract());
        query.equal("listing.settlement_symbol", symbol);

        if let Some(collections) = args.list("collection_name") {
            query.equal_many("listing.collection_name", collections);
        } else {
            build_greylist_filter(&args, &mut query, "listing.collection_name");
        }

        build_asset_filter(&args, &mut query, TABLES);

        if let Some(min) = args.float("min_price") {
            let placeholder = query.add_variable(min);
            query.add_condition(format!(
                "price.price >= {} * POW(10, price.settlement_precision)",
                placeholder
            ));
        }

        if let Some(max) = args.float("max_price") {
            let placeholder = query.add_variable(max);
            query.add_condition(format!(
                "price.price <= {} * POW(10, price.settlement_precision)",
                placeholder
            ));
        }

        query.append("ORDER BY asset.contract, asset.template_id, price.price ASC");

        let column = match args.str("sort") {
            Some("price") => "t1.price",
            _ => "t1.template_id",
        };

        let mut outer = query.wrap("SELECT t1.sale_id", "t1");
        let limit = outer.add_variable(pagination.limit());
        let offset = outer.add_variable(pagination.offset());
        outer.append(format!(
            "ORDER BY {} {} NULLS LAST, t1.template_id ASC LIMIT {} OFFSET {}",
            column,
            order.as_sql(),
            limit,
            offset
        ));

        Ok(outer)
    }

    pub async fn execute(&self, params: &RequestParams) -> Result<Vec<Filled<SaleRecord>>, UseCaseError> {
        let query = self.build_query(params)?;
        let ids = self
            .executor
            .fetch_ids(&query.build_string(), query.build_values())
            .await?;

        Ok(self.filler.fill_sales(&ids).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::{MockAssetRepository, MockQueryExecutor, MockSaleRepository};
    use crate::application::query::builder::{placeholder_indices, SqlValue};

    fn params(pairs: &[(&str, &str)]) -> RequestParams {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn use_case() -> SaleTemplatesUseCase {
        let filler = ResultFiller::new(
            Arc::new(MockAssetRepository::new()),
            Arc::new(MockSaleRepository::new()),
            "atomicassets",
            "atomicmarket",
        );
        SaleTemplatesUseCase::new(Arc::new(MockQueryExecutor::new()), Arc::new(filler), 1000)
    }

    #[test]
    fn test_symbol_required() {
        let err = use_case()
            .build_query(&params(&[("collection_whitelist", "heroes")]))
            .unwrap_err();
        assert_eq!(err.to_string(), "symbol parameter is required");
    }

    #[test]
    fn test_asset_filter_required() {
        let err = use_case().build_query(&params(&[("symbol", "WAX")])).unwrap_err();
        assert!(matches!(err, UseCaseError::Arguments(_)));
    }

    #[test]
    fn test_statement_shape() {
        let query = use_case()
            .build_query(&params(&[
                ("symbol", "WAX"),
                ("template_id", "7"),
                ("max_price", "10"),
                ("sort", "price"),
                ("order", "asc"),
            ]))
            .unwrap();

        let sql = query.build_string();
        assert!(sql.starts_with("SELECT t1.sale_id FROM (SELECT DISTINCT ON (asset.contract, asset.template_id)"));
        assert!(sql.ends_with("ORDER BY t1.price ASC NULLS LAST, t1.template_id ASC LIMIT $5 OFFSET $6"));
        assert_eq!(placeholder_indices(&sql), vec![1, 2, 3, 4, 5, 6]);
        assert_eq!(query.build_values()[1], SqlValue::Text("WAX".to_string()));
    }
}
