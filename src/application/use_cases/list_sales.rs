use std::sync::Arc;

use once_cell::sync::Lazy;

use crate::application::dto::SaleRecord;
use crate::application::errors::UseCaseError;
use crate::application::filler::{Filled, ResultFiller};
use crate::application::ports::QueryExecutor;
use crate::application::query::asset_filter::{has_asset_filter, ASSET_FILTER_SCHEMA};
use crate::application::query::boundary::{build_boundary_filter, BoundaryColumns, BOUNDARY_SCHEMA};
use crate::application::query::greylist::{build_greylist_filter, COLLECTION_GREYLIST_SCHEMA};
use crate::application::query::sale_filter::{build_sale_filter, has_listing_filter, LISTING_SCHEMA};
use crate::application::query::sort::{resolve_sale_sort, SALE_SORT_KEYS};
use crate::application::query::{
    ArgSpec, ArgValue, AttributeFilter, FilterSchema, ListQuery, QueryBuilder, RequestParams,
};
use crate::application::validation::{pagination, paging_schema, sort_order};
use crate::domain::value_objects::SortOrder;

static LIST_SALES_SCHEMA: Lazy<FilterSchema> = Lazy::new(|| {
    FilterSchema::merge([
        &paging_schema(SortOrder::Desc),
        &FilterSchema::new().arg(
            "sort",
            ArgSpec::string()
                .values(SALE_SORT_KEYS)
                .default(ArgValue::Str("created".to_string())),
        ),
        &*ASSET_FILTER_SCHEMA,
        &*COLLECTION_GREYLIST_SCHEMA,
        &*BOUNDARY_SCHEMA,
        &*LISTING_SCHEMA,
    ])
});

const SALE_BASE: &str = "SELECT listing.sale_id FROM atomicmarket_sales listing \
    JOIN atomicassets_offers offer ON (listing.assets_contract = offer.contract AND listing.offer_id = offer.offer_id) \
    LEFT JOIN atomicmarket_sale_prices price ON (price.market_contract = listing.market_contract AND price.sale_id = listing.sale_id)";

/// Sales never page beyond this many rows, whatever the global maximum.
pub const SALE_MAX_LIMIT: i64 = 100;

/// Use case: filtered, sorted and paginated sale list (and its count)
pub struct ListSalesUseCase {
    executor: Arc<dyn QueryExecutor>,
    filler: Arc<ResultFiller>,
    max_limit: i64,
}

impl ListSalesUseCase {
    pub fn new(executor: Arc<dyn QueryExecutor>, filler: Arc<ResultFiller>, max_limit: i64) -> Self {
        Self {
            executor,
            filler,
            max_limit: max_limit.min(SALE_MAX_LIMIT),
        }
    }

    pub fn build_query(&self, params: &RequestParams) -> Result<ListQuery, UseCaseError> {
        let args = LIST_SALES_SCHEMA.parse(params)?;
        let attributes = AttributeFilter::parse(params)?;
        let sort = resolve_sale_sort(args.str("sort").unwrap_or("created"), args.list("state"))?;
        let order = sort_order(&args)?;
        let pagination = pagination(&args, self.max_limit)?;

        let mut query = QueryBuilder::new(SALE_BASE);
        query.equal("listing.market_contract", self.filler.market_contract());

        build_sale_filter(&args, &attributes, &mut query);

        if !args.contains("collection_name") {
            build_greylist_filter(&args, &mut query, "listing.collection_name");
        }

        let by_update = args.str("sort") == Some("updated");
        build_boundary_filter(
            &args,
            &mut query,
            BoundaryColumns {
                primary: "listing.sale_id",
                time: Some(if by_update { "listing.updated_at_time" } else { "listing.created_at_time" }),
                block: Some(if by_update { "listing.updated_at_block" } else { "listing.created_at_block" }),
            },
        );

        let ignore_index = has_asset_filter(&args) || !attributes.is_empty() || has_listing_filter(&args);

        Ok(ListQuery {
            filtered: query,
            sort,
            order,
            tie_breaker: "listing.sale_id",
            ignore_index,
            pagination,
        })
    }

    pub async fn execute(&self, params: &RequestParams) -> Result<Vec<Filled<SaleRecord>>, UseCaseError> {
        let query = self.build_query(params)?.into_page_query();
        let ids = self
            .executor
            .fetch_ids(&query.build_string(), query.build_values())
            .await?;

        Ok(self.filler.fill_sales(&ids).await?)
    }

    pub async fn count(&self, params: &RequestParams) -> Result<i64, UseCaseError> {
        let query = self.build_query(params)?;

        Ok(self
            .executor
            .fetch_count(&query.count_statement(), query.filtered.build_values())
            .await?)
    }
}
