use std::sync::Arc;

use once_cell::sync::Lazy;

use crate::application::dto::AssetRecord;
use crate::application::errors::UseCaseError;
use crate::application::filler::{Filled, ResultFiller};
use crate::application::ports::QueryExecutor;
use crate::application::query::asset_filter::{
    build_asset_extras, build_asset_filter, has_asset_filter, AssetTables, ASSET_EXTRA_SCHEMA,
    ASSET_FILTER_SCHEMA,
};
use crate::application::query::boundary::{build_boundary_filter, BoundaryColumns, BOUNDARY_SCHEMA};
use crate::application::query::greylist::{build_greylist_filter, COLLECTION_GREYLIST_SCHEMA};
use crate::application::query::mint::{build_mint_filter, MINT_SCHEMA};
use crate::application::query::sort::{resolve_asset_sort, ASSET_DATA_JOIN};
use crate::application::query::{
    ArgSpec, AttributeFilter, FilterSchema, ListQuery, QueryBuilder, RequestParams,
};
use crate::application::validation::{pagination, paging_schema, sort_order};
use crate::domain::value_objects::SortOrder;

static LIST_ASSETS_SCHEMA: Lazy<FilterSchema> = Lazy::new(|| {
    FilterSchema::merge([
        &paging_schema(SortOrder::Desc),
        &FilterSchema::new().arg("sort", ArgSpec::string().min(1.0).max(80.0)),
        &*ASSET_FILTER_SCHEMA,
        &*ASSET_EXTRA_SCHEMA,
        &*MINT_SCHEMA,
        &*COLLECTION_GREYLIST_SCHEMA,
        &*BOUNDARY_SCHEMA,
    ])
});

const ASSET_BASE: &str = "SELECT asset.asset_id FROM atomicassets_assets asset \
    LEFT JOIN atomicassets_templates \"template\" ON (asset.contract = \"template\".contract AND asset.template_id = \"template\".template_id) \
    LEFT JOIN atomicassets_asset_mints mint ON (asset.contract = mint.contract AND asset.asset_id = mint.asset_id)";

const TABLES: AssetTables = AssetTables {
    asset: "asset",
    template: "\"template\"",
};

/// Use case: filtered, sorted and paginated asset list (and its count)
pub struct ListAssetsUseCase {
    executor: Arc<dyn QueryExecutor>,
    filler: Arc<ResultFiller>,
    max_limit: i64,
}

impl ListAssetsUseCase {
    pub fn new(executor: Arc<dyn QueryExecutor>, filler: Arc<ResultFiller>, max_limit: i64) -> Self {
        Self {
            executor,
            filler,
            max_limit,
        }
    }

    /// Validate `params` and compose the filtered statement. Nothing is
    /// built when any parameter is invalid.
    pub fn build_query(&self, params: &RequestParams) -> Result<ListQuery, UseCaseError> {
        let args = LIST_ASSETS_SCHEMA.parse(params)?;
        let attributes = AttributeFilter::parse(params)?;
        let sort = resolve_asset_sort(args.str("sort"))?;
        let order = sort_order(&args)?;
        let pagination = pagination(&args, self.max_limit)?;

        let mut base = ASSET_BASE.to_string();
        if sort.requires_data_join() {
            base.push(' ');
            base.push_str(ASSET_DATA_JOIN);
        }

        let mut query = QueryBuilder::new(base);
        query.equal("asset.contract", self.filler.assets_contract());

        build_asset_extras(&args, &mut query, TABLES.asset);
        build_mint_filter(&args, &mut query, Some("mint"));
        build_asset_filter(&args, &mut query, TABLES);
        attributes.build(&mut query, TABLES.asset);
        build_greylist_filter(&args, &mut query, "asset.collection_name");

        let by_update = args.str("sort") == Some("updated");
        build_boundary_filter(
            &args,
            &mut query,
            BoundaryColumns {
                primary: "asset.asset_id",
                time: Some(if by_update { "asset.updated_at_time" } else { "asset.minted_at_time" }),
                block: Some(if by_update { "asset.updated_at_block" } else { "asset.minted_at_block" }),
            },
        );

        Ok(ListQuery {
            filtered: query,
            sort,
            order,
            tie_breaker: "asset.asset_id",
            ignore_index: has_asset_filter(&args) || !attributes.is_empty(),
            pagination,
        })
    }

    pub async fn execute(&self, params: &RequestParams) -> Result<Vec<Filled<AssetRecord>>, UseCaseError> {
        let query = self.build_query(params)?.into_page_query();
        let ids = self
            .executor
            .fetch_ids(&query.build_string(), query.build_values())
            .await?;

        Ok(self.filler.fill_assets(&ids).await?)
    }

    pub async fn count(&self, params: &RequestParams) -> Result<i64, UseCaseError> {
        let query = self.build_query(params)?;

        Ok(self
            .executor
            .fetch_count(&query.count_statement(), query.filtered.build_values())
            .await?)
    }
}
