use once_cell::sync::Lazy;

use super::args::{ArgSpec, FilterArgs, FilterSchema};
use super::asset_filter::{build_asset_filter, AssetTables};
use super::attribute::AttributeFilter;
use super::builder::QueryBuilder;
use crate::domain::value_objects::{SaleApiState, OFFER_STATE_PENDING};

pub static LISTING_SCHEMA: Lazy<FilterSchema> = Lazy::new(|| {
    FilterSchema::new()
        .arg("state", ArgSpec::list().values(SaleApiState::VALUES))
        .arg("seller", ArgSpec::list().min(1.0).max(12.0))
        .arg("buyer", ArgSpec::list().min(1.0).max(12.0))
        .arg("maker_marketplace", ArgSpec::list().min(1.0).max(12.0))
        .arg("taker_marketplace", ArgSpec::list().min(1.0).max(12.0))
        .arg("symbol", ArgSpec::string().min(1.0).max(7.0))
        .arg("min_price", ArgSpec::float().min(0.0))
        .arg("max_price", ArgSpec::float().min(0.0))
        .arg("collection_name", ArgSpec::list().min(1.0).max(12.0))
});

/// Parameters whose predicates cannot use the sale ordering indexes.
const LISTING_FILTER_PARAMS: [&str; 6] = [
    "seller",
    "buyer",
    "maker_marketplace",
    "taker_marketplace",
    "min_price",
    "max_price",
];

/// Offer assets with their template, correlated to the outer `offer` alias.
const OFFER_ASSETS_TABLES: AssetTables = AssetTables {
    asset: "asset",
    template: "\"template\"",
};

pub fn has_listing_filter(args: &FilterArgs) -> bool {
    LISTING_FILTER_PARAMS.iter().any(|name| args.contains(name))
}

fn state_condition(state: SaleApiState) -> String {
    let stored = state.stored() as i16;
    match state {
        SaleApiState::Listed => format!(
            "(listing.state = {} AND offer.state = {})",
            stored, OFFER_STATE_PENDING
        ),
        SaleApiState::Invalid => format!(
            "(listing.state = {} AND offer.state != {})",
            stored, OFFER_STATE_PENDING
        ),
        _ => format!("listing.state = {}", stored),
    }
}

/// Listing conditions over `listing` (sales), `offer` and `price` aliases.
///
/// Asset and attribute conditions are evaluated against the offer's assets
/// in a single correlated `EXISTS`.
pub fn build_sale_filter(
    args: &FilterArgs,
    attributes: &AttributeFilter,
    query: &mut QueryBuilder,
) {
    if let Some(states) = args.list("state") {
        let conditions: Vec<String> = states
            .iter()
            .filter_map(|s| s.parse::<SaleApiState>().ok())
            .map(state_condition)
            .collect();

        if !conditions.is_empty() {
            query.add_condition(format!("({})", conditions.join(" OR ")));
        }
    }

    for (param, column) in [
        ("seller", "listing.seller"),
        ("buyer", "listing.buyer"),
        ("maker_marketplace", "listing.maker_marketplace"),
        ("taker_marketplace", "listing.taker_marketplace"),
        ("collection_name", "listing.collection_name"),
    ] {
        if let Some(values) = args.list(param) {
            query.equal_many(column, values);
        }
    }

    if let Some(symbol) = args.str("symbol") {
        query.equal("listing.settlement_symbol", symbol);
    }

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

    let inner = query.scoped(|q| {
        build_asset_filter(args, q, OFFER_ASSETS_TABLES);
        attributes.build(q, OFFER_ASSETS_TABLES.asset);
    });

    if let Some(inner) = inner {
        query.add_condition(format!(
            "EXISTS (SELECT * FROM atomicassets_offers_assets offer_asset \
             JOIN atomicassets_assets asset ON (asset.contract = offer_asset.contract AND asset.asset_id = offer_asset.asset_id) \
             LEFT JOIN atomicassets_templates \"template\" ON (\"template\".contract = asset.contract AND \"template\".template_id = asset.template_id) \
             WHERE offer_asset.contract = offer.contract AND offer_asset.offer_id = offer.offer_id AND {})",
            inner
        ));
    }
}
