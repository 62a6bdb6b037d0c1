use once_cell::sync::Lazy;

use super::args::{ArgSpec, FilterArgs, FilterSchema};
use super::builder::QueryBuilder;

/// Parameters that narrow the asset set itself.
pub static ASSET_FILTER_SCHEMA: Lazy<FilterSchema> = Lazy::new(|| {
    FilterSchema::new()
        .arg("owner", ArgSpec::list().min(1.0).max(12.0))
        .arg("template_id", ArgSpec::int_list().min(0.0))
        .arg("collection_name", ArgSpec::list().min(1.0).max(12.0))
        .arg("schema_name", ArgSpec::list().min(1.0).max(12.0))
        .arg("burned", ArgSpec::bool())
        .arg("is_transferable", ArgSpec::bool())
        .arg("is_burnable", ArgSpec::bool())
        .arg("match", ArgSpec::string().min(1.0).max(256.0))
});

/// Parameters only the asset list endpoints accept.
pub static ASSET_EXTRA_SCHEMA: Lazy<FilterSchema> = Lazy::new(|| {
    FilterSchema::new()
        .arg("authorized_account", ArgSpec::string().min(1.0).max(12.0))
        .arg("only_duplicate_templates", ArgSpec::bool())
        .arg("hide_offers", ArgSpec::bool())
});

/// Aliases under which the asset and its template are joined.
#[derive(Debug, Clone, Copy)]
pub struct AssetTables {
    pub asset: &'static str,
    pub template: &'static str,
}

pub fn has_asset_filter(args: &FilterArgs) -> bool {
    ASSET_FILTER_SCHEMA.names().any(|name| args.contains(name))
}

pub fn build_asset_filter(args: &FilterArgs, query: &mut QueryBuilder, tables: AssetTables) {
    let AssetTables { asset, template } = tables;

    if let Some(owners) = args.list("owner") {
        query.equal_many(&format!("{}.owner", asset), owners);
    }

    if let Some(template_ids) = args.int_list("template_id") {
        query.equal_many(&format!("{}.template_id", asset), template_ids.to_vec());
    }

    if let Some(collections) = args.list("collection_name") {
        query.equal_many(&format!("{}.collection_name", asset), collections);
    }

    if let Some(schemas) = args.list("schema_name") {
        query.equal_many(&format!("{}.schema_name", asset), schemas);
    }

    match args.bool("burned") {
        Some(true) => {
            query.add_condition(format!("{}.owner IS NULL", asset));
        }
        Some(false) => {
            query.add_condition(format!("{}.owner IS NOT NULL", asset));
        }
        None => {}
    }

    for flag in ["is_transferable", "is_burnable"] {
        match args.bool(flag) {
            Some(true) => {
                query.add_condition(format!(
                    "({t}.{f} IS DISTINCT FROM FALSE)",
                    t = template,
                    f = flag
                ));
            }
            Some(false) => {
                query.add_condition(format!("{}.{} = FALSE", template, flag));
            }
            None => {}
        }
    }

    if let Some(pattern) = args.str("match") {
        let placeholder = query.add_variable(format!("%{}%", escape_like(pattern)));
        query.add_condition(format!(
            "{}.immutable_data->>'name' ILIKE {}",
            template, placeholder
        ));
    }
}

/// Collection authorization, duplicate-template and open-offer conditions.
pub fn build_asset_extras(args: &FilterArgs, query: &mut QueryBuilder, asset_table: &str) {
    if let Some(account) = args.str("authorized_account") {
        let placeholder = query.add_variable(account);
        query.add_condition(format!(
            "EXISTS (SELECT * FROM atomicassets_collections collection \
             WHERE collection.contract = {a}.contract AND collection.collection_name = {a}.collection_name \
             AND {p} = ANY(collection.authorized_accounts))",
            a = asset_table,
            p = placeholder
        ));
    }

    if args.bool("only_duplicate_templates") == Some(true) {
        query.add_condition(format!(
            "EXISTS (SELECT * FROM atomicassets_assets inner_asset \
             WHERE inner_asset.contract = {a}.contract AND inner_asset.template_id = {a}.template_id \
             AND inner_asset.asset_id < {a}.asset_id AND inner_asset.owner = {a}.owner) \
             AND {a}.template_id IS NOT NULL",
            a = asset_table
        ));
    }

    if args.bool("hide_offers") == Some(true) {
        query.add_condition(format!(
            "NOT EXISTS (SELECT * FROM atomicassets_offers offer, atomicassets_offers_assets offer_asset \
             WHERE offer_asset.contract = {a}.contract AND offer_asset.asset_id = {a}.asset_id \
             AND offer.contract = offer_asset.contract AND offer.offer_id = offer_asset.offer_id \
             AND offer.state = {pending})",
            a = asset_table,
            pending = crate::domain::value_objects::OFFER_STATE_PENDING
        ));
    }
}

fn escape_like(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
