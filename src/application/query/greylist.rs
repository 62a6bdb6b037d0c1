use once_cell::sync::Lazy;

use super::args::{ArgSpec, FilterArgs, FilterSchema};
use super::builder::QueryBuilder;

pub static COLLECTION_GREYLIST_SCHEMA: Lazy<FilterSchema> = Lazy::new(|| {
    FilterSchema::new()
        .arg("collection_whitelist", ArgSpec::list().min(1.0).max(12.0))
        .arg("collection_blacklist", ArgSpec::list().min(1.0).max(12.0))
});

pub static ACTION_GREYLIST_SCHEMA: Lazy<FilterSchema> = Lazy::new(|| {
    FilterSchema::new()
        .arg("action_whitelist", ArgSpec::list().min(1.0).max(12.0))
        .arg("action_blacklist", ArgSpec::list().min(1.0).max(12.0))
});

/// Allow/deny list over `column`.
///
/// A present allow-list suppresses the deny-list entirely.
pub fn build_greylist_filter(args: &FilterArgs, query: &mut QueryBuilder, column: &str) {
    if let Some(whitelist) = args.list("collection_whitelist") {
        query.equal_many(column, whitelist);
    } else if let Some(blacklist) = args.list("collection_blacklist") {
        query.not_equal_many(column, blacklist);
    }
}

/// The same precedence applied to an in-memory set of action names.
pub fn apply_action_greylist(actions: &[&str], args: &FilterArgs) -> Vec<String> {
    let allowed = |action: &str| {
        if let Some(whitelist) = args.list("action_whitelist") {
            whitelist.iter().any(|w| w == action)
        } else if let Some(blacklist) = args.list("action_blacklist") {
            !blacklist.iter().any(|b| b == action)
        } else {
            true
        }
    };

    actions
        .iter()
        .copied()
        .filter(|action| allowed(action))
        .map(str::to_string)
        .collect()
}
