use serde_json::Value;

/// Authoritative asset state as read from the store.
///
/// Block numbers and timestamps (unix milliseconds) are kept numeric here;
/// the public record formats them.
#[derive(Debug, Clone, PartialEq)]
pub struct Asset {
    pub contract: String,
    pub asset_id: i64,
    pub owner: Option<String>,
    pub collection_name: String,
    pub schema_name: String,
    pub template_id: Option<i64>,
    pub mutable_data: Value,
    pub immutable_data: Value,
    pub template_immutable_data: Option<Value>,
    pub is_transferable: Option<bool>,
    pub is_burnable: Option<bool>,
    pub template_mint: Option<i64>,
    pub schema_mint: Option<i64>,
    pub collection_mint: Option<i64>,
    pub burned_by_account: Option<String>,
    pub burned_at_block: Option<i64>,
    pub burned_at_time: Option<i64>,
    pub updated_at_block: i64,
    pub updated_at_time: i64,
    pub minted_at_block: i64,
    pub minted_at_time: i64,
}

impl Asset {
    /// Merged attribute view: template immutable data, then asset immutable
    /// data, then mutable data. Later layers win on key collisions.
    pub fn merged_data(&self) -> Value {
        let mut merged = serde_json::Map::new();

        let layers = [
            self.template_immutable_data.as_ref(),
            Some(&self.immutable_data),
            Some(&self.mutable_data),
        ];

        for layer in layers.into_iter().flatten() {
            if let Value::Object(map) = layer {
                for (key, value) in map {
                    merged.insert(key.clone(), value.clone());
                }
            }
        }

        Value::Object(merged)
    }

    pub fn is_burned(&self) -> bool {
        self.owner.is_none()
    }
}

#[cfg(test)]
mod tests {
    use crate::test_support::sample_asset;

    #[test]
    fn test_merged_data_layering() {
        let asset = sample_asset(1);
        let data = asset.merged_data();

        assert_eq!(data["name"], "override");
        assert_eq!(data["rarity"], "rare");
        assert_eq!(data["level"], 3);
    }

    #[test]
    fn test_is_burned() {
        let mut asset = sample_asset(1);
        assert!(!asset.is_burned());

        asset.owner = None;
        assert!(asset.is_burned());
    }
}
