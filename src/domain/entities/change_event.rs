use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Block that produced a change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockRef {
    pub block_num: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_id: Option<String>,
}

/// Transaction that produced a change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRef {
    pub id: String,
}

/// Change event published by the indexer for one resource channel.
///
/// `data` carries the entity identifiers plus advisory inline state. The
/// inline state may be stale by the time it is consumed; subscribers re-read
/// the store instead of trusting it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeEvent {
    pub action: String,
    #[serde(default)]
    pub transaction: Option<TransactionRef>,
    #[serde(default)]
    pub block: Option<BlockRef>,
    #[serde(default)]
    pub data: Value,
}

impl ChangeEvent {
    /// Numeric entity identifier stored under `key`, accepting both JSON
    /// numbers and decimal strings (64-bit chain ids do not fit in a double).
    pub fn identifier(&self, key: &str) -> Option<i64> {
        match self.data.get(key)? {
            Value::Number(n) => n.as_i64(),
            Value::String(s) => s.parse().ok(),
            _ => None,
        }
    }

    pub fn payload_field(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }
}

/// Upstream chain reorganization notice. Carries no entity identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForkEvent {
    pub block_num: u64,
}
