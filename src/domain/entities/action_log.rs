use serde::Serialize;
use serde_json::Value;

/// One contract action recorded against an entity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActionLog {
    pub log_id: String,
    pub name: String,
    pub data: Value,
    pub txid: String,
    pub created_at_block: String,
    pub created_at_time: String,
}
