use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::entities::ForkEvent;

/// Server-pushed socket message, sent as a JSON text frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerMessage {
    pub event: String,
    pub data: Value,
}

impl ServerMessage {
    pub const FORK: &'static str = "fork";

    pub fn new(event: &str, data: Value) -> Self {
        Self {
            event: event.to_string(),
            data,
        }
    }

    pub fn fork(event: ForkEvent) -> Self {
        Self::new(Self::FORK, serde_json::json!({ "block_num": event.block_num }))
    }

    pub fn to_text(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
