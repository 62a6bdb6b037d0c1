use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};

use super::channel::{ChannelHandler, HandlerOutcome};
use super::messages::ServerMessage;
use crate::application::format::format_asset;
use crate::application::ports::{AssetRepository, RepositoryError};
use crate::domain::entities::ChangeEvent;

/// Maps atomicassets asset actions to socket messages.
pub struct AssetEventHandler {
    asset_repo: Arc<dyn AssetRepository>,
    contract: String,
}

impl AssetEventHandler {
    pub fn new(asset_repo: Arc<dyn AssetRepository>, contract: impl Into<String>) -> Self {
        Self {
            asset_repo,
            contract: contract.into(),
        }
    }

    fn message_name(action: &str) -> Option<&'static str> {
        match action {
            "mint" => Some("new_asset"),
            "burn" => Some("burn"),
            "back" => Some("back"),
            "update" => Some("update"),
            _ => None,
        }
    }
}

#[async_trait]
impl ChannelHandler for AssetEventHandler {
    async fn handle(&self, event: &ChangeEvent) -> Result<HandlerOutcome, RepositoryError> {
        let Some(name) = Self::message_name(&event.action) else {
            return Ok(HandlerOutcome::Ignored);
        };

        let Some(asset_id) = event.identifier("asset_id") else {
            return Ok(HandlerOutcome::Malformed("missing asset_id".to_string()));
        };

        let assets = self.asset_repo.fetch_by_ids(&self.contract, &[asset_id]).await?;
        let Some(asset) = assets.into_iter().find(|a| a.asset_id == asset_id) else {
            return Ok(HandlerOutcome::Missing(asset_id));
        };

        let mut data = json!({
            "transaction": event.transaction,
            "block": event.block,
            "asset": format_asset(&asset),
        });

        let extra = match name {
            "back" => Some("trace"),
            "update" => Some("delta"),
            _ => None,
        };
        if let (Some(key), Value::Object(map)) = (extra, &mut data) {
            map.insert(
                key.to_string(),
                event.payload_field(key).cloned().unwrap_or(Value::Null),
            );
        }

        Ok(HandlerOutcome::Emit(ServerMessage::new(name, data)))
    }
}
