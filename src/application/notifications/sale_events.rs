use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};

use super::channel::{ChannelHandler, HandlerOutcome};
use super::messages::ServerMessage;
use crate::application::filler::{Filled, ResultFiller};
use crate::application::ports::RepositoryError;
use crate::domain::entities::ChangeEvent;

/// Maps atomicmarket sale log actions to socket messages. Sales are resolved
/// through the same filler as the REST listing.
pub struct SaleEventHandler {
    filler: Arc<ResultFiller>,
}

impl SaleEventHandler {
    pub fn new(filler: Arc<ResultFiller>) -> Self {
        Self { filler }
    }

    fn message_name(action: &str) -> Option<&'static str> {
        match action {
            "lognewsale" => Some("new_sale"),
            "logsalestart" => Some("sale_start"),
            "cancelsale" => Some("sale_cancel"),
            "purchasesale" => Some("sale_purchase"),
            _ => None,
        }
    }
}

#[async_trait]
impl ChannelHandler for SaleEventHandler {
    async fn handle(&self, event: &ChangeEvent) -> Result<HandlerOutcome, RepositoryError> {
        let Some(name) = Self::message_name(&event.action) else {
            return Ok(HandlerOutcome::Ignored);
        };

        let Some(sale_id) = event.identifier("sale_id") else {
            return Ok(HandlerOutcome::Malformed("missing sale_id".to_string()));
        };

        let sale = match self.filler.fill_sales(&[sale_id]).await?.pop() {
            Some(Filled::Found(sale)) => sale,
            _ => return Ok(HandlerOutcome::Missing(sale_id)),
        };

        let mut data = json!({
            "transaction": event.transaction,
            "block": event.block,
            "sale_id": sale_id.to_string(),
            "sale": sale,
        });

        if let (Some(trace), Value::Object(map)) = (event.payload_field("trace"), &mut data) {
            map.insert("trace".to_string(), trace.clone());
        }

        Ok(HandlerOutcome::Emit(ServerMessage::new(name, data)))
    }
}
