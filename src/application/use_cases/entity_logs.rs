use std::sync::Arc;

use crate::application::errors::UseCaseError;
use crate::application::ports::{LogQuery, LogRepository};
use crate::application::query::greylist::{apply_action_greylist, ACTION_GREYLIST_SCHEMA};
use crate::application::query::{FilterSchema, RequestParams};
use crate::application::validation::{pagination, paging_schema, parse_id, sort_order};
use crate::domain::entities::ActionLog;
use crate::domain::value_objects::SortOrder;

pub const SALE_ACTIONS: &[&str] = &["lognewsale", "logsalestart", "cancelsale", "purchasesale"];

const LOG_MAX_LIMIT: i64 = 100;

/// Use case: paginated action log for one asset or sale
pub struct EntityLogsUseCase {
    log_repo: Arc<dyn LogRepository>,
    contract: String,
    relation_name: &'static str,
    /// Action names subject to `action_whitelist`/`action_blacklist`
    actions: Option<&'static [&'static str]>,
    schema: FilterSchema,
}

impl EntityLogsUseCase {
    pub fn new(
        log_repo: Arc<dyn LogRepository>,
        contract: impl Into<String>,
        relation_name: &'static str,
        actions: Option<&'static [&'static str]>,
    ) -> Self {
        let mut schema = paging_schema(SortOrder::Asc);
        if actions.is_some() {
            schema = FilterSchema::merge([&schema, &*ACTION_GREYLIST_SCHEMA]);
        }

        Self {
            log_repo,
            contract: contract.into(),
            relation_name,
            actions,
            schema,
        }
    }

    pub async fn execute(&self, id: &str, params: &RequestParams) -> Result<Vec<ActionLog>, UseCaseError> {
        let relation_id = parse_id(&format!("{}_id", self.relation_name), id)?;
        let args = self.schema.parse(params)?;

        let query = LogQuery {
            contract: self.contract.clone(),
            relation_name: self.relation_name,
            relation_id,
            actions: self.actions.map(|actions| apply_action_greylist(actions, &args)),
            pagination: pagination(&args, LOG_MAX_LIMIT)?,
            order: sort_order(&args)?,
        };

        Ok(self.log_repo.fetch_logs(&query).await?)
    }
}
