use async_trait::async_trait;

use crate::database::models::{Log, LogInput};
use crate::database::{Record, Required};
use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::services::audit::{timestamp, LOGS_ORDER, LOGS_TABLE};
use crate::state::AppState;
use crate::types::Operation;

use super::resource::Resource;

/// /api/logs. Any user may append; only admins read; nothing is ever rewritten.
pub struct Logs;

#[async_trait]
impl Resource for Logs {
    const TABLE: &'static str = LOGS_TABLE;
    const NAME: &'static str = "Log";
    const ORDER_BY: &'static str = LOGS_ORDER;

    type Row = Log;
    type Input = LogInput;

    fn authorize(op: Operation, user: &AuthUser) -> Result<(), ApiError> {
        match op {
            Operation::Create => Ok(()),
            Operation::List | Operation::Get => user.require_privileged(),
            Operation::Update | Operation::Delete => Err(ApiError::forbidden("Forbidden: logs are append-only")),
        }
    }

    async fn prepare(_state: &AppState, user: &AuthUser, input: LogInput) -> Result<Record, ApiError> {
        Required::new().text("Action", &input.action).check()?;

        Ok(Record::new()
            .set("Action", input.action)
            .set("Timestamp", timestamp())
            .set("UserId", user.user_id))
    }
}
