use async_trait::async_trait;

use crate::database::models::{StateRecord, StateRecordInput};
use crate::database::{Record, Required};
use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::state::AppState;

use super::resource::Resource;

pub struct StateRecords;

#[async_trait]
impl Resource for StateRecords {
    const TABLE: &'static str = "StateRecords";
    const NAME: &'static str = "StateRecord";

    type Row = StateRecord;
    type Input = StateRecordInput;

    async fn prepare(_state: &AppState, user: &AuthUser, input: StateRecordInput) -> Result<Record, ApiError> {
        Required::new()
            .text("Date", &input.date)
            .text("State", &input.state)
            .value("AnimalId", &input.animal_id)
            .check()?;

        Ok(Record::new()
            .set("Date", input.date)
            .set("State", input.state)
            .set("Severity", input.severity)
            .set("AnimalId", input.animal_id)
            .set("UserId", user.user_id))
    }
}
