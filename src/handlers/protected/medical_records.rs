use async_trait::async_trait;

use crate::database::models::{MedicalRecord, MedicalRecordInput};
use crate::database::{Record, Required};
use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::state::AppState;

use super::resource::Resource;

/// /api/medical-records. Shared across users; `UserId` records who wrote the entry.
pub struct MedicalRecords;

#[async_trait]
impl Resource for MedicalRecords {
    const TABLE: &'static str = "MedicalRecords";
    const NAME: &'static str = "MedicalRecord";

    type Row = MedicalRecord;
    type Input = MedicalRecordInput;

    async fn prepare(_state: &AppState, user: &AuthUser, input: MedicalRecordInput) -> Result<Record, ApiError> {
        Required::new()
            .text("Date", &input.date)
            .text("Procedure", &input.procedure)
            .value("AnimalId", &input.animal_id)
            .check()?;

        Ok(Record::new()
            .set("Date", input.date)
            .set("Procedure", input.procedure)
            .set("Notes", input.notes)
            .set("AnimalId", input.animal_id)
            .set("UserId", user.user_id))
    }
}
