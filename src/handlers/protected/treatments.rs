use async_trait::async_trait;

use crate::database::models::{Treatment, TreatmentInput};
use crate::database::{Record, Required};
use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::state::AppState;

use super::resource::Resource;

pub struct Treatments;

#[async_trait]
impl Resource for Treatments {
    const TABLE: &'static str = "Treatments";
    const NAME: &'static str = "Treatment";

    type Row = Treatment;
    type Input = TreatmentInput;

    async fn prepare(_state: &AppState, _user: &AuthUser, input: TreatmentInput) -> Result<Record, ApiError> {
        Required::new()
            .text("Type", &input.kind)
            .value("AnimalId", &input.animal_id)
            .check()?;

        Ok(Record::new()
            .set("Type", input.kind)
            .set("Description", input.description)
            .set("AnimalId", input.animal_id))
    }
}
