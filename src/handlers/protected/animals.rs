// handlers/protected/animals.rs - /api/animals, scoped to the caller's animals

use async_trait::async_trait;

use crate::database::models::{Animal, AnimalInput};
use crate::database::{Record, Required};
use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::state::AppState;

use super::resource::Resource;

pub struct Animals;

#[async_trait]
impl Resource for Animals {
    const TABLE: &'static str = "Animals";
    const NAME: &'static str = "Animal";
    const OWNER_COLUMN: Option<&'static str> = Some("UserId");
    const AUDITED: bool = true;

    type Row = Animal;
    type Input = AnimalInput;

    async fn prepare(_state: &AppState, _user: &AuthUser, input: AnimalInput) -> Result<Record, ApiError> {
        Required::new()
            .text("Name", &input.name)
            .text("Type", &input.kind)
            .check()?;

        Ok(Record::new()
            .set("Name", input.name)
            .set("Type", input.kind)
            .set("Breed", input.breed)
            .set("Age", input.age)
            .set("Weight", input.weight)
            .set("Description", input.description)
            .set("PhotoURL", input.photo_url))
    }
}
