use async_trait::async_trait;

use crate::database::models::{SmartDevice, SmartDeviceInput};
use crate::database::{Record, Required};
use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::state::AppState;

use super::resource::Resource;

/// /api/smart-devices, scoped to the user who registered the device
pub struct SmartDevices;

#[async_trait]
impl Resource for SmartDevices {
    const TABLE: &'static str = "SmartDevices";
    const NAME: &'static str = "SmartDevice";
    const OWNER_COLUMN: Option<&'static str> = Some("UserId");

    type Row = SmartDevice;
    type Input = SmartDeviceInput;

    async fn prepare(_state: &AppState, _user: &AuthUser, input: SmartDeviceInput) -> Result<Record, ApiError> {
        Required::new()
            .text("DeviceGuid", &input.device_guid)
            .value("AnimalId", &input.animal_id)
            .check()?;

        Ok(Record::new()
            .set("DeviceGuid", input.device_guid.map(|guid| guid.trim().to_string()))
            .set("AnimalId", input.animal_id))
    }
}
