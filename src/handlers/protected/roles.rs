use async_trait::async_trait;

use crate::auth::PRIVILEGED_ROLE_ID;
use crate::database::models::{Role, RoleInput};
use crate::database::{Record, Required};
use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::state::AppState;
use crate::types::Operation;

use super::resource::Resource;

/// /api/roles. Readable by everyone, writable by admins; the admin role itself is fixed.
pub struct Roles;

#[async_trait]
impl Resource for Roles {
    const TABLE: &'static str = "Roles";
    const NAME: &'static str = "Role";

    type Row = Role;
    type Input = RoleInput;

    fn authorize(op: Operation, user: &AuthUser) -> Result<(), ApiError> {
        if op.is_write() {
            user.require_privileged()?;
        }
        Ok(())
    }

    fn check_target(op: Operation, id: i64) -> Result<(), ApiError> {
        if op.is_write() && id == PRIVILEGED_ROLE_ID {
            return Err(ApiError::forbidden("Forbidden: the admin role cannot be modified"));
        }
        Ok(())
    }

    async fn prepare(_state: &AppState, _user: &AuthUser, input: RoleInput) -> Result<Record, ApiError> {
        Required::new().text("Name", &input.name).check()?;
        Ok(Record::new().set("Name", input.name))
    }
}
