// handlers/protected/users.rs - /api/users, administrator account management
//
// Registration and login live under handlers/public/auth.

use async_trait::async_trait;

use crate::auth::password::hash_password;
use crate::database::models::{UserInput, UserView};
use crate::database::{Record, Required};
use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::state::AppState;
use crate::types::Operation;

use super::resource::Resource;

pub struct Users;

#[async_trait]
impl Resource for Users {
    const TABLE: &'static str = "Users";
    const NAME: &'static str = "User";
    const AUDITED: bool = true;

    type Row = UserView;
    type Input = UserInput;

    fn authorize(_op: Operation, user: &AuthUser) -> Result<(), ApiError> {
        user.require_privileged()
    }

    async fn prepare(state: &AppState, _user: &AuthUser, input: UserInput) -> Result<Record, ApiError> {
        Required::new()
            .text("Name", &input.name)
            .text("Email", &input.email)
            .text("Password", &input.password)
            .value("RoleId", &input.role_id)
            .check()?;

        let password = input.password.unwrap_or_default();
        let hash = hash_password(&password, state.config.security.bcrypt_cost).await?;

        Ok(Record::new()
            .set("Name", input.name)
            .set("Email", input.email.map(|email| email.trim().to_string()))
            .set("Password", hash)
            .set("RoleId", input.role_id))
    }
}
