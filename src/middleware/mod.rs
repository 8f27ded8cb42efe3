pub mod activity;
pub mod auth;
pub mod extract;
pub mod response;
pub mod validate_user;

pub use activity::activity_middleware;
pub use auth::{auth_gate_middleware, is_public_path, AuthUser};
pub use extract::{parse_json, parse_json_or_default, ApiJson, ApiPath};
pub use response::{ApiResponse, ApiResult, Created};
pub use validate_user::validate_user;
