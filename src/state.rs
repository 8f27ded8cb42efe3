use std::sync::Arc;

use crate::auth::TokenService;
use crate::config::AppConfig;
use crate::database::DatabaseManager;

/// Shared, read-only application state cloned into every handler
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub tokens: Arc<TokenService>,
    pub db: DatabaseManager,
}

impl AppState {
    pub fn new(config: AppConfig, jwt_secret: &str, db: DatabaseManager) -> Self {
        let tokens = TokenService::new(jwt_secret, config.security.jwt_expiry_hours);
        Self {
            config: Arc::new(config),
            tokens: Arc::new(tokens),
            db,
        }
    }
}
