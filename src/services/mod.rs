pub mod admin_service;
pub mod audit;

pub use admin_service::{AdminError, AdminService, UserStatistics};
