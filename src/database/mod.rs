pub mod manager;
pub mod models;
pub mod query_builder;
pub mod record;
pub mod repository;
pub mod schema;

pub use manager::{DatabaseError, DatabaseManager};
pub use record::{Record, RecordError, Required};
pub use repository::{OwnerScope, Repository};
