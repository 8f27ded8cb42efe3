// handlers/protected/mod.rs - handlers behind the auth gate (/api/*)
//
// Every entity is a `Resource`; `resource::routes` mounts its five CRUD routes.

pub mod animals;
pub mod logs;
pub mod medical_records;
pub mod resource;
pub mod roles;
pub mod smart_devices;
pub mod state_records;
pub mod treatments;
pub mod users;

pub use animals::Animals;
pub use logs::Logs;
pub use medical_records::MedicalRecords;
pub use resource::Resource;
pub use roles::Roles;
pub use smart_devices::SmartDevices;
pub use state_records::StateRecords;
pub use treatments::Treatments;
pub use users::Users;
