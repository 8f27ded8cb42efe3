// database/models - row and request body types, one file per table
//
// Rows derive FromRow + Serialize so a `SELECT *` maps straight to the JSON
// returned to clients. Inputs are all-optional so missing fields surface as
// validation errors instead of deserialization failures.

pub mod animal;
pub mod log;
pub mod medical_record;
pub mod role;
pub mod smart_device;
pub mod state_record;
pub mod treatment;
pub mod user;

pub use animal::{Animal, AnimalInput};
pub use log::{Log, LogInput};
pub use medical_record::{MedicalRecord, MedicalRecordInput};
pub use role::{Role, RoleInput};
pub use smart_device::{SmartDevice, SmartDeviceInput};
pub use state_record::{StateRecord, StateRecordInput};
pub use treatment::{Treatment, TreatmentInput};
pub use user::{LoginInput, User, UserInput, UserStatus, UserView};
