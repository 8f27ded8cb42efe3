// handlers/public/mod.rs - Public handlers (no authentication required)
//
// Listed in the auth gate's public paths. Handlers here never receive an AuthUser.

pub mod auth;
pub mod docs;

pub use auth::*;
pub use docs::docs_get;
