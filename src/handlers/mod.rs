// handlers/mod.rs - three security tiers
//
// Public (no auth) → Protected (JWT + live user check) → Elevated (admin role)

pub mod elevated;
pub mod protected;
pub mod public;
