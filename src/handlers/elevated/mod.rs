// handlers/elevated/mod.rs - Administrator handlers (/api/admin/*)
//
// Behind the auth gate like protected handlers; each handler additionally
// requires the privileged role before touching storage.

pub mod admin;

pub use admin::{block_post, statistics_get, unblock_post};
