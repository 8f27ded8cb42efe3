// handlers/public/auth/mod.rs - token acquisition endpoints (no authentication)

pub mod login;    // POST /api/users/login - verify credentials and issue a JWT
pub mod register; // POST /api/users/register - create an account

pub use login::login_post;
pub use register::register_post;
