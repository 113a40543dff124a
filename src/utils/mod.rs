pub mod auth;

pub use auth::{parse_user_id, verify_password, Claims, JwtKeys};
