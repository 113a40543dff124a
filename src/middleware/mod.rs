pub mod access_gate;
pub mod session;

pub use access_gate::access_gate;
pub use session::{Session, AUTH_COOKIE};
