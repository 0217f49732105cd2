pub mod identity;
pub mod password;
pub mod session;

pub use identity::Identity;
pub use password::{hash_password, verify_password};
pub use session::SessionStore;
