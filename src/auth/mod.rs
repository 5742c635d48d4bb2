//! Authentication and authorization module

pub mod password;
pub mod policy;
pub mod token;
pub mod user;

// Re-export main components
pub use password::{hash_password, verify_password};
pub use policy::{authorize, Operation, Resource};
pub use token::{extract_bearer_token, Claims, TokenManager};
pub use user::{NewUser, User, UserRole, UserUpdate};
