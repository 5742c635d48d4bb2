//! Business services: identity and membership stores, and the access gate in front of them

pub mod gate;
pub mod identity;
pub mod membership;

// Re-export main components
pub use gate::{AccessGate, AccessToken};
pub use identity::IdentityService;
pub use membership::{CompanyUpdate, CompanyWithMembers, MembershipService, NewCompany};
