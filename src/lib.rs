//! Rapier Auth - authentication and company membership service
//!
//! This library provides user accounts with role-based access, signed
//! bearer tokens, and a many-to-many membership between users and companies,
//! guarded by a single access control gate.

pub mod auth;
pub mod config;
pub mod constants;
pub mod error;
pub mod handlers;
pub mod security;
pub mod services;
pub mod storage;

// Re-export main components
pub use config::AppConfig;
pub use error::{RapierError, Result};
pub use services::AccessGate;
