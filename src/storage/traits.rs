//! Abstract storage interfaces for pluggable backends
//!
//! Backends must enforce the uniqueness invariants themselves (email,
//! username, membership pair) and apply every call atomically. Service-level
//! pre-checks exist for friendlier errors, not for correctness.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::auth::user::UserRole;
use crate::error::Result;

/// User record as persisted, including the password hash
#[derive(Debug, Clone, PartialEq)]
pub struct StoredUser {
    pub id: String,
    pub email: String,
    pub username: String,
    pub password_hash: String,
    pub full_name: Option<String>,
    pub is_active: bool,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
}

/// Company record as persisted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Company {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Field changes for one user, applied under the storage lock.
/// `None` leaves the stored field untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserChanges {
    pub email: Option<String>,
    pub username: Option<String>,
    /// Already hashed; hashing never happens while the lock is held
    pub password_hash: Option<String>,
    /// `Some(None)` clears the display name
    pub full_name: Option<Option<String>>,
    pub is_active: Option<bool>,
    pub role: Option<UserRole>,
}

/// Field changes for one company, applied under the storage lock
#[derive(Debug, Clone, PartialEq)]
pub struct CompanyChanges {
    pub name: Option<String>,
    /// `Some(None)` clears the description
    pub description: Option<Option<String>>,
    pub updated_at: DateTime<Utc>,
}

/// User data storage interface
#[async_trait]
pub trait UserStorage: Send + Sync {
    /// Insert a new user. Conflict if the email or username is taken.
    async fn insert_user(&self, user: StoredUser) -> Result<()>;

    /// Get user by ID
    async fn get_user(&self, user_id: &str) -> Result<Option<StoredUser>>;

    /// Get user by username
    async fn get_user_by_username(&self, username: &str) -> Result<Option<StoredUser>>;

    /// Get user by email (exact match)
    async fn get_user_by_email(&self, email: &str) -> Result<Option<StoredUser>>;

    /// List users in creation order
    async fn list_users(&self, offset: usize, limit: usize) -> Result<Vec<StoredUser>>;

    /// Apply `changes` to the current record in one step. NotFound if
    /// absent, Conflict if the new email or username belongs to another user.
    async fn update_user(&self, user_id: &str, changes: UserChanges) -> Result<StoredUser>;

    /// Delete a user together with all of their memberships
    async fn delete_user(&self, user_id: &str) -> Result<()>;
}

/// Company and membership storage interface
#[async_trait]
pub trait CompanyStorage: Send + Sync {
    /// Insert a company and its founding membership as one unit.
    /// NotFound if the founder does not exist; nothing is written then.
    async fn create_company_with_member(&self, company: Company, founder_id: &str) -> Result<()>;

    /// Get company by ID
    async fn get_company(&self, company_id: &str) -> Result<Option<Company>>;

    /// Apply `changes` to the current record in one step. NotFound if absent.
    async fn update_company(&self, company_id: &str, changes: CompanyChanges) -> Result<Company>;

    /// Companies the user belongs to, in creation order
    async fn get_companies_for_user(&self, user_id: &str) -> Result<Vec<Company>>;

    /// Members of a company, in user creation order
    async fn get_company_members(&self, company_id: &str) -> Result<Vec<StoredUser>>;

    /// Membership test; false for unknown companies
    async fn is_member(&self, company_id: &str, user_id: &str) -> Result<bool>;

    /// Add a membership. NotFound if either side is absent, Conflict if present.
    async fn add_member(&self, company_id: &str, user_id: &str) -> Result<()>;

    /// Remove a membership. NotFound if either side is absent, Conflict if
    /// the pair does not exist or it is the company's last member.
    async fn remove_member(&self, company_id: &str, user_id: &str) -> Result<()>;
}

/// Combined storage provider interface
#[async_trait]
pub trait StorageProvider: Send + Sync {
    /// Get user storage backend
    fn user_storage(&self) -> &dyn UserStorage;

    /// Get company storage backend
    fn company_storage(&self) -> &dyn CompanyStorage;

    /// Initialize the storage backend (create tables, etc.)
    async fn initialize(&self) -> Result<()>;

    /// Health check for the storage backend
    async fn health_check(&self) -> Result<bool>;
}
