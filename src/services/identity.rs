//! Identity store: user accounts and credential checks

use chrono::Utc;
use std::sync::{Arc, OnceLock};
use uuid::Uuid;

use crate::auth::password::{hash_password, verify_password};
use crate::auth::user::{NewUser, User, UserRole, UserUpdate};
use crate::constants::MAX_PAGE_LIMIT;
use crate::error::{RapierError, Result};
use crate::storage::traits::{StorageProvider, StoredUser, UserChanges};

/// Hash verified against when the username is unknown, so both failure
/// paths cost one Argon2 verification.
static DUMMY_HASH: OnceLock<Option<String>> = OnceLock::new();

fn dummy_hash() -> Option<&'static str> {
    DUMMY_HASH
        .get_or_init(|| hash_password("rapier-auth-dummy-password").ok())
        .as_deref()
}

/// User account operations over a storage provider
#[derive(Clone)]
pub struct IdentityService {
    storage: Arc<dyn StorageProvider>,
}

impl IdentityService {
    pub fn new(storage: Arc<dyn StorageProvider>) -> Self {
        Self { storage }
    }

    /// Creates a user with the given role. Email and username are checked
    /// independently; the storage insert re-checks both atomically.
    pub async fn create_user(&self, new_user: NewUser, role: UserRole) -> Result<User> {
        new_user.validate()?;
        let users = self.storage.user_storage();

        if users.get_user_by_email(&new_user.email).await?.is_some() {
            return Err(RapierError::Conflict("Email already registered".to_string()));
        }
        if users.get_user_by_username(&new_user.username).await?.is_some() {
            return Err(RapierError::Conflict("Username already taken".to_string()));
        }

        let stored = StoredUser {
            id: Uuid::new_v4().to_string(),
            email: new_user.email,
            username: new_user.username,
            password_hash: hash_password(&new_user.password)?,
            full_name: new_user.full_name,
            is_active: true,
            role,
            created_at: Utc::now(),
        };
        users.insert_user(stored.clone()).await?;

        log::info!("User created: id={} role={:?}", stored.id, stored.role);
        Ok(stored.into())
    }

    pub async fn get_user_by_id(&self, user_id: &str) -> Result<Option<User>> {
        let user = self.storage.user_storage().get_user(user_id).await?;
        Ok(user.map(User::from))
    }

    pub async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        let user = self
            .storage
            .user_storage()
            .get_user_by_username(username)
            .await?;
        Ok(user.map(User::from))
    }

    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let user = self.storage.user_storage().get_user_by_email(email).await?;
        Ok(user.map(User::from))
    }

    /// Users in creation order; `limit` is clamped to `MAX_PAGE_LIMIT`
    pub async fn list_users(&self, offset: usize, limit: usize) -> Result<Vec<User>> {
        let users = self
            .storage
            .user_storage()
            .list_users(offset, limit.min(MAX_PAGE_LIMIT))
            .await?;
        Ok(users.into_iter().map(User::from).collect())
    }

    /// Applies only the supplied fields, atomically in storage. Whether a
    /// caller may set `role` is decided by the gate, not here.
    pub async fn update_user(&self, user_id: &str, update: UserUpdate) -> Result<User> {
        update.validate()?;

        // Hash before touching storage so the lock is never held across Argon2
        let password_hash = update
            .password
            .as_deref()
            .map(hash_password)
            .transpose()?;

        let changes = UserChanges {
            email: update.email,
            username: update.username,
            password_hash,
            full_name: update.full_name,
            is_active: update.is_active,
            role: update.role,
        };

        let updated = self
            .storage
            .user_storage()
            .update_user(user_id, changes)
            .await?;
        Ok(updated.into())
    }

    /// Removes the user and, with it, every company membership they held
    pub async fn delete_user(&self, user_id: &str) -> Result<()> {
        self.storage.user_storage().delete_user(user_id).await?;
        log::info!("User deleted: id={}", user_id);
        Ok(())
    }

    /// `None` both for an unknown username and for a wrong password
    pub async fn authenticate(&self, username: &str, password: &str) -> Result<Option<User>> {
        let stored = self
            .storage
            .user_storage()
            .get_user_by_username(username)
            .await?;

        match stored {
            Some(user) if verify_password(password, &user.password_hash) => Ok(Some(user.into())),
            Some(_) => Ok(None),
            None => {
                if let Some(hash) = dummy_hash() {
                    let _ = verify_password(password, hash);
                }
                Ok(None)
            }
        }
    }
}
