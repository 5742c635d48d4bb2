//! In-memory storage implementation for development and testing
//!
//! All tables sit behind a single lock, so every trait call is one atomic
//! step: uniqueness checks and the write that depends on them cannot
//! interleave with another writer.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::RwLock;

use super::traits::*;
use crate::error::{RapierError, Result};

#[derive(Default)]
struct Tables {
    users: HashMap<String, StoredUser>,
    user_order: Vec<String>,
    user_emails: HashMap<String, String>,    // email -> user_id
    user_usernames: HashMap<String, String>, // username -> user_id
    companies: HashMap<String, Company>,
    company_order: Vec<String>,
    memberships: HashSet<(String, String)>, // (user_id, company_id)
}

impl Tables {
    fn ensure_user(&self, user_id: &str) -> Result<()> {
        if self.users.contains_key(user_id) {
            Ok(())
        } else {
            Err(RapierError::NotFound("User".to_string()))
        }
    }

    fn ensure_company(&self, company_id: &str) -> Result<()> {
        if self.companies.contains_key(company_id) {
            Ok(())
        } else {
            Err(RapierError::NotFound("Company".to_string()))
        }
    }

    fn is_member(&self, company_id: &str, user_id: &str) -> bool {
        self.memberships
            .contains(&(user_id.to_string(), company_id.to_string()))
    }

    fn member_count(&self, company_id: &str) -> usize {
        self.memberships
            .iter()
            .filter(|(_, cid)| cid == company_id)
            .count()
    }

    /// Conflict when `value` is indexed to a user other than `user_id`
    fn check_unique(
        index: &HashMap<String, String>,
        value: &str,
        user_id: &str,
        message: &str,
    ) -> Result<()> {
        match index.get(value) {
            Some(owner) if owner != user_id => Err(RapierError::Conflict(message.to_string())),
            _ => Ok(()),
        }
    }
}

/// In-memory combined storage provider
#[derive(Clone, Default)]
pub struct MemoryStorageProvider {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryStorageProvider {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StorageProvider for MemoryStorageProvider {
    fn user_storage(&self) -> &dyn UserStorage {
        self
    }

    fn company_storage(&self) -> &dyn CompanyStorage {
        self
    }

    async fn initialize(&self) -> Result<()> {
        // Nothing to initialize for memory storage
        log::info!("Memory storage provider initialized");
        Ok(())
    }

    async fn health_check(&self) -> Result<bool> {
        // Memory storage is always healthy
        Ok(true)
    }
}

#[async_trait]
impl UserStorage for MemoryStorageProvider {
    async fn insert_user(&self, user: StoredUser) -> Result<()> {
        let mut tables = self.tables.write().await;

        if tables.users.contains_key(&user.id) {
            return Err(RapierError::Conflict("User id already exists".to_string()));
        }
        if tables.user_emails.contains_key(&user.email) {
            return Err(RapierError::Conflict("Email already registered".to_string()));
        }
        if tables.user_usernames.contains_key(&user.username) {
            return Err(RapierError::Conflict("Username already taken".to_string()));
        }

        tables.user_emails.insert(user.email.clone(), user.id.clone());
        tables
            .user_usernames
            .insert(user.username.clone(), user.id.clone());
        tables.user_order.push(user.id.clone());
        tables.users.insert(user.id.clone(), user);

        Ok(())
    }

    async fn get_user(&self, user_id: &str) -> Result<Option<StoredUser>> {
        let tables = self.tables.read().await;
        Ok(tables.users.get(user_id).cloned())
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<StoredUser>> {
        let tables = self.tables.read().await;
        Ok(tables
            .user_usernames
            .get(username)
            .and_then(|id| tables.users.get(id))
            .cloned())
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<StoredUser>> {
        let tables = self.tables.read().await;
        Ok(tables
            .user_emails
            .get(email)
            .and_then(|id| tables.users.get(id))
            .cloned())
    }

    async fn list_users(&self, offset: usize, limit: usize) -> Result<Vec<StoredUser>> {
        let tables = self.tables.read().await;
        Ok(tables
            .user_order
            .iter()
            .filter_map(|id| tables.users.get(id))
            .skip(offset)
            .take(limit)
            .cloned()
            .collect())
    }

    async fn update_user(&self, user_id: &str, changes: UserChanges) -> Result<StoredUser> {
        let mut tables = self.tables.write().await;

        let mut user = tables
            .users
            .get(user_id)
            .cloned()
            .ok_or_else(|| RapierError::NotFound("User".to_string()))?;

        if let Some(email) = &changes.email {
            Tables::check_unique(&tables.user_emails, email, user_id, "Email already registered")?;
        }
        if let Some(username) = &changes.username {
            Tables::check_unique(
                &tables.user_usernames,
                username,
                user_id,
                "Username already taken",
            )?;
        }

        if let Some(email) = changes.email {
            if email != user.email {
                tables.user_emails.remove(&user.email);
                tables.user_emails.insert(email.clone(), user_id.to_string());
                user.email = email;
            }
        }
        if let Some(username) = changes.username {
            if username != user.username {
                tables.user_usernames.remove(&user.username);
                tables
                    .user_usernames
                    .insert(username.clone(), user_id.to_string());
                user.username = username;
            }
        }
        if let Some(password_hash) = changes.password_hash {
            user.password_hash = password_hash;
        }
        if let Some(full_name) = changes.full_name {
            user.full_name = full_name;
        }
        if let Some(is_active) = changes.is_active {
            user.is_active = is_active;
        }
        if let Some(role) = changes.role {
            user.role = role;
        }

        tables.users.insert(user.id.clone(), user.clone());
        Ok(user)
    }

    async fn delete_user(&self, user_id: &str) -> Result<()> {
        let mut tables = self.tables.write().await;

        if let Some(user) = tables.users.remove(user_id) {
            tables.user_emails.remove(&user.email);
            tables.user_usernames.remove(&user.username);
            tables.user_order.retain(|id| id != user_id);
            tables.memberships.retain(|(uid, _)| uid != user_id);
            Ok(())
        } else {
            Err(RapierError::NotFound("User".to_string()))
        }
    }
}

#[async_trait]
impl CompanyStorage for MemoryStorageProvider {
    async fn create_company_with_member(&self, company: Company, founder_id: &str) -> Result<()> {
        let mut tables = self.tables.write().await;

        tables.ensure_user(founder_id)?;
        if tables.companies.contains_key(&company.id) {
            return Err(RapierError::Conflict("Company id already exists".to_string()));
        }

        tables
            .memberships
            .insert((founder_id.to_string(), company.id.clone()));
        tables.company_order.push(company.id.clone());
        tables.companies.insert(company.id.clone(), company);

        Ok(())
    }

    async fn get_company(&self, company_id: &str) -> Result<Option<Company>> {
        let tables = self.tables.read().await;
        Ok(tables.companies.get(company_id).cloned())
    }

    async fn update_company(&self, company_id: &str, changes: CompanyChanges) -> Result<Company> {
        let mut tables = self.tables.write().await;
        let company = tables
            .companies
            .get_mut(company_id)
            .ok_or_else(|| RapierError::NotFound("Company".to_string()))?;

        if let Some(name) = changes.name {
            company.name = name;
        }
        if let Some(description) = changes.description {
            company.description = description;
        }
        company.updated_at = changes.updated_at;

        Ok(company.clone())
    }

    async fn get_companies_for_user(&self, user_id: &str) -> Result<Vec<Company>> {
        let tables = self.tables.read().await;
        Ok(tables
            .company_order
            .iter()
            .filter(|cid| tables.is_member(cid, user_id))
            .filter_map(|cid| tables.companies.get(cid))
            .cloned()
            .collect())
    }

    async fn get_company_members(&self, company_id: &str) -> Result<Vec<StoredUser>> {
        let tables = self.tables.read().await;
        tables.ensure_company(company_id)?;
        Ok(tables
            .user_order
            .iter()
            .filter(|uid| tables.is_member(company_id, uid))
            .filter_map(|uid| tables.users.get(uid))
            .cloned()
            .collect())
    }

    async fn is_member(&self, company_id: &str, user_id: &str) -> Result<bool> {
        let tables = self.tables.read().await;
        Ok(tables.companies.contains_key(company_id) && tables.is_member(company_id, user_id))
    }

    async fn add_member(&self, company_id: &str, user_id: &str) -> Result<()> {
        let mut tables = self.tables.write().await;

        tables.ensure_company(company_id)?;
        tables.ensure_user(user_id)?;

        if !tables
            .memberships
            .insert((user_id.to_string(), company_id.to_string()))
        {
            return Err(RapierError::Conflict(
                "User is already a member of this company".to_string(),
            ));
        }
        Ok(())
    }

    async fn remove_member(&self, company_id: &str, user_id: &str) -> Result<()> {
        let mut tables = self.tables.write().await;

        tables.ensure_company(company_id)?;
        tables.ensure_user(user_id)?;

        if !tables.is_member(company_id, user_id) {
            return Err(RapierError::Conflict(
                "User is not a member of this company".to_string(),
            ));
        }
        if tables.member_count(company_id) <= 1 {
            return Err(RapierError::Conflict(
                "Cannot remove the last member of a company".to_string(),
            ));
        }

        tables
            .memberships
            .remove(&(user_id.to_string(), company_id.to_string()));
        Ok(())
    }
}
