//! Membership store: companies and the user/company relation

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::auth::user::{nullable, User};
use crate::error::{RapierError, Result};
use crate::storage::traits::{Company, CompanyChanges, StorageProvider};

/// Company creation payload
#[derive(Debug, Clone, Deserialize)]
pub struct NewCompany {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Founding member
    pub user_id: String,
}

/// Partial company update: `None` leaves the stored field untouched and
/// `description: null` clears it
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CompanyUpdate {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub description: Option<Option<String>>,
}

/// A company with its members loaded eagerly
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompanyWithMembers {
    #[serde(flatten)]
    pub company: Company,
    pub users: Vec<User>,
}

impl CompanyWithMembers {
    pub fn has_member(&self, user_id: &str) -> bool {
        self.users.iter().any(|user| user.id == user_id)
    }
}

fn validate_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(RapierError::ValidationError(
            "company name must not be empty".to_string(),
        ));
    }
    Ok(())
}

/// Company and membership operations over a storage provider
#[derive(Clone)]
pub struct MembershipService {
    storage: Arc<dyn StorageProvider>,
}

impl MembershipService {
    pub fn new(storage: Arc<dyn StorageProvider>) -> Self {
        Self { storage }
    }

    /// Creates the company and its founding membership as one unit
    pub async fn create_company(
        &self,
        name: &str,
        description: Option<String>,
        founder_id: &str,
    ) -> Result<Company> {
        validate_name(name)?;

        let now = Utc::now();
        let company = Company {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            description,
            created_at: now,
            updated_at: now,
        };

        self.storage
            .company_storage()
            .create_company_with_member(company.clone(), founder_id)
            .await?;

        log::info!("Company created: id={} founder={}", company.id, founder_id);
        Ok(company)
    }

    pub async fn get_company_by_id(&self, company_id: &str) -> Result<Option<Company>> {
        self.storage.company_storage().get_company(company_id).await
    }

    /// Company plus members in one explicit fetch
    pub async fn get_company_with_members(&self, company_id: &str) -> Result<CompanyWithMembers> {
        let companies = self.storage.company_storage();
        let company = companies
            .get_company(company_id)
            .await?
            .ok_or_else(|| RapierError::NotFound("Company".to_string()))?;
        let users = companies
            .get_company_members(company_id)
            .await?
            .into_iter()
            .map(User::from)
            .collect();

        Ok(CompanyWithMembers { company, users })
    }

    /// Empty when the user has no companies or does not exist
    pub async fn get_companies_for_user(&self, user_id: &str) -> Result<Vec<Company>> {
        self.storage
            .company_storage()
            .get_companies_for_user(user_id)
            .await
    }

    /// False when the company does not exist
    pub async fn is_member(&self, company_id: &str, user_id: &str) -> Result<bool> {
        self.storage
            .company_storage()
            .is_member(company_id, user_id)
            .await
    }

    /// Applies the supplied fields and always bumps `updated_at`
    pub async fn update_company(&self, company_id: &str, update: CompanyUpdate) -> Result<Company> {
        if let Some(name) = &update.name {
            validate_name(name)?;
        }

        let changes = CompanyChanges {
            name: update.name,
            description: update.description,
            updated_at: Utc::now(),
        };
        self.storage
            .company_storage()
            .update_company(company_id, changes)
            .await
    }

    pub async fn add_member(&self, company_id: &str, user_id: &str) -> Result<CompanyWithMembers> {
        self.storage
            .company_storage()
            .add_member(company_id, user_id)
            .await?;
        log::info!("Member added: company={} user={}", company_id, user_id);
        self.get_company_with_members(company_id).await
    }

    pub async fn remove_member(
        &self,
        company_id: &str,
        user_id: &str,
    ) -> Result<CompanyWithMembers> {
        self.storage
            .company_storage()
            .remove_member(company_id, user_id)
            .await?;
        log::info!("Member removed: company={} user={}", company_id, user_id);
        self.get_company_with_members(company_id).await
    }
}
