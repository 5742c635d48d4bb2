//! Access control gate
//!
//! Every operation follows the same order: resolve the caller from the
//! bearer token (Unauthenticated), check the policy (Forbidden), then touch
//! the stores (NotFound/Conflict). Company-scoped checks never reveal whether
//! an id exists to a caller who is not a member of it.

use serde::Serialize;
use std::sync::Arc;

use crate::auth::policy::{require, Operation, Resource};
use crate::auth::token::TokenManager;
use crate::auth::user::{NewUser, User, UserRole, UserUpdate};
use crate::config::AppConfig;
use crate::constants::TOKEN_TYPE;
use crate::error::{RapierError, Result};
use crate::security::AuthTimer;
use crate::services::identity::IdentityService;
use crate::services::membership::{CompanyUpdate, CompanyWithMembers, MembershipService, NewCompany};
use crate::storage::traits::{Company, StorageProvider};

/// Login response
#[derive(Debug, Clone, Serialize)]
pub struct AccessToken {
    pub access_token: String,
    pub token_type: String,
}

/// Entry point for every caller-facing operation
#[derive(Clone)]
pub struct AccessGate {
    config: Arc<AppConfig>,
    tokens: Arc<TokenManager>,
    identity: IdentityService,
    membership: MembershipService,
}

impl AccessGate {
    pub fn new(config: Arc<AppConfig>, storage: Arc<dyn StorageProvider>) -> Self {
        let tokens = Arc::new(TokenManager::new(
            &config.secret_key,
            config.access_token_ttl,
        ));
        Self {
            config,
            tokens,
            identity: IdentityService::new(storage.clone()),
            membership: MembershipService::new(storage),
        }
    }

    pub fn identity(&self) -> &IdentityService {
        &self.identity
    }

    pub fn membership(&self) -> &MembershipService {
        &self.membership
    }

    pub fn tokens(&self) -> &TokenManager {
        &self.tokens
    }

    /// Token -> subject -> live, active account
    pub async fn resolve_caller(&self, token: Option<&str>) -> Result<User> {
        let token = token.ok_or(RapierError::Unauthenticated)?;

        let claims = self.tokens.decode_token(token).ok_or_else(|| {
            log::warn!("Rejected request with invalid or expired token");
            RapierError::Unauthenticated
        })?;

        let user = self
            .identity
            .get_user_by_id(&claims.sub)
            .await?
            .ok_or_else(|| {
                log::warn!("Token subject no longer exists: {}", claims.sub);
                RapierError::Unauthenticated
            })?;

        if !user.is_active {
            log::warn!("Rejected request from inactive user {}", user.id);
            return Err(RapierError::InactiveAccount);
        }

        Ok(user)
    }

    async fn company_resource<'a>(
        &self,
        caller: &User,
        company_id: &'a str,
    ) -> Result<Resource<'a>> {
        let caller_is_member = self.membership.is_member(company_id, &caller.id).await?;
        Ok(Resource::Company {
            id: company_id,
            caller_is_member,
        })
    }

    // ---- accounts -------------------------------------------------------

    /// Self-registration; the role is always `user`
    pub async fn register(&self, new_user: NewUser) -> Result<User> {
        self.identity.create_user(new_user, UserRole::User).await
    }

    /// Admin-created account with the admin role
    pub async fn register_admin(&self, token: Option<&str>, new_user: NewUser) -> Result<User> {
        let caller = self.resolve_caller(token).await?;
        require(&caller, Operation::RegisterAdmin, Resource::Service)?;
        self.identity.create_user(new_user, UserRole::Admin).await
    }

    /// Exchanges credentials for a bearer token
    pub async fn login(&self, username: &str, password: &str) -> Result<AccessToken> {
        let timer = AuthTimer::new(self.config.login_min_duration);
        let outcome = self.identity.authenticate(username, password).await;
        timer.wait().await;

        let user = match outcome? {
            Some(user) => user,
            None => {
                log::warn!("Failed login attempt");
                return Err(RapierError::Unauthenticated);
            }
        };

        if !user.is_active {
            log::warn!("Login refused for inactive user {}", user.id);
            return Err(RapierError::InactiveAccount);
        }

        let access_token = self.tokens.issue_token(&user.id, None, None)?;
        log::info!("User logged in: id={}", user.id);

        Ok(AccessToken {
            access_token,
            token_type: TOKEN_TYPE.to_string(),
        })
    }

    pub async fn me(&self, token: Option<&str>) -> Result<User> {
        let caller = self.resolve_caller(token).await?;
        require(&caller, Operation::ReadOwnProfile, Resource::Profile(&caller.id))?;
        Ok(caller)
    }

    /// Self-service update; any `role` in the payload is dropped
    pub async fn update_me(&self, token: Option<&str>, update: UserUpdate) -> Result<User> {
        let caller = self.resolve_caller(token).await?;
        require(&caller, Operation::UpdateOwnProfile, Resource::Profile(&caller.id))?;
        self.identity
            .update_user(&caller.id, update.without_role())
            .await
    }

    pub async fn list_users(
        &self,
        token: Option<&str>,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<User>> {
        let caller = self.resolve_caller(token).await?;
        require(&caller, Operation::ListUsers, Resource::Service)?;
        self.identity.list_users(offset, limit).await
    }

    pub async fn get_user(&self, token: Option<&str>, user_id: &str) -> Result<User> {
        let caller = self.resolve_caller(token).await?;
        require(&caller, Operation::GetUser, Resource::User(user_id))?;
        self.identity
            .get_user_by_id(user_id)
            .await?
            .ok_or_else(|| RapierError::NotFound("User".to_string()))
    }

    pub async fn update_user(
        &self,
        token: Option<&str>,
        user_id: &str,
        update: UserUpdate,
    ) -> Result<User> {
        let caller = self.resolve_caller(token).await?;
        require(&caller, Operation::UpdateUser, Resource::User(user_id))?;
        self.identity.update_user(user_id, update).await
    }

    pub async fn delete_user(&self, token: Option<&str>, user_id: &str) -> Result<()> {
        let caller = self.resolve_caller(token).await?;
        require(&caller, Operation::DeleteUser, Resource::User(user_id))?;
        self.identity.delete_user(user_id).await
    }

    // ---- companies ------------------------------------------------------

    pub async fn create_company(&self, token: Option<&str>, new_company: NewCompany) -> Result<Company> {
        let caller = self.resolve_caller(token).await?;
        require(&caller, Operation::CreateCompany, Resource::Service)?;
        self.membership
            .create_company(
                &new_company.name,
                new_company.description,
                &new_company.user_id,
            )
            .await
    }

    pub async fn list_my_companies(&self, token: Option<&str>) -> Result<Vec<Company>> {
        let caller = self.resolve_caller(token).await?;
        require(&caller, Operation::ListOwnCompanies, Resource::Service)?;
        self.membership.get_companies_for_user(&caller.id).await
    }

    pub async fn get_company(&self, token: Option<&str>, company_id: &str) -> Result<Company> {
        let caller = self.resolve_caller(token).await?;
        let resource = self.company_resource(&caller, company_id).await?;
        require(&caller, Operation::ReadCompany, resource)?;
        self.membership
            .get_company_by_id(company_id)
            .await?
            .ok_or_else(|| RapierError::NotFound("Company".to_string()))
    }

    pub async fn update_company(
        &self,
        token: Option<&str>,
        company_id: &str,
        update: CompanyUpdate,
    ) -> Result<Company> {
        let caller = self.resolve_caller(token).await?;
        let resource = self.company_resource(&caller, company_id).await?;
        require(&caller, Operation::UpdateCompany, resource)?;
        self.membership.update_company(company_id, update).await
    }

    pub async fn add_company_member(
        &self,
        token: Option<&str>,
        company_id: &str,
        user_id: &str,
    ) -> Result<CompanyWithMembers> {
        let caller = self.resolve_caller(token).await?;
        let resource = self.company_resource(&caller, company_id).await?;
        require(&caller, Operation::AddCompanyMember, resource)?;
        self.membership.add_member(company_id, user_id).await
    }

    pub async fn remove_company_member(
        &self,
        token: Option<&str>,
        company_id: &str,
        user_id: &str,
    ) -> Result<CompanyWithMembers> {
        let caller = self.resolve_caller(token).await?;
        let resource = self.company_resource(&caller, company_id).await?;
        require(&caller, Operation::RemoveCompanyMember, resource)?;
        self.membership.remove_member(company_id, user_id).await
    }
}
