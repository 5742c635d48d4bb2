//! Centralized access policy
//!
//! `authorize` is a pure decision: no IO, no panics. The gate resolves
//! membership facts before asking, so the rule table stays testable on its own.

use crate::auth::user::{User, UserRole};
use crate::error::{RapierError, Result};

/// Guarded operations. Self-registration needs no caller and is not listed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    RegisterAdmin,
    ListUsers,
    GetUser,
    UpdateUser,
    DeleteUser,
    ReadOwnProfile,
    UpdateOwnProfile,
    CreateCompany,
    ListOwnCompanies,
    ReadCompany,
    UpdateCompany,
    AddCompanyMember,
    RemoveCompanyMember,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::RegisterAdmin => "register_admin",
            Operation::ListUsers => "list_users",
            Operation::GetUser => "get_user",
            Operation::UpdateUser => "update_user",
            Operation::DeleteUser => "delete_user",
            Operation::ReadOwnProfile => "read_own_profile",
            Operation::UpdateOwnProfile => "update_own_profile",
            Operation::CreateCompany => "create_company",
            Operation::ListOwnCompanies => "list_own_companies",
            Operation::ReadCompany => "read_company",
            Operation::UpdateCompany => "update_company",
            Operation::AddCompanyMember => "add_company_member",
            Operation::RemoveCompanyMember => "remove_company_member",
        }
    }
}

/// What the operation targets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource<'a> {
    /// Service-wide collections (user list, company creation)
    Service,
    /// An arbitrary user account
    User(&'a str),
    /// The account the token belongs to
    Profile(&'a str),
    /// A company, with the caller's membership already resolved
    Company { id: &'a str, caller_is_member: bool },
}

/// Decides whether `caller` may perform `operation` on `resource`
pub fn authorize(caller: &User, operation: Operation, resource: Resource<'_>) -> bool {
    match operation {
        Operation::RegisterAdmin
        | Operation::ListUsers
        | Operation::GetUser
        | Operation::UpdateUser
        | Operation::DeleteUser
        | Operation::CreateCompany => caller.role == UserRole::Admin,

        Operation::ReadOwnProfile | Operation::UpdateOwnProfile => {
            matches!(resource, Resource::Profile(subject) if subject == caller.id)
        }

        Operation::ListOwnCompanies => true,

        // Role is irrelevant here: admins must be members too
        Operation::ReadCompany
        | Operation::UpdateCompany
        | Operation::AddCompanyMember
        | Operation::RemoveCompanyMember => {
            matches!(resource, Resource::Company { caller_is_member: true, .. })
        }
    }
}

/// `authorize`, turned into a `Forbidden` error with a reason
pub fn require(caller: &User, operation: Operation, resource: Resource<'_>) -> Result<()> {
    if authorize(caller, operation, resource) {
        return Ok(());
    }

    log::warn!(
        "Permission denied: user={} operation={} resource={:?}",
        caller.id,
        operation.as_str(),
        resource
    );

    let reason = match resource {
        Resource::Company { .. } => "You are not a member of this company",
        Resource::Profile(_) => "You can only access your own profile",
        Resource::Service | Resource::User(_) => "Admin role required",
    };
    Err(RapierError::Forbidden(reason.to_string()))
}
