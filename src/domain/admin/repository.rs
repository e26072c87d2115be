//! Admin repository trait

use async_trait::async_trait;

use super::entity::{Admin, AdminId};
use crate::domain::DomainError;

/// Repository for admin accounts
///
/// Username and email behave like unique indexes; violations surface as
/// `DomainError::Conflict`.
#[async_trait]
pub trait AdminRepository: Send + Sync + std::fmt::Debug {
    /// Get an admin by ID
    async fn get(&self, id: &AdminId) -> Result<Option<Admin>, DomainError>;

    /// Find an admin by email (stored lowercase)
    async fn find_by_email(&self, email: &str) -> Result<Option<Admin>, DomainError>;

    /// Find an admin by username
    async fn find_by_username(&self, username: &str) -> Result<Option<Admin>, DomainError>;

    /// Create a new admin, Conflict on duplicate email or username
    async fn create(&self, admin: Admin) -> Result<Admin, DomainError>;

    /// Update an existing admin (password reset)
    async fn update(&self, admin: &Admin) -> Result<Admin, DomainError>;
}
