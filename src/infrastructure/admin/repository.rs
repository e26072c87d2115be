//! In-memory admin repository

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::domain::admin::{Admin, AdminId, AdminRepository};
use crate::domain::DomainError;

/// Thread-safe in-memory admin store with unique email/username indexes
#[derive(Debug, Default)]
pub struct InMemoryAdminRepository {
    admins: RwLock<HashMap<String, Admin>>,
}

impl InMemoryAdminRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock_err<T>(e: std::sync::PoisonError<T>) -> DomainError {
        DomainError::storage(format!("Failed to acquire admin lock: {}", e))
    }
}

#[async_trait]
impl AdminRepository for InMemoryAdminRepository {
    async fn get(&self, id: &AdminId) -> Result<Option<Admin>, DomainError> {
        let admins = self.admins.read().map_err(Self::lock_err)?;
        Ok(admins.get(id.as_str()).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Admin>, DomainError> {
        let admins = self.admins.read().map_err(Self::lock_err)?;
        Ok(admins
            .values()
            .find(|a| a.email().eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<Admin>, DomainError> {
        let admins = self.admins.read().map_err(Self::lock_err)?;
        Ok(admins.values().find(|a| a.username() == username).cloned())
    }

    async fn create(&self, admin: Admin) -> Result<Admin, DomainError> {
        let mut admins = self.admins.write().map_err(Self::lock_err)?;

        if admins
            .values()
            .any(|a| a.email().eq_ignore_ascii_case(admin.email()) || a.username() == admin.username())
        {
            return Err(DomainError::conflict("Admin already exists"));
        }

        admins.insert(admin.id().as_str().to_string(), admin.clone());
        Ok(admin)
    }

    async fn update(&self, admin: &Admin) -> Result<Admin, DomainError> {
        let mut admins = self.admins.write().map_err(Self::lock_err)?;

        if !admins.contains_key(admin.id().as_str()) {
            return Err(DomainError::not_found("Admin not found"));
        }

        admins.insert(admin.id().as_str().to_string(), admin.clone());
        Ok(admin.clone())
    }
}
