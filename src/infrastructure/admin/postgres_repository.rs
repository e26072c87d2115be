//! PostgreSQL admin repository

use async_trait::async_trait;
use sqlx::{PgPool, Row};

use crate::domain::admin::{Admin, AdminId, AdminRepository};
use crate::domain::DomainError;

const SELECT_COLUMNS: &str = "id, username, email, password_hash, created_at, updated_at";

/// PostgreSQL implementation of AdminRepository
#[derive(Debug, Clone)]
pub struct PostgresAdminRepository {
    pool: PgPool,
}

impl PostgresAdminRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AdminRepository for PostgresAdminRepository {
    async fn get(&self, id: &AdminId) -> Result<Option<Admin>, DomainError> {
        let row = sqlx::query(&format!("SELECT {} FROM admins WHERE id = $1", SELECT_COLUMNS))
            .bind(id.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to get admin: {}", e)))?;

        Ok(row.map(|r| row_to_admin(&r)))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Admin>, DomainError> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM admins WHERE lower(email) = lower($1)",
            SELECT_COLUMNS
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to get admin by email: {}", e)))?;

        Ok(row.map(|r| row_to_admin(&r)))
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<Admin>, DomainError> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM admins WHERE username = $1",
            SELECT_COLUMNS
        ))
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to get admin by username: {}", e)))?;

        Ok(row.map(|r| row_to_admin(&r)))
    }

    async fn create(&self, admin: Admin) -> Result<Admin, DomainError> {
        sqlx::query(
            r#"
            INSERT INTO admins (id, username, email, password_hash, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(admin.id().as_str())
        .bind(admin.username())
        .bind(admin.email())
        .bind(admin.password_hash())
        .bind(admin.created_at())
        .bind(admin.updated_at())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            let msg = e.to_string();

            if msg.contains("duplicate key") || msg.contains("unique constraint") {
                DomainError::conflict("Admin already exists")
            } else {
                DomainError::storage(format!("Failed to create admin: {}", e))
            }
        })?;

        Ok(admin)
    }

    async fn update(&self, admin: &Admin) -> Result<Admin, DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE admins
            SET username = $2, email = $3, password_hash = $4, updated_at = $5
            WHERE id = $1
            "#,
        )
        .bind(admin.id().as_str())
        .bind(admin.username())
        .bind(admin.email())
        .bind(admin.password_hash())
        .bind(admin.updated_at())
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to update admin: {}", e)))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::not_found("Admin not found"));
        }

        Ok(admin.clone())
    }
}

fn row_to_admin(row: &sqlx::postgres::PgRow) -> Admin {
    let id: String = row.get("id");

    Admin::restore(
        AdminId::new(id),
        row.get("username"),
        row.get("email"),
        row.get("password_hash"),
        row.get("created_at"),
        row.get("updated_at"),
    )
}
