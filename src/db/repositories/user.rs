//! User repository
//!
//! Data access for users, including the uniqueness probes the service
//! layer runs before create and update. The `exclude_id` parameter lets an
//! update re-check uniqueness without tripping over the user's own row.

use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::{Row, SqlitePool};
use std::sync::Arc;
use uuid::Uuid;

use crate::models::User;

/// User data-access contract
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, user: &User) -> Result<()>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>>;

    async fn find_by_username(&self, username: &str) -> Result<Option<User>>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>>;

    async fn update(&self, user: &User) -> Result<()>;

    /// Whether `username` is taken by any user other than `exclude_id`.
    async fn exists_username(&self, exclude_id: Option<Uuid>, username: &str) -> Result<bool>;

    /// Whether `email` is taken by any user other than `exclude_id`.
    async fn exists_email(&self, exclude_id: Option<Uuid>, email: &str) -> Result<bool>;
}

/// SQLx-backed user repository
pub struct SqlxUserRepository {
    pool: SqlitePool,
}

impl SqlxUserRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Boxed form for constructor wiring.
    pub fn boxed(pool: SqlitePool) -> Arc<dyn UserRepository> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl UserRepository for SqlxUserRepository {
    async fn create(&self, user: &User) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO users (id, username, email, password_hash, bio, image, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(user.id)
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.bio)
        .bind(&user.image)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await
        .context("Failed to create user")?;

        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>> {
        let row = sqlx::query(&select_sql("id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to find user by id")?;

        row.map(|row| row_to_user(&row)).transpose()
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        let row = sqlx::query(&select_sql("username = ?"))
            .bind(username)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to find user by username")?;

        row.map(|row| row_to_user(&row)).transpose()
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let row = sqlx::query(&select_sql("email = ?"))
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to find user by email")?;

        row.map(|row| row_to_user(&row)).transpose()
    }

    async fn update(&self, user: &User) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE users
            SET username = ?, email = ?, password_hash = ?, bio = ?, image = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.bio)
        .bind(&user.image)
        .bind(user.updated_at)
        .bind(user.id)
        .execute(&self.pool)
        .await
        .context("Failed to update user")?;

        Ok(())
    }

    async fn exists_username(&self, exclude_id: Option<Uuid>, username: &str) -> Result<bool> {
        exists(&self.pool, "username", exclude_id, username)
            .await
            .context("Failed to check username")
    }

    async fn exists_email(&self, exclude_id: Option<Uuid>, email: &str) -> Result<bool> {
        exists(&self.pool, "email", exclude_id, email)
            .await
            .context("Failed to check email")
    }
}

fn select_sql(predicate: &str) -> String {
    format!(
        "SELECT id, username, email, password_hash, bio, image, created_at, updated_at \
         FROM users WHERE {predicate}"
    )
}

async fn exists(
    pool: &SqlitePool,
    column: &str,
    exclude_id: Option<Uuid>,
    value: &str,
) -> Result<bool> {
    let count: i64 = match exclude_id {
        Some(id) => {
            sqlx::query_scalar(&format!(
                "SELECT COUNT(*) FROM users WHERE {column} = ? AND id != ?"
            ))
            .bind(value)
            .bind(id)
            .fetch_one(pool)
            .await?
        }
        None => {
            sqlx::query_scalar(&format!("SELECT COUNT(*) FROM users WHERE {column} = ?"))
                .bind(value)
                .fetch_one(pool)
                .await?
        }
    };

    Ok(count > 0)
}

fn row_to_user(row: &sqlx::sqlite::SqliteRow) -> Result<User> {
    Ok(User {
        id: row.get("id"),
        username: row.get("username"),
        email: row.get("email"),
        password_hash: row.get("password_hash"),
        bio: row.get("bio"),
        image: row.get("image"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}
