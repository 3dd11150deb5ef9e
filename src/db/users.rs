use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::{collections::HashMap, sync::Arc};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::UserProfile,
};

/// Storage for user profiles and their favorites
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Register a new user. Emails are unique, compared case-insensitively.
    async fn create(&self, name: &str, email: &str) -> AppResult<UserProfile>;

    async fn get(&self, id: Uuid) -> AppResult<UserProfile>;

    /// Add the title to the user's favorites, or remove it if already there
    async fn toggle_favorite(&self, id: Uuid, item_id: u64) -> AppResult<UserProfile>;
}

/// Trim and validate signup fields, returning the normalized name and email
pub fn normalize_signup(name: &str, email: &str) -> AppResult<(String, String)> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::InvalidInput("Name cannot be empty".to_string()));
    }

    let email = email.trim().to_lowercase();
    if email.is_empty() || !email.contains('@') {
        return Err(AppError::InvalidInput(format!(
            "Invalid email address: {:?}",
            email
        )));
    }

    Ok((name.to_string(), email))
}

fn email_taken(email: &str) -> AppError {
    AppError::InvalidInput(format!("Email {} is already registered", email))
}

fn user_not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("User {}", id))
}

// ============================================================================
// PostgreSQL
// ============================================================================

#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    name: String,
    email: String,
    created_at: DateTime<Utc>,
}

#[derive(Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn favorites(&self, id: Uuid) -> AppResult<Vec<u64>> {
        let ids: Vec<i64> = sqlx::query_scalar(
            r#"
            SELECT media_id
            FROM user_favorites
            WHERE user_id = $1
            ORDER BY position
            "#,
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        Ok(ids.into_iter().filter_map(|id| u64::try_from(id).ok()).collect())
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn create(&self, name: &str, email: &str) -> AppResult<UserProfile> {
        let (name, email) = normalize_signup(name, email)?;

        let row: Option<UserRow> = sqlx::query_as(
            r#"
            INSERT INTO users (id, name, email)
            VALUES ($1, $2, $3)
            ON CONFLICT (email) DO NOTHING
            RETURNING id, name, email, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&name)
        .bind(&email)
        .fetch_optional(&self.pool)
        .await?;

        let row = row.ok_or_else(|| email_taken(&email))?;

        tracing::info!(user_id = %row.id, "User created");

        Ok(UserProfile {
            id: row.id,
            name: row.name,
            email: row.email,
            favorites: Vec::new(),
            created_at: row.created_at,
        })
    }

    async fn get(&self, id: Uuid) -> AppResult<UserProfile> {
        let row: UserRow = sqlx::query_as(
            r#"
            SELECT id, name, email, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| user_not_found(id))?;

        let favorites = self.favorites(id).await?;

        Ok(UserProfile {
            id: row.id,
            name: row.name,
            email: row.email,
            favorites,
            created_at: row.created_at,
        })
    }

    async fn toggle_favorite(&self, id: Uuid, item_id: u64) -> AppResult<UserProfile> {
        let media_id = i64::try_from(item_id)
            .map_err(|_| AppError::InvalidInput(format!("Title id {} is out of range", item_id)))?;

        let mut tx = self.pool.begin().await?;

        let exists: Option<Uuid> = sqlx::query_scalar("SELECT id FROM users WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;
        if exists.is_none() {
            return Err(user_not_found(id));
        }

        let removed = sqlx::query("DELETE FROM user_favorites WHERE user_id = $1 AND media_id = $2")
            .bind(id)
            .bind(media_id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        if removed == 0 {
            sqlx::query("INSERT INTO user_favorites (user_id, media_id) VALUES ($1, $2)")
                .bind(id)
                .bind(media_id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        tracing::info!(
            user_id = %id,
            media_id = item_id,
            favorite = removed == 0,
            "Favorite toggled"
        );

        self.get(id).await
    }
}

// ============================================================================
// In-memory
// ============================================================================

/// Process-local repository, used when no database is configured and in tests
#[derive(Clone, Default)]
pub struct InMemoryUserRepository {
    inner: Arc<RwLock<HashMap<Uuid, UserProfile>>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, name: &str, email: &str) -> AppResult<UserProfile> {
        let (name, email) = normalize_signup(name, email)?;

        let mut users = self.inner.write().await;
        if users.values().any(|user| user.email == email) {
            return Err(email_taken(&email));
        }

        let user = UserProfile::new(name, email);
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn get(&self, id: Uuid) -> AppResult<UserProfile> {
        let users = self.inner.read().await;
        users.get(&id).cloned().ok_or_else(|| user_not_found(id))
    }

    async fn toggle_favorite(&self, id: Uuid, item_id: u64) -> AppResult<UserProfile> {
        let mut users = self.inner.write().await;
        let user = users.get_mut(&id).ok_or_else(|| user_not_found(id))?;
        user.toggle_favorite(item_id);
        Ok(user.clone())
    }
}
