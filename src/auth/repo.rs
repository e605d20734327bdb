use async_trait::async_trait;
use sqlx::{types::Json, PgPool};
use uuid::Uuid;

use crate::auth::repo_types::{NewUser, User, UserRow, WebsitePreferences};
use crate::db::StoreError;

const USER_COLUMNS: &str =
    "id, email, password_hash, website_preferences, description, created_at, updated_at";

/// Credential store. Email uniqueness is enforced here, not by callers.
#[async_trait]
pub trait UserRepo: Send + Sync {
    /// Fails with `StoreError::Duplicate` when the email is taken.
    async fn create(&self, new_user: NewUser) -> Result<User, StoreError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError>;
    async fn update_preferences(
        &self,
        id: Uuid,
        prefs: &WebsitePreferences,
    ) -> Result<Option<User>, StoreError>;
    async fn update_description(
        &self,
        id: Uuid,
        description: &str,
    ) -> Result<Option<User>, StoreError>;
    async fn update_password_hash(
        &self,
        id: Uuid,
        password_hash: &str,
    ) -> Result<Option<User>, StoreError>;
    async fn count(&self) -> Result<i64, StoreError>;
}

#[derive(Clone)]
pub struct PgUserRepo {
    db: PgPool,
}

impl PgUserRepo {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepo for PgUserRepo {
    async fn create(&self, new_user: NewUser) -> Result<User, StoreError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            r#"
            INSERT INTO users (id, email, password_hash, website_preferences)
            VALUES ($1, $2, $3, $4)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(&new_user.email)
        .bind(&new_user.password_hash)
        .bind(Json(&new_user.website_preferences))
        .fetch_one(&self.db)
        .await?;
        Ok(row.into())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(&self.db)
        .await?;
        Ok(row.map(Into::into))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await?;
        Ok(row.map(Into::into))
    }

    async fn update_preferences(
        &self,
        id: Uuid,
        prefs: &WebsitePreferences,
    ) -> Result<Option<User>, StoreError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            r#"
            UPDATE users SET website_preferences = $2, updated_at = now()
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(Json(prefs))
        .fetch_optional(&self.db)
        .await?;
        Ok(row.map(Into::into))
    }

    async fn update_description(
        &self,
        id: Uuid,
        description: &str,
    ) -> Result<Option<User>, StoreError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            r#"
            UPDATE users SET description = $2, updated_at = now()
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(description)
        .fetch_optional(&self.db)
        .await?;
        Ok(row.map(Into::into))
    }

    async fn update_password_hash(
        &self,
        id: Uuid,
        password_hash: &str,
    ) -> Result<Option<User>, StoreError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            r#"
            UPDATE users SET password_hash = $2, updated_at = now()
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(password_hash)
        .fetch_optional(&self.db)
        .await?;
        Ok(row.map(Into::into))
    }

    async fn count(&self) -> Result<i64, StoreError> {
        let (n,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
            .fetch_one(&self.db)
            .await?;
        Ok(n)
    }
}
