use async_trait::async_trait;
use sqlx::PgPool;

use crate::auth::{error::StoreError, repo_types::User};

/// Gateway to the `user` table. The only place that talks to storage.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn find_by_name(&self, name: &str) -> Result<Option<User>, StoreError>;

    /// Returns the id assigned to the new row, or `None` if the store
    /// reported that nothing was written.
    async fn insert(&self, name: &str, password_hash: &str) -> Result<Option<i64>, StoreError>;

    async fn list_all(&self) -> Result<Vec<User>, StoreError>;
}

#[derive(Clone)]
pub struct PgCredentialStore {
    db: PgPool,
}

impl PgCredentialStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CredentialStore for PgCredentialStore {
    async fn find_by_name(&self, name: &str) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, password
            FROM "user"
            WHERE name = $1
            LIMIT 1
            "#,
        )
        .bind(name)
        .fetch_optional(&self.db)
        .await?;
        Ok(user)
    }

    async fn insert(&self, name: &str, password_hash: &str) -> Result<Option<i64>, StoreError> {
        let id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO "user" (name, password)
            VALUES ($1, $2)
            RETURNING id
            "#,
        )
        .bind(name)
        .bind(password_hash)
        .fetch_optional(&self.db)
        .await?;
        Ok(id)
    }

    async fn list_all(&self) -> Result<Vec<User>, StoreError> {
        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, password
            FROM "user"
            ORDER BY id
            "#,
        )
        .fetch_all(&self.db)
        .await?;
        Ok(users)
    }
}
