use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::model::User;

/// Read-only access to identity records.
///
/// Identities are created and deleted by administrative operations outside
/// this service (see the `create-user` CLI); the auth path only ever looks
/// them up.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn get_by_username(&self, username: &str) -> Result<Option<User>, sqlx::Error>;

    /// Live existence check by id, used on every authorized request.
    async fn exists(&self, id: Uuid) -> Result<bool, sqlx::Error>;
}

#[derive(Debug, Clone)]
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
    async fn get_by_username(&self, username: &str) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            "SELECT id, username, password, role FROM users WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&self.db)
        .await
    }

    async fn exists(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.db)
            .await
    }
}
