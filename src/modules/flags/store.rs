use async_trait::async_trait;
use sqlx::PgPool;
use thiserror::Error;
use uuid::Uuid;

use super::model::{FeatureFlag, FeatureFlagRequest};

#[derive(Debug, Error)]
pub enum FlagStoreError {
    /// Expected outcome for get/update/delete on an unknown id; callers
    /// branch on it explicitly instead of treating it as a failure.
    #[error("feature flag not found")]
    NotFound,
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// Persistence for feature-flag records.
///
/// Ids and timestamps are assigned by the store (database defaults), so a
/// retried create yields a second record rather than a conflict. Key
/// uniqueness is deliberately not enforced here.
#[async_trait]
pub trait FlagStore: Send + Sync {
    async fn list(&self) -> Result<Vec<FeatureFlag>, FlagStoreError>;
    async fn get_by_id(&self, id: Uuid) -> Result<FeatureFlag, FlagStoreError>;
    async fn create(&self, req: &FeatureFlagRequest) -> Result<FeatureFlag, FlagStoreError>;
    async fn update(&self, id: Uuid, req: &FeatureFlagRequest) -> Result<(), FlagStoreError>;
    async fn delete(&self, id: Uuid) -> Result<(), FlagStoreError>;
}

#[derive(Debug, Clone)]
pub struct PgFlagStore {
    db: PgPool,
}

impl PgFlagStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl FlagStore for PgFlagStore {
    async fn list(&self) -> Result<Vec<FeatureFlag>, FlagStoreError> {
        let flags = sqlx::query_as::<_, FeatureFlag>(
            "SELECT id, key, description, enabled, created_at, updated_at FROM feature_flags",
        )
        .fetch_all(&self.db)
        .await?;

        Ok(flags)
    }

    async fn get_by_id(&self, id: Uuid) -> Result<FeatureFlag, FlagStoreError> {
        sqlx::query_as::<_, FeatureFlag>(
            "SELECT id, key, description, enabled, created_at, updated_at
             FROM feature_flags WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?
        .ok_or(FlagStoreError::NotFound)
    }

    async fn create(&self, req: &FeatureFlagRequest) -> Result<FeatureFlag, FlagStoreError> {
        let flag = sqlx::query_as::<_, FeatureFlag>(
            "INSERT INTO feature_flags (key, description, enabled)
             VALUES ($1, $2, $3)
             RETURNING id, key, description, enabled, created_at, updated_at",
        )
        .bind(&req.key)
        .bind(&req.description)
        .bind(req.enabled)
        .fetch_one(&self.db)
        .await?;

        Ok(flag)
    }

    async fn update(&self, id: Uuid, req: &FeatureFlagRequest) -> Result<(), FlagStoreError> {
        let result = sqlx::query(
            "UPDATE feature_flags
             SET key = $1, description = $2, enabled = $3, updated_at = NOW()
             WHERE id = $4",
        )
        .bind(&req.key)
        .bind(&req.description)
        .bind(req.enabled)
        .bind(id)
        .execute(&self.db)
        .await?;

        if result.rows_affected() == 0 {
            return Err(FlagStoreError::NotFound);
        }
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<(), FlagStoreError> {
        let result = sqlx::query("DELETE FROM feature_flags WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(FlagStoreError::NotFound);
        }
        Ok(())
    }
}
