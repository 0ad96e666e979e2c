use std::sync::Arc;

use tracing::{debug, error, info, instrument};
use uuid::Uuid;

use crate::utils::errors::AppError;

use super::model::{FeatureFlag, FeatureFlagRequest};
use super::store::{FlagStore, FlagStoreError};

pub struct FlagService {
    store: Arc<dyn FlagStore>,
}

impl FlagService {
    pub fn new(store: Arc<dyn FlagStore>) -> Self {
        Self { store }
    }

    #[instrument(skip(self))]
    pub async fn list_flags(&self) -> Result<Vec<FeatureFlag>, AppError> {
        let flags = self
            .store
            .list()
            .await
            .map_err(|e| map_store_error(e, "failed to list flags"))?;

        debug!(count = flags.len(), "flags listed");
        Ok(flags)
    }

    #[instrument(skip(self), fields(flag.id = %id))]
    pub async fn get_flag_by_id(&self, id: Uuid) -> Result<FeatureFlag, AppError> {
        self.store
            .get_by_id(id)
            .await
            .map_err(|e| map_store_error(e, "failed to fetch flag"))
    }

    #[instrument(skip(self, req), fields(flag.key = %req.key))]
    pub async fn create_flag(&self, req: FeatureFlagRequest) -> Result<FeatureFlag, AppError> {
        let flag = self
            .store
            .create(&req)
            .await
            .map_err(|e| map_store_error(e, "failed to create flag"))?;

        info!(flag.id = %flag.id, flag.key = %flag.key, "flag created");
        Ok(flag)
    }

    #[instrument(skip(self, req), fields(flag.id = %id))]
    pub async fn update_flag(&self, id: Uuid, req: FeatureFlagRequest) -> Result<(), AppError> {
        self.store
            .update(id, &req)
            .await
            .map_err(|e| map_store_error(e, "failed to update flag"))?;

        info!(flag.id = %id, "flag updated");
        Ok(())
    }

    #[instrument(skip(self), fields(flag.id = %id))]
    pub async fn delete_flag(&self, id: Uuid) -> Result<(), AppError> {
        self.store
            .delete(id)
            .await
            .map_err(|e| map_store_error(e, "failed to delete flag"))?;

        info!(flag.id = %id, "flag deleted");
        Ok(())
    }
}

fn map_store_error(err: FlagStoreError, context: &'static str) -> AppError {
    match err {
        FlagStoreError::NotFound => AppError::not_found("feature flag not found"),
        FlagStoreError::Database(e) => {
            error!(error = %e, "{context}");
            AppError::internal(anyhow::Error::new(e).context(context))
        }
    }
}
