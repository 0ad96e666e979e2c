use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct FeatureFlag {
    pub id: Uuid,
    pub key: String,
    pub description: String,
    pub enabled: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request body for create and update. Updates are full-record replaces:
/// key, description and enabled are all overwritten.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct FeatureFlagRequest {
    #[validate(length(min = 1))]
    pub key: String,
    #[validate(length(min = 1))]
    pub description: String,
    #[serde(default)]
    pub enabled: bool,
}
