use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use tracing::instrument;
use uuid::Uuid;

use crate::middleware::auth::AuthUser;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::validator::ValidatedJson;

use super::model::{FeatureFlag, FeatureFlagRequest};

/// List all feature flags
#[utoipa::path(
    get,
    path = "/api/flags",
    responses(
        (status = 200, description = "List of feature flags", body = Vec<FeatureFlag>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires read:flags scope")
    ),
    tag = "Feature Flags",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn list_flags(State(state): State<AppState>) -> Result<Json<Vec<FeatureFlag>>, AppError> {
    let flags = state.flag_service.list_flags().await?;
    Ok(Json(flags))
}

/// Fetch a single feature flag
#[utoipa::path(
    get,
    path = "/api/flags/{id}",
    params(("id" = Uuid, Path, description = "Flag ID")),
    responses(
        (status = 200, description = "Feature flag", body = FeatureFlag),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires read:flags scope"),
        (status = 404, description = "Feature flag not found")
    ),
    tag = "Feature Flags",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_flag_by_id(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<FeatureFlag>, AppError> {
    let flag = state.flag_service.get_flag_by_id(id).await?;
    Ok(Json(flag))
}

/// Create a feature flag
#[utoipa::path(
    post,
    path = "/api/flags",
    request_body = FeatureFlagRequest,
    responses(
        (status = 201, description = "Feature flag created", body = FeatureFlag),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires write:flags scope"),
        (status = 422, description = "Validation error")
    ),
    tag = "Feature Flags",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, dto), fields(user.id = %auth_user.user_id))]
pub async fn create_flag(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidatedJson(dto): ValidatedJson<FeatureFlagRequest>,
) -> Result<(StatusCode, Json<FeatureFlag>), AppError> {
    let flag = state.flag_service.create_flag(dto).await?;
    Ok((StatusCode::CREATED, Json(flag)))
}

/// Replace a feature flag
#[utoipa::path(
    put,
    path = "/api/flags/{id}",
    params(("id" = Uuid, Path, description = "Flag ID")),
    request_body = FeatureFlagRequest,
    responses(
        (status = 200, description = "Feature flag updated"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires write:flags scope"),
        (status = 404, description = "Feature flag not found"),
        (status = 422, description = "Validation error")
    ),
    tag = "Feature Flags",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, dto), fields(user.id = %auth_user.user_id))]
pub async fn update_flag(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<FeatureFlagRequest>,
) -> Result<StatusCode, AppError> {
    state.flag_service.update_flag(id, dto).await?;
    Ok(StatusCode::OK)
}

/// Delete a feature flag
#[utoipa::path(
    delete,
    path = "/api/flags/{id}",
    params(("id" = Uuid, Path, description = "Flag ID")),
    responses(
        (status = 204, description = "Feature flag deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires write:flags scope"),
        (status = 404, description = "Feature flag not found")
    ),
    tag = "Feature Flags",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state), fields(user.id = %auth_user.user_id))]
pub async fn delete_flag(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.flag_service.delete_flag(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
