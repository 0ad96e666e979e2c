//! Scope-based authorization middleware.
//!
//! Applied per route group with a statically declared required scope:
//!
//! ```rust,ignore
//! use axum::{Router, middleware};
//! use crate::middleware::auth::require_write_flags;
//!
//! let editor_routes = Router::new()
//!     .route("/", post(create_flag))
//!     .route_layer(middleware::from_fn_with_state(state.clone(), require_write_flags));
//! ```

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts},
    middleware::Next,
    response::Response,
};
use tracing::{error, warn};
use uuid::Uuid;

use crate::modules::auth::model::{SCOPE_READ_FLAGS, SCOPE_WRITE_FLAGS};
use crate::state::AppState;
use crate::utils::errors::AppError;

/// Verified identity attached to the request once authorization passes.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub scopes: Vec<String>,
}

impl AuthUser {
    pub fn has_scope(&self, scope: &str) -> bool {
        self.scopes.iter().any(|s| s == scope)
    }
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthUser>()
            .cloned()
            .ok_or_else(|| AppError::unauthorized("missing token"))
    }
}

/// Middleware for route groups that only read flags.
pub async fn require_read_flags(
    state: State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    require_scope(state, req, next, SCOPE_READ_FLAGS).await
}

/// Middleware for route groups that mutate flags.
pub async fn require_write_flags(
    state: State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    require_scope(state, req, next, SCOPE_WRITE_FLAGS).await
}

/// Authorization gate shared by every protected route group.
///
/// Every check is a hard stop. Token-validation detail is logged but never
/// surfaced; the caller only learns that the token was unusable.
pub async fn require_scope(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
    required_scope: &'static str,
) -> Result<Response, AppError> {
    let token = extract_bearer_token(&req)?;

    let claims = state.tokens.validate_token(token).map_err(|e| {
        warn!(error = %e, "token validation failed");
        AppError::unauthorized("invalid or expired token")
    })?;

    let user_id = claims
        .sub
        .parse::<Uuid>()
        .ok()
        .filter(|id| !id.is_nil())
        .ok_or_else(|| AppError::unauthorized("invalid user ID in token"))?;

    // Live check against the store, not trust-on-claim: deleting an identity
    // revokes its outstanding tokens on the very next request.
    let exists = state.auth_store.exists(user_id).await.map_err(|e| {
        error!(user.id = %user_id, error = %e, "failed to check subject existence");
        AppError::unauthorized("user not found")
    })?;
    if !exists {
        return Err(AppError::unauthorized("user not found"));
    }

    if required_scope.is_empty() {
        return Err(AppError::internal_message("required scope not set"));
    }

    let raw_scopes = claims
        .scopes
        .as_ref()
        .filter(|v| !v.is_null())
        .ok_or_else(|| AppError::forbidden("no scopes found in token"))?;
    let scopes = normalize_scopes(raw_scopes)?;

    if !scopes.iter().any(|scope| scope == required_scope) {
        return Err(AppError::forbidden("insufficient permissions"));
    }

    req.extensions_mut().insert(AuthUser { user_id, scopes });
    Ok(next.run(req).await)
}

fn extract_bearer_token(req: &Request) -> Result<&str, AppError> {
    let value = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| AppError::unauthorized("missing token"))?;

    Ok(value.strip_prefix("Bearer ").unwrap_or(value))
}

/// Normalizes the `scopes` claim to a plain string list.
///
/// The claim arrives as generic JSON after deserialization. Anything that is
/// not an array of strings is a hard error rather than a silent drop; a
/// malformed claim must never widen or narrow access unnoticed.
pub fn normalize_scopes(value: &serde_json::Value) -> Result<Vec<String>, AppError> {
    let items = value
        .as_array()
        .ok_or_else(|| AppError::internal_message("invalid scope format"))?;

    items
        .iter()
        .map(|item| {
            item.as_str()
                .map(str::to_owned)
                .ok_or_else(|| AppError::internal_message("invalid scope format"))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use serde_json::json;

    #[test]
    fn test_normalize_scopes_string_list() {
        let value = json!(["read:flags", "write:flags"]);
        let scopes = normalize_scopes(&value).unwrap();
        assert_eq!(scopes, vec!["read:flags", "write:flags"]);
    }

    #[test]
    fn test_normalize_scopes_empty_list() {
        let value = json!([]);
        let scopes = normalize_scopes(&value).unwrap();
        assert!(scopes.is_empty());
    }

    #[test]
    fn test_normalize_scopes_rejects_non_string_element() {
        let value = json!(["read:flags", 42]);
        let err = normalize_scopes(&value).unwrap_err();
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.message, "invalid scope format");
    }

    #[test]
    fn test_normalize_scopes_rejects_non_array() {
        for value in [json!("read:flags"), json!(7), json!({"scope": "read:flags"})] {
            let err = normalize_scopes(&value).unwrap_err();
            assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
        }
    }

    #[test]
    fn test_has_scope() {
        let auth_user = AuthUser {
            user_id: Uuid::new_v4(),
            scopes: vec!["read:flags".to_string()],
        };

        assert!(auth_user.has_scope("read:flags"));
        assert!(!auth_user.has_scope("write:flags"));
    }
}
