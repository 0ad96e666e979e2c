use std::sync::Arc;

use sqlx::PgPool;

use crate::config::cors::CorsConfig;
use crate::config::database::init_db_pool;
use crate::config::jwt::JwtConfig;
use crate::modules::auth::service::AuthService;
use crate::modules::auth::store::{CredentialStore, PgCredentialStore};
use crate::modules::flags::service::FlagService;
use crate::modules::flags::store::PgFlagStore;
use crate::utils::jwt::TokenService;

/// Shared application state.
///
/// Assembled once at startup: stores wrap the pool, services wrap the stores,
/// and the signed-key material lives in [`TokenService`] behind an `Arc` so
/// nothing reaches for ambient globals.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub tokens: Arc<TokenService>,
    pub auth_store: Arc<dyn CredentialStore>,
    pub auth_service: Arc<AuthService>,
    pub flag_service: Arc<FlagService>,
    pub cors_config: CorsConfig,
}

pub async fn init_app_state() -> anyhow::Result<AppState> {
    let db = init_db_pool().await;
    let jwt_config = JwtConfig::from_env();

    let tokens = Arc::new(TokenService::from_config(&jwt_config)?);
    let auth_store: Arc<dyn CredentialStore> = Arc::new(PgCredentialStore::new(db.clone()));
    let auth_service = Arc::new(AuthService::new(
        auth_store.clone(),
        tokens.clone(),
        jwt_config.token_expiry,
    ));
    let flag_service = Arc::new(FlagService::new(Arc::new(PgFlagStore::new(db.clone()))));

    Ok(AppState {
        db,
        tokens,
        auth_store,
        auth_service,
        flag_service,
        cors_config: CorsConfig::from_env(),
    })
}
