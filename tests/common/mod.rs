use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::response::Response;
use http_body_util::BodyExt;
use sqlx::PgPool;
use uuid::Uuid;

use flagstone::config::cors::CorsConfig;
use flagstone::config::jwt::JwtConfig;
use flagstone::modules::auth::model::Claims;
use flagstone::modules::auth::service::AuthService;
use flagstone::modules::auth::store::{CredentialStore, PgCredentialStore};
use flagstone::modules::flags::service::FlagService;
use flagstone::modules::flags::store::PgFlagStore;
use flagstone::router::init_router;
use flagstone::state::AppState;
use flagstone::utils::jwt::TokenService;
use flagstone::utils::password::hash_password;

#[allow(dead_code)]
pub const TEST_TOKEN_TTL: i64 = 3600;

pub fn test_jwt_config() -> JwtConfig {
    JwtConfig {
        private_key_path: "tests/fixtures/jwt/private.pem".to_string(),
        public_key_path: "tests/fixtures/jwt/public.pem".to_string(),
        token_expiry: TEST_TOKEN_TTL,
    }
}

#[allow(dead_code)]
pub fn test_token_service() -> Arc<TokenService> {
    Arc::new(TokenService::from_config(&test_jwt_config()).unwrap())
}

#[allow(dead_code)]
pub fn test_state(pool: PgPool) -> AppState {
    let tokens = test_token_service();
    let auth_store: Arc<dyn CredentialStore> = Arc::new(PgCredentialStore::new(pool.clone()));
    let auth_service = Arc::new(AuthService::new(
        auth_store.clone(),
        tokens.clone(),
        TEST_TOKEN_TTL,
    ));
    let flag_service = Arc::new(FlagService::new(Arc::new(PgFlagStore::new(pool.clone()))));

    AppState {
        db: pool,
        tokens,
        auth_store,
        auth_service,
        flag_service,
        cors_config: CorsConfig {
            allowed_origins: vec![],
        },
    }
}

#[allow(dead_code)]
pub fn setup_test_app(pool: PgPool) -> Router {
    init_router(test_state(pool))
}

#[allow(dead_code)]
pub struct TestUser {
    pub id: Uuid,
    pub username: String,
    pub password: String,
}

/// Create a test user. `role` is stored verbatim so tests can also plant
/// invalid roles.
#[allow(dead_code)]
pub async fn create_test_user(pool: &PgPool, password: &str, role: &str) -> TestUser {
    let username = generate_unique_username();
    let hashed = hash_password(password).unwrap();

    let id: Uuid = sqlx::query_scalar(
        "INSERT INTO users (username, password, role) VALUES ($1, $2, $3) RETURNING id",
    )
    .bind(&username)
    .bind(&hashed)
    .bind(role)
    .fetch_one(pool)
    .await
    .unwrap();

    TestUser {
        id,
        username,
        password: password.to_string(),
    }
}

#[allow(dead_code)]
pub async fn create_test_flag(pool: &PgPool, key: &str) -> Uuid {
    sqlx::query_scalar::<_, Uuid>(
        "INSERT INTO feature_flags (key, description, enabled)
         VALUES ($1, 'test flag', TRUE) RETURNING id",
    )
    .bind(key)
    .fetch_one(pool)
    .await
    .unwrap()
}

#[allow(dead_code)]
pub fn generate_unique_username() -> String {
    format!("user-{}", Uuid::new_v4())
}

/// Sign a token directly, bypassing the login flow, so tests can craft
/// arbitrary subjects, scopes and lifetimes.
#[allow(dead_code)]
pub fn issue_token(
    tokens: &TokenService,
    sub: &str,
    scopes: Option<serde_json::Value>,
    ttl: i64,
) -> String {
    let now = chrono::Utc::now().timestamp();
    let claims = Claims {
        sub: sub.to_string(),
        exp: now + ttl,
        iat: now,
        scopes,
    };
    tokens.generate_token(&claims).unwrap()
}

#[allow(dead_code)]
pub async fn response_json(response: Response<Body>) -> serde_json::Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}
