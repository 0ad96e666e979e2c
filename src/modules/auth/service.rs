use std::sync::Arc;

use chrono::Utc;
use thiserror::Error;
use tracing::{debug, error, instrument};

use crate::utils::jwt::TokenService;
use crate::utils::password::verify_password;

use super::model::{Claims, UserRole};
use super::store::CredentialStore;

#[derive(Debug, Error)]
pub enum AuthError {
    /// Unknown username and wrong password map here identically, so the
    /// return value carries no user-enumeration signal.
    #[error("invalid credentials")]
    InvalidCredentials,
    /// A stored role outside the known set. A data-integrity problem, not a
    /// client error; logged loudly and surfaced as an internal failure.
    #[error("invalid user role: {0}")]
    InvalidUserRole(String),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

pub struct AuthService {
    store: Arc<dyn CredentialStore>,
    tokens: Arc<TokenService>,
    /// Token lifetime in seconds.
    token_ttl: i64,
}

impl AuthService {
    pub fn new(store: Arc<dyn CredentialStore>, tokens: Arc<TokenService>, token_ttl: i64) -> Self {
        Self {
            store,
            tokens,
            token_ttl,
        }
    }

    /// Verifies credentials and issues a signed token carrying the scope set
    /// derived from the stored role. No side effects; tokens are not
    /// persisted anywhere.
    #[instrument(skip(self, password))]
    pub async fn authenticate(&self, username: &str, password: &str) -> Result<String, AuthError> {
        let user = self
            .store
            .get_by_username(username)
            .await
            .map_err(|e| anyhow::Error::new(e).context("failed to load user"))?;

        let Some(user) = user else {
            debug!("login attempt for unknown username");
            return Err(AuthError::InvalidCredentials);
        };

        let password_ok = verify_password(password, &user.password)
            .map_err(|e| anyhow::Error::new(e).context("failed to verify password"))?;
        if !password_ok {
            debug!(user.id = %user.id, "login attempt with wrong password");
            return Err(AuthError::InvalidCredentials);
        }

        let Some(role) = UserRole::parse(&user.role) else {
            error!(user.id = %user.id, role = %user.role, "user record carries an unknown role");
            return Err(AuthError::InvalidUserRole(user.role));
        };

        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: user.id.to_string(),
            exp: now + self.token_ttl,
            iat: now,
            scopes: Some(serde_json::json!(role.scopes())),
        };

        let token = self
            .tokens
            .generate_token(&claims)
            .map_err(|e| anyhow::Error::new(e).context("failed to generate token"))?;

        debug!(user.id = %user.id, role = %role.as_str(), "issued token");

        Ok(token)
    }
}
