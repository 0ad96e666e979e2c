use std::env;

/// Location of the RSA signing keys and the token lifetime.
///
/// The keys themselves are parsed once at startup into
/// [`crate::utils::jwt::TokenService`]; there is no runtime rotation.
#[derive(Clone, Debug)]
pub struct JwtConfig {
    pub private_key_path: String,
    pub public_key_path: String,
    /// Token lifetime in seconds.
    pub token_expiry: i64,
}

impl JwtConfig {
    pub fn from_env() -> Self {
        Self {
            private_key_path: env::var("JWT_PRIVATE_KEY_PATH")
                .unwrap_or_else(|_| "certs/jwt_keys/private.pem".to_string()),
            public_key_path: env::var("JWT_PUBLIC_KEY_PATH")
                .unwrap_or_else(|_| "certs/jwt_keys/public.pem".to_string()),
            token_expiry: env::var("JWT_TOKEN_EXPIRY")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(86_400), // 24 hours
        }
    }
}
