use std::fmt;
use std::fs;

use anyhow::Context;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, decode_header, encode};
use thiserror::Error;

use crate::config::jwt::JwtConfig;
use crate::modules::auth::model::Claims;

/// Signature algorithms this service accepts. Tokens carrying anything else
/// (notably HMAC variants) are rejected before signature verification to
/// close off algorithm-substitution attacks.
const RSA_FAMILY: &[Algorithm] = &[Algorithm::RS256, Algorithm::RS384, Algorithm::RS512];

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("failed to sign token")]
    Signing(#[source] jsonwebtoken::errors::Error),
    #[error("unexpected signing method")]
    UnexpectedSigningMethod,
    #[error("invalid token")]
    Invalid,
    #[error("token expired")]
    Expired,
}

/// Issues and validates RS256-signed bearer tokens.
///
/// Key material is parsed once from the PEM files named in [`JwtConfig`] and
/// is immutable afterwards; validation is a pure function of the token and
/// the public key, so a single instance is shared across all request workers.
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl fmt::Debug for TokenService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // key material is intentionally not printable
        f.debug_struct("TokenService").finish_non_exhaustive()
    }
}

impl TokenService {
    pub fn from_config(config: &JwtConfig) -> anyhow::Result<Self> {
        let private_pem = fs::read(&config.private_key_path).with_context(|| {
            format!("failed to read private key at {}", config.private_key_path)
        })?;
        let encoding_key =
            EncodingKey::from_rsa_pem(&private_pem).context("failed to parse private key PEM")?;

        let public_pem = fs::read(&config.public_key_path)
            .with_context(|| format!("failed to read public key at {}", config.public_key_path))?;
        let decoding_key =
            DecodingKey::from_rsa_pem(&public_pem).context("failed to parse public key PEM")?;

        Ok(Self {
            encoding_key,
            decoding_key,
        })
    }

    pub fn generate_token(&self, claims: &Claims) -> Result<String, TokenError> {
        encode(&Header::new(Algorithm::RS256), claims, &self.encoding_key)
            .map_err(TokenError::Signing)
    }

    /// Verifies the signature and the `exp` claim.
    ///
    /// `exp` is a required claim: a token without one is rejected as expired
    /// rather than treated as eternal.
    pub fn validate_token(&self, token: &str) -> Result<Claims, TokenError> {
        let header = decode_header(token).map_err(|_| TokenError::Invalid)?;
        if !RSA_FAMILY.contains(&header.alg) {
            return Err(TokenError::UnexpectedSigningMethod);
        }

        let mut validation = Validation::new(Algorithm::RS256);
        validation.algorithms = RSA_FAMILY.to_vec();

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                ErrorKind::MissingRequiredClaim(claim) if claim == "exp" => TokenError::Expired,
                _ => TokenError::Invalid,
            })
    }
}
