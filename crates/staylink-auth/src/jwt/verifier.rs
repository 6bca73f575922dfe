//! JWT token validation.

use async_trait::async_trait;
use jsonwebtoken::errors::ErrorKind as JwtErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};

use staylink_core::config::AuthConfig;
use staylink_core::error::AuthRejection;
use staylink_core::traits::{TokenVerifier, VerifiedToken};
use staylink_core::types::UserId;

use super::claims::Claims;

/// Validates JWT access tokens against the platform's HMAC secret.
#[derive(Clone)]
pub struct JwtVerifier {
    /// HMAC secret key for verification.
    decoding_key: DecodingKey,
    /// Validation configuration.
    validation: Validation,
}

impl std::fmt::Debug for JwtVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtVerifier")
            .field("validation", &self.validation)
            .finish()
    }
}

impl JwtVerifier {
    /// Creates a new verifier from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = config.leeway_seconds;

        Self {
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            validation,
        }
    }
}

#[async_trait]
impl TokenVerifier for JwtVerifier {
    async fn verify(&self, raw_token: &str) -> Result<VerifiedToken, AuthRejection> {
        if raw_token.trim().is_empty() {
            return Err(AuthRejection::MissingToken);
        }

        let data =
            decode::<Claims>(raw_token, &self.decoding_key, &self.validation).map_err(|e| {
                match e.kind() {
                    JwtErrorKind::ExpiredSignature => AuthRejection::ExpiredToken,
                    _ => AuthRejection::InvalidToken,
                }
            })?;

        let user_id: UserId = data
            .claims
            .sub
            .parse()
            .map_err(|_| AuthRejection::UserNotFound)?;

        if data.claims.roles.is_empty() {
            return Err(AuthRejection::NoRoles);
        }

        Ok(VerifiedToken {
            user_id,
            roles: data.claims.roles,
        })
    }
}
