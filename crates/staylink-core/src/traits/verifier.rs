//! Token verification contract consumed by the realtime handshake.

use async_trait::async_trait;

use crate::error::AuthRejection;
use crate::types::UserId;

/// The identity carried by a successfully verified token.
#[derive(Debug, Clone)]
pub struct VerifiedToken {
    /// The authenticated user.
    pub user_id: UserId,
    /// Roles granted to the user. Never empty for a valid token.
    pub roles: Vec<String>,
}

/// Validates a raw bearer token.
///
/// Token issuance is an external concern; the core only consumes
/// verification. Failure causes stay distinguishable for logging.
#[async_trait]
pub trait TokenVerifier: Send + Sync {
    /// Verify a raw token and return the identity it carries.
    async fn verify(&self, raw_token: &str) -> Result<VerifiedToken, AuthRejection>;
}
