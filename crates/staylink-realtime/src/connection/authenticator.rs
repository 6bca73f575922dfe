//! Handshake authentication.

use std::sync::Arc;

use tracing::warn;

use staylink_core::error::AppError;
use staylink_core::traits::{TokenVerifier, VerifiedToken};

/// Authenticates raw tokens presented during the WebSocket handshake.
///
/// Each rejection cause is logged for diagnostics but collapsed to one
/// generic error before it reaches the client, so the handshake cannot be
/// used to probe which part of the token was wrong.
#[derive(Clone)]
pub struct SocketAuthenticator {
    verifier: Arc<dyn TokenVerifier>,
}

impl SocketAuthenticator {
    /// Create a new authenticator.
    pub fn new(verifier: Arc<dyn TokenVerifier>) -> Self {
        Self { verifier }
    }

    /// Verify the raw token, returning the authenticated identity.
    pub async fn authenticate(&self, raw_token: &str) -> Result<VerifiedToken, AppError> {
        match self.verifier.verify(raw_token).await {
            Ok(identity) => Ok(identity),
            Err(cause) => {
                warn!(cause = %cause, "Realtime handshake rejected");
                Err(cause.into_generic())
            }
        }
    }
}
