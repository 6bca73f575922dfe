//! JWT claim definitions.

use serde::{Deserialize, Serialize};

/// Claims carried by a StayLink access token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the user id as a UUID string.
    pub sub: String,
    /// Roles granted to the user.
    #[serde(default)]
    pub roles: Vec<String>,
    /// Expiration timestamp (seconds since epoch).
    pub exp: i64,
    /// Issued-at timestamp (seconds since epoch).
    pub iat: i64,
}
