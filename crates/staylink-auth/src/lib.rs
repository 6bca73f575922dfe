//! # staylink-auth
//!
//! JWT access-token validation. Token issuance is handled by the main
//! platform; the realtime core only verifies tokens presented during the
//! WebSocket handshake.

pub mod jwt;

pub use jwt::{Claims, JwtVerifier};
