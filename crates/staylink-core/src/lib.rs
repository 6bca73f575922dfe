//! # staylink-core
//!
//! Shared foundation for the StayLink messaging platform: unified error
//! taxonomy, newtype identifiers, domain notification events, provider
//! traits, and layered configuration.

pub mod config;
pub mod error;
pub mod events;
pub mod result;
pub mod traits;
pub mod types;

pub use error::{AppError, AuthRejection, ErrorKind};
pub use result::AppResult;
