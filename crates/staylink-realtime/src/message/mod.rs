//! Wire message type definitions and validation.

pub mod types;
pub mod validator;

pub use types::{Ack, ClientEvent, ErrorBody, ServerEvent};
pub use validator::TextRules;
