//! Trait seams for external collaborators.
//!
//! The messaging core only consumes the send/verify contracts of the push
//! gateway, bot relay, and token issuer; their internals live behind these
//! traits so the core stays testable with fakes.

pub mod provider;
pub mod verifier;

pub use provider::{BotSender, PushOutcome, PushSender};
pub use verifier::{TokenVerifier, VerifiedToken};
