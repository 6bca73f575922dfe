//! # staylink-api
//!
//! HTTP surface for the StayLink realtime service: the WebSocket upgrade
//! endpoint plus health probes. All realtime semantics live in
//! `staylink-realtime`; this crate only maps the transport.

pub mod error;
pub mod handlers;
pub mod router;
pub mod state;

pub use router::build_router;
pub use state::AppState;
