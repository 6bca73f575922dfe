//! Connection lifecycle: session handles, the registry, and handshake
//! authentication.

pub mod authenticator;
pub mod handle;
pub mod registry;

pub use authenticator::SocketAuthenticator;
pub use handle::SessionHandle;
pub use registry::ConnectionRegistry;
