//! Finscope HTTP gateway.
//!
//! Exposes identification sessions over a small JSON API: create a session
//! (seeded with the bundled example), upload a photo, re-analyze, dismiss errors.

pub mod error;
pub mod health_api;
pub mod server;
pub mod session_registry;
pub mod sessions_api;

pub use error::ApiError;
pub use server::{build_router, start_server, GatewayState};
pub use session_registry::SessionRegistry;
