//! # R&D Gateway
//!
//! REST gateway in front of the R&D microservice. Each request carries the
//! caller's directory entry (forwarded as headers by the authenticating
//! proxy); the entry's group memberships are resolved to roles, and the
//! role decides which entity operations the caller may perform.
//!
//! ```text
//! proxy headers ─► identity middleware ─► Principal ─► handler ─► authorize()
//!                  (LdapEntry + fetcher)               │
//!                                                      ▼
//!                                              FreezebeeApi (HTTP)
//! ```

pub mod auth;
pub mod envelope;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod server;
pub mod state;
pub mod telemetry;

pub use auth::Authenticated;
pub use error::{GatewayError, Result};
pub use routes::create_router;
pub use server::GatewayServer;
pub use state::AppState;
