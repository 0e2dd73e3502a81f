//! # Freezebee Client
//!
//! HTTP client for the remote R&D microservice that owns characteristics,
//! ingredients, models, processes and series. The gateway never stores
//! entities itself; every operation is forwarded here.
//!
//! Responses are mapped onto [`errors::ApiError`]:
//! - `404` becomes `NotFound` for the addressed entity
//! - any other non-2xx becomes `Upstream` with the status and message
//! - timeouts, connection failures and undecodable bodies get their own
//!   variants

mod client;

pub use client::FreezebeeClient;
