//! # seclink-api
//!
//! HTTP layer for Seclink built on Axum.
//!
//! Two routers are exposed: the public one only redeems links, the admin one
//! issues and lists links, lists shareable files, and accepts uploads. They
//! are meant to be bound to different listeners.

pub mod dto;
pub mod error;
pub mod handlers;
pub mod router;
pub mod state;

pub use error::ApiError;
pub use router::{admin_router, public_router};
pub use state::AppState;
