//! # seclink-service
//!
//! Link lifecycle for Seclink: minting unguessable identifiers and issuing,
//! redeeming, and listing expiring links.

pub mod id;
pub mod link;

pub use id::{IdGenerator, SecureIdGenerator};
pub use link::{CreatedLink, LinkService, LinkSummary};
