//! # seclink-core
//!
//! Core crate for Seclink. Contains the configuration schema, the store and
//! clock traits, the shared link entry types, and the unified error system.
//!
//! This crate has **no** internal dependencies on other Seclink crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
