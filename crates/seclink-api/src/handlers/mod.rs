//! Route handlers organized by domain.

pub mod files;
pub mod health;
pub mod links;
pub mod share;
