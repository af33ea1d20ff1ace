//! Data layer module
//!
//! Entities exchanged with the server. Nothing here is persisted.

mod models;

pub use models::*;
