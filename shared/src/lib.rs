//! Shared types for the parity-cloud service
//!
//! Framework-independent pieces used by the server crate: the unified
//! error system, domain models, banner rendering, and small utilities.

pub mod banner;
pub mod error;
pub mod models;
pub mod util;

// Re-exports
pub use axum::Json;
pub use http;
pub use serde::{Deserialize, Serialize};
