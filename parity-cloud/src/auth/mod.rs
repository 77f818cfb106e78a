//! Merchant authentication and entitlements

pub mod permissions;
pub mod user_auth;

pub use permissions::{Capability, authorize};
pub use user_auth::{UserIdentity, user_auth_middleware};
