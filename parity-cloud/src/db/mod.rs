//! Data access layer
//!
//! Free functions over `&PgPool`, with reads memoized through the
//! tag-indexed [`crate::cache::DbCache`] and mutations invalidating the
//! scopes they touch.

pub mod country_groups;
pub mod customizations;
pub mod products;
pub mod subscriptions;
