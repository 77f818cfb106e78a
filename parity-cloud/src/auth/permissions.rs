//! Tier-based entitlement checks
//!
//! Every mutation handler calls [`authorize`] with the capability it is
//! about to exercise before touching the database. Checks read the user's
//! subscription tier (cached; a missing row means Free).

use sqlx::PgPool;

use shared::error::{AppError, ErrorCode};

use crate::cache::DbCache;
use crate::db;
use crate::error::ServiceError;

/// What a request wants to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    /// Read, update, or delete the caller's own products and discounts
    ManageOwnProducts,
    /// Register a new product (bounded by the tier's product quota)
    CreateProduct,
    /// Edit the banner appearance (Standard and up)
    CustomizeBanner,
}

/// Check that `user_id` may exercise `capability`; entitlement denials
/// come back as `App` errors with a permission-category code.
pub async fn authorize(
    pool: &PgPool,
    cache: &DbCache,
    user_id: &str,
    capability: Capability,
) -> Result<(), ServiceError> {
    let tier = db::subscriptions::get_user_tier(pool, cache, user_id).await?;
    let limits = tier.limits();

    match capability {
        Capability::ManageOwnProducts => Ok(()),
        Capability::CreateProduct => {
            let count = db::products::get_product_count(pool, cache, user_id).await?;
            if count >= limits.max_products {
                return Err(AppError::new(ErrorCode::ProductLimitReached).into());
            }
            Ok(())
        }
        Capability::CustomizeBanner => {
            if !limits.can_customize_banner {
                return Err(AppError::new(ErrorCode::FeatureNotAvailable).into());
            }
            Ok(())
        }
    }
}

/// Whether the user's tier lets them drop the banner branding line
pub async fn can_remove_branding(
    pool: &PgPool,
    cache: &DbCache,
    user_id: &str,
) -> Result<bool, ServiceError> {
    let tier = db::subscriptions::get_user_tier(pool, cache, user_id).await?;
    Ok(tier.limits().can_remove_branding)
}
