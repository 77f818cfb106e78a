//! Subscription tier lookups (read-only; billing writes these rows)

use sqlx::PgPool;

use shared::models::subscription::SubscriptionTier;

use crate::cache::{CacheKind, DbCache, user_tag};
use crate::error::ServiceError;

/// The user's current tier; users without a subscription row are Free
pub async fn get_user_tier(
    pool: &PgPool,
    cache: &DbCache,
    user_id: &str,
) -> Result<SubscriptionTier, ServiceError> {
    let key = format!("subscriptions:user={user_id}");
    let tags = vec![user_tag(user_id, CacheKind::Subscriptions)];

    cache
        .get_or_load(key, tags, || async {
            let tier: Option<String> =
                sqlx::query_scalar("SELECT tier FROM user_subscriptions WHERE user_id = $1")
                    .bind(user_id)
                    .fetch_optional(pool)
                    .await?;

            Ok(tier
                .as_deref()
                .map(SubscriptionTier::from_db)
                .unwrap_or(SubscriptionTier::Free))
        })
        .await
}
