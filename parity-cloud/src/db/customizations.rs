//! Banner customization persistence

use sqlx::PgPool;
use uuid::Uuid;

use shared::models::customization::ProductCustomization;

use crate::cache::{CacheKind, CacheScope, DbCache, id_tag};
use crate::db::products;
use crate::error::ServiceError;

/// Writable customization fields
#[derive(Debug, Clone)]
pub struct CustomizationWrite {
    pub location_message: String,
    pub background_color: String,
    pub text_color: String,
    pub font_size: String,
    pub banner_container: String,
    pub is_sticky: bool,
    pub class_prefix: Option<String>,
}

/// The product's customization, owner-scoped
pub async fn get_product_customization(
    pool: &PgPool,
    cache: &DbCache,
    product_id: Uuid,
    user_id: &str,
) -> Result<Option<ProductCustomization>, ServiceError> {
    let key = format!("customizations:product={product_id}:user={user_id}");
    let tags = vec![id_tag(product_id, CacheKind::Products)];

    cache
        .get_or_load(key, tags, || async {
            let customization = sqlx::query_as::<_, ProductCustomization>(
                "SELECT pc.product_id, pc.location_message, pc.background_color, \
                 pc.text_color, pc.font_size, pc.banner_container, pc.is_sticky, pc.class_prefix \
                 FROM product_customizations pc \
                 JOIN products p ON p.id = pc.product_id \
                 WHERE p.id = $1 AND p.user_id = $2",
            )
            .bind(product_id)
            .bind(user_id)
            .fetch_optional(pool)
            .await?;
            Ok(customization)
        })
        .await
}

/// Overwrite the product's customization, owner-scoped. Returns false when
/// the product is not the caller's.
pub async fn update_product_customization(
    pool: &PgPool,
    cache: &DbCache,
    product_id: Uuid,
    user_id: &str,
    data: &CustomizationWrite,
) -> Result<bool, ServiceError> {
    if products::get_product(pool, cache, product_id, user_id)
        .await?
        .is_none()
    {
        return Ok(false);
    }

    let result = sqlx::query(
        "UPDATE product_customizations SET \
         location_message = $1, background_color = $2, text_color = $3, \
         font_size = $4, banner_container = $5, is_sticky = $6, class_prefix = $7 \
         WHERE product_id = $8",
    )
    .bind(&data.location_message)
    .bind(&data.background_color)
    .bind(&data.text_color)
    .bind(&data.font_size)
    .bind(&data.banner_container)
    .bind(data.is_sticky)
    .bind(&data.class_prefix)
    .bind(product_id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Ok(false);
    }

    cache.invalidate(&CacheScope {
        kind: CacheKind::Products,
        user_id: Some(user_id),
        id: Some(product_id),
    });
    Ok(true)
}
