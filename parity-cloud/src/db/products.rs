//! Product persistence and banner resolution

use sqlx::PgPool;
use uuid::Uuid;

use shared::models::banner::{BannerCountry, BannerData, BannerProduct};
use shared::models::country::DiscountSummary;
use shared::models::customization::ProductCustomization;
use shared::models::product::Product;
use shared::util::remove_trailing_slash;

use crate::cache::{CacheKind, CacheScope, DbCache, global_tag, id_tag, user_tag};
use crate::error::ServiceError;

/// Writable product fields (URL already normalized by the caller)
#[derive(Debug, Clone)]
pub struct ProductWrite {
    pub name: String,
    pub url: String,
    pub description: String,
}

/// List the user's products, newest first
pub async fn get_products(
    pool: &PgPool,
    cache: &DbCache,
    user_id: &str,
    limit: Option<i64>,
) -> Result<Vec<Product>, ServiceError> {
    let key = match limit {
        Some(n) => format!("products:user={user_id}:limit={n}"),
        None => format!("products:user={user_id}:limit=all"),
    };
    let tags = vec![user_tag(user_id, CacheKind::Products)];

    cache
        .get_or_load(key, tags, || async {
            let products = sqlx::query_as::<_, Product>(
                "SELECT id, user_id, name, url, description, created_at, updated_at \
                 FROM products WHERE user_id = $1 \
                 ORDER BY created_at DESC \
                 LIMIT $2",
            )
            .bind(user_id)
            .bind(limit.unwrap_or(i64::MAX))
            .fetch_all(pool)
            .await?;
            Ok(products)
        })
        .await
}

/// Fetch one product, owner-scoped
pub async fn get_product(
    pool: &PgPool,
    cache: &DbCache,
    id: Uuid,
    user_id: &str,
) -> Result<Option<Product>, ServiceError> {
    let key = format!("products:id={id}:user={user_id}");
    let tags = vec![id_tag(id, CacheKind::Products)];

    cache
        .get_or_load(key, tags, || async {
            let product = sqlx::query_as::<_, Product>(
                "SELECT id, user_id, name, url, description, created_at, updated_at \
                 FROM products WHERE id = $1 AND user_id = $2",
            )
            .bind(id)
            .bind(user_id)
            .fetch_optional(pool)
            .await?;
            Ok(product)
        })
        .await
}

/// How many products the user has (quota check)
pub async fn get_product_count(
    pool: &PgPool,
    cache: &DbCache,
    user_id: &str,
) -> Result<i64, ServiceError> {
    let key = format!("products:count:user={user_id}");
    let tags = vec![user_tag(user_id, CacheKind::Products)];

    cache
        .get_or_load(key, tags, || async {
            let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products WHERE user_id = $1")
                .bind(user_id)
                .fetch_one(pool)
                .await?;
            Ok(count)
        })
        .await
}

async fn insert_product(
    conn: &mut sqlx::PgConnection,
    user_id: &str,
    data: &ProductWrite,
) -> Result<Product, sqlx::Error> {
    sqlx::query_as::<_, Product>(
        "INSERT INTO products (user_id, name, url, description) \
         VALUES ($1, $2, $3, $4) \
         RETURNING id, user_id, name, url, description, created_at, updated_at",
    )
    .bind(user_id)
    .bind(&data.name)
    .bind(remove_trailing_slash(&data.url))
    .bind(&data.description)
    .fetch_one(conn)
    .await
}

async fn seed_customization(
    conn: &mut sqlx::PgConnection,
    product_id: Uuid,
) -> Result<(), sqlx::Error> {
    let defaults = ProductCustomization::defaults(product_id);
    sqlx::query(
        "INSERT INTO product_customizations \
         (product_id, location_message, background_color, text_color, font_size, banner_container, is_sticky, class_prefix) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
         ON CONFLICT (product_id) DO NOTHING",
    )
    .bind(defaults.product_id)
    .bind(&defaults.location_message)
    .bind(&defaults.background_color)
    .bind(&defaults.text_color)
    .bind(&defaults.font_size)
    .bind(&defaults.banner_container)
    .bind(defaults.is_sticky)
    .bind(&defaults.class_prefix)
    .execute(conn)
    .await?;
    Ok(())
}

/// Create a product and seed its default customization in one transaction:
/// either both rows exist afterwards or neither does.
pub async fn create_product(
    pool: &PgPool,
    cache: &DbCache,
    user_id: &str,
    data: &ProductWrite,
) -> Result<Product, ServiceError> {
    let mut tx = pool.begin().await?;

    let product = insert_product(&mut tx, user_id, data).await?;
    seed_customization(&mut tx, product.id).await?;

    tx.commit().await?;

    cache.invalidate(&CacheScope {
        kind: CacheKind::Products,
        user_id: Some(user_id),
        id: Some(product.id),
    });

    Ok(product)
}

/// Update a product's details, owner-scoped. Returns false when the
/// (id, user) pair matched nothing.
pub async fn update_product(
    pool: &PgPool,
    cache: &DbCache,
    id: Uuid,
    user_id: &str,
    data: &ProductWrite,
) -> Result<bool, ServiceError> {
    let result = sqlx::query(
        "UPDATE products \
         SET name = $1, url = $2, description = $3, updated_at = now() \
         WHERE id = $4 AND user_id = $5",
    )
    .bind(&data.name)
    .bind(remove_trailing_slash(&data.url))
    .bind(&data.description)
    .bind(id)
    .bind(user_id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Ok(false);
    }

    cache.invalidate(&CacheScope {
        kind: CacheKind::Products,
        user_id: Some(user_id),
        id: Some(id),
    });
    Ok(true)
}

/// Delete a product, owner-scoped; customization and discount overrides go
/// with it via ON DELETE CASCADE. Returns false when nothing matched.
pub async fn delete_product(
    pool: &PgPool,
    cache: &DbCache,
    id: Uuid,
    user_id: &str,
) -> Result<bool, ServiceError> {
    let result = sqlx::query("DELETE FROM products WHERE id = $1 AND user_id = $2")
        .bind(id)
        .bind(user_id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Ok(false);
    }

    cache.invalidate(&CacheScope {
        kind: CacheKind::Products,
        user_id: Some(user_id),
        id: Some(id),
    });
    Ok(true)
}

#[derive(sqlx::FromRow)]
struct ProductBannerRow {
    id: Uuid,
    user_id: String,
}

#[derive(sqlx::FromRow)]
struct CountryDiscountRow {
    country_id: Uuid,
    country_name: String,
    coupon: String,
    discount_percentage: f64,
}

/// Resolve everything the public banner needs in one cached read.
///
/// `product` stays empty unless the (id, url) pair matches a registered
/// product that has a customization row. `country` and `discount` are only
/// present when some discount override's group contains `country_code`.
pub async fn get_product_for_banner(
    pool: &PgPool,
    cache: &DbCache,
    id: Uuid,
    country_code: &str,
    url: &str,
) -> Result<BannerData, ServiceError> {
    let url = remove_trailing_slash(url).to_string();
    let country_code = country_code.to_uppercase();
    let key = format!("banner:product={id}:country={country_code}:url={url}");
    let tags = vec![
        id_tag(id, CacheKind::Products),
        global_tag(CacheKind::Countries),
        global_tag(CacheKind::CountryGroups),
    ];

    cache
        .get_or_load(key, tags, || async move {
            let row = sqlx::query_as::<_, ProductBannerRow>(
                "SELECT id, user_id FROM products WHERE id = $1 AND url = $2",
            )
            .bind(id)
            .bind(&url)
            .fetch_optional(pool)
            .await?;

            let Some(row) = row else {
                return Ok(BannerData::default());
            };

            let customization = sqlx::query_as::<_, ProductCustomization>(
                "SELECT product_id, location_message, background_color, text_color, \
                 font_size, banner_container, is_sticky, class_prefix \
                 FROM product_customizations WHERE product_id = $1",
            )
            .bind(row.id)
            .fetch_optional(pool)
            .await?;

            let Some(customization) = customization else {
                return Ok(BannerData::default());
            };

            let matched = sqlx::query_as::<_, CountryDiscountRow>(
                "SELECT c.id AS country_id, c.name AS country_name, \
                 d.coupon, d.discount_percentage \
                 FROM country_group_discounts d \
                 JOIN countries c ON c.country_group_id = d.country_group_id \
                 WHERE d.product_id = $1 AND c.code = $2 \
                 ORDER BY d.country_group_id \
                 LIMIT 1",
            )
            .bind(row.id)
            .bind(&country_code)
            .fetch_optional(pool)
            .await?;

            let (country, discount) = match matched {
                Some(m) => (
                    Some(BannerCountry {
                        id: m.country_id,
                        name: m.country_name,
                    }),
                    Some(DiscountSummary {
                        coupon: m.coupon,
                        discount_percentage: m.discount_percentage,
                    }),
                ),
                None => (None, None),
            };

            Ok(BannerData {
                product: Some(BannerProduct {
                    id: row.id,
                    user_id: row.user_id,
                    customization,
                }),
                country,
                discount,
            })
        })
        .await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(url: &str) -> ProductWrite {
        ProductWrite {
            name: "Course".to_string(),
            url: url.to_string(),
            description: String::new(),
        }
    }

    #[sqlx::test]
    async fn test_create_then_get_strips_trailing_slash(pool: PgPool) {
        let cache = DbCache::new();
        let created = create_product(&pool, &cache, "user-1", &write("https://example.com/course/"))
            .await
            .unwrap();

        let fetched = get_product(&pool, &cache, created.id, "user-1")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(fetched.url, "https://example.com/course");

        let seeded: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM product_customizations WHERE product_id = $1",
        )
        .bind(created.id)
        .fetch_one(&pool)
        .await
        .unwrap();
        assert_eq!(seeded, 1);
    }

    #[sqlx::test]
    async fn test_foreign_owned_delete_affects_nothing(pool: PgPool) {
        let cache = DbCache::new();
        let created = create_product(&pool, &cache, "owner", &write("https://example.com"))
            .await
            .unwrap();

        let deleted = delete_product(&pool, &cache, created.id, "intruder")
            .await
            .unwrap();
        assert!(!deleted);

        let still_there = get_product(&pool, &cache, created.id, "owner")
            .await
            .unwrap();
        assert!(still_there.is_some());
    }

    #[sqlx::test]
    async fn test_aborted_create_leaves_no_orphan(pool: PgPool) {
        let mut tx = pool.begin().await.unwrap();
        let product = insert_product(&mut tx, "user-1", &write("https://example.com"))
            .await
            .unwrap();
        // A failed customization seed aborts the transaction before commit
        drop(tx);

        let cache = DbCache::new();
        let listed = get_products(&pool, &cache, "user-1", None).await.unwrap();
        assert!(listed.is_empty());

        let fetched = get_product(&pool, &cache, product.id, "user-1")
            .await
            .unwrap();
        assert!(fetched.is_none());
    }

    #[sqlx::test]
    async fn test_banner_with_unmatched_country_keeps_product(pool: PgPool) {
        let cache = DbCache::new();
        let created = create_product(&pool, &cache, "owner", &write("https://example.com/shop"))
            .await
            .unwrap();

        // XX belongs to no group, and the URL carries a trailing slash the
        // lookup must normalize away
        let data = get_product_for_banner(
            &pool,
            &cache,
            created.id,
            "XX",
            "https://example.com/shop/",
        )
        .await
        .unwrap();

        assert!(data.product.is_some());
        assert!(data.country.is_none());
        assert!(data.discount.is_none());
    }
}
