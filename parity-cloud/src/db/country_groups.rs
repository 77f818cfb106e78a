//! Country groups and per-product discount overrides

use std::collections::HashMap;

use sqlx::PgPool;
use uuid::Uuid;

use shared::models::country::{
    CountryGroup, CountryGroupDiscount, CountryGroupView, CountrySummary, DiscountSummary,
};

use crate::cache::{CacheKind, CacheScope, DbCache, global_tag, id_tag};
use crate::db::products;
use crate::error::ServiceError;

/// A discount override to write, already converted to a 0-1 fraction
#[derive(Debug, Clone)]
pub struct DiscountUpsert {
    pub country_group_id: Uuid,
    pub coupon: String,
    pub discount_percentage: f64,
}

#[derive(sqlx::FromRow)]
struct CountryRow {
    name: String,
    code: String,
    country_group_id: Uuid,
}

/// All country groups with their countries and, where present, this
/// product's override. An empty vec when the product is not the caller's.
pub async fn get_product_country_groups(
    pool: &PgPool,
    cache: &DbCache,
    product_id: Uuid,
    user_id: &str,
) -> Result<Vec<CountryGroupView>, ServiceError> {
    if products::get_product(pool, cache, product_id, user_id)
        .await?
        .is_none()
    {
        return Ok(Vec::new());
    }

    let key = format!("country-groups:product={product_id}");
    let tags = vec![
        id_tag(product_id, CacheKind::Products),
        global_tag(CacheKind::Countries),
        global_tag(CacheKind::CountryGroups),
    ];

    cache
        .get_or_load(key, tags, || async {
            let groups = sqlx::query_as::<_, CountryGroup>(
                "SELECT id, name, recommended_discount_percentage \
                 FROM country_groups ORDER BY name",
            )
            .fetch_all(pool)
            .await?;

            let countries = sqlx::query_as::<_, CountryRow>(
                "SELECT name, code, country_group_id FROM countries ORDER BY name",
            )
            .fetch_all(pool)
            .await?;

            let discounts = sqlx::query_as::<_, CountryGroupDiscount>(
                "SELECT country_group_id, product_id, coupon, discount_percentage \
                 FROM country_group_discounts WHERE product_id = $1",
            )
            .bind(product_id)
            .fetch_all(pool)
            .await?;

            let mut by_group: HashMap<Uuid, Vec<CountrySummary>> = HashMap::new();
            for c in countries {
                by_group.entry(c.country_group_id).or_default().push(CountrySummary {
                    name: c.name,
                    code: c.code,
                });
            }

            let mut overrides: HashMap<Uuid, DiscountSummary> = discounts
                .into_iter()
                .map(|d| {
                    (
                        d.country_group_id,
                        DiscountSummary {
                            coupon: d.coupon,
                            discount_percentage: d.discount_percentage,
                        },
                    )
                })
                .collect();

            Ok(groups
                .into_iter()
                .map(|g| CountryGroupView {
                    countries: by_group.remove(&g.id).unwrap_or_default(),
                    discount: overrides.remove(&g.id),
                    id: g.id,
                    name: g.name,
                    recommended_discount_percentage: g.recommended_discount_percentage,
                })
                .collect())
        })
        .await
}

/// Apply a discounts-tab save in one transaction: delete the named groups'
/// overrides, then upsert the rest keyed on (group, product). Returns false
/// when the product is not the caller's; nothing is written in that case.
pub async fn update_country_discounts(
    pool: &PgPool,
    cache: &DbCache,
    product_id: Uuid,
    user_id: &str,
    upserts: &[DiscountUpsert],
    deletes: &[Uuid],
) -> Result<bool, ServiceError> {
    if products::get_product(pool, cache, product_id, user_id)
        .await?
        .is_none()
    {
        return Ok(false);
    }

    let mut tx = pool.begin().await?;

    if !deletes.is_empty() {
        sqlx::query(
            "DELETE FROM country_group_discounts \
             WHERE product_id = $1 AND country_group_id = ANY($2)",
        )
        .bind(product_id)
        .bind(deletes)
        .execute(&mut *tx)
        .await?;
    }

    if !upserts.is_empty() {
        let group_ids: Vec<Uuid> = upserts.iter().map(|u| u.country_group_id).collect();
        let coupons: Vec<String> = upserts.iter().map(|u| u.coupon.clone()).collect();
        let percentages: Vec<f64> = upserts.iter().map(|u| u.discount_percentage).collect();

        sqlx::query(
            "INSERT INTO country_group_discounts \
             (country_group_id, product_id, coupon, discount_percentage) \
             SELECT group_id, $1, coupon, pct \
             FROM UNNEST($2::uuid[], $3::text[], $4::double precision[]) \
             AS t(group_id, coupon, pct) \
             ON CONFLICT (country_group_id, product_id) DO UPDATE SET \
             coupon = EXCLUDED.coupon, \
             discount_percentage = EXCLUDED.discount_percentage",
        )
        .bind(product_id)
        .bind(&group_ids)
        .bind(&coupons)
        .bind(&percentages)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;

    cache.invalidate(&CacheScope {
        kind: CacheKind::Products,
        user_id: Some(user_id),
        id: Some(product_id),
    });

    Ok(true)
}
