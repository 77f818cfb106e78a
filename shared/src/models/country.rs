//! Country, country group, and discount models

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Country group entity (e.g. a purchasing-power band)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct CountryGroup {
    pub id: Uuid,
    pub name: String,
    /// Suggested discount as a fraction (0–1), if any
    pub recommended_discount_percentage: Option<f64>,
}

/// Country entity; belongs to exactly one group
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Country {
    pub id: Uuid,
    pub name: String,
    /// ISO-2 country code
    pub code: String,
    pub country_group_id: Uuid,
}

/// Merchant discount override, composite-keyed by (product, group)
///
/// Only exists when the merchant overrides the recommended discount:
/// a row always carries a non-empty coupon and a positive percentage.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct CountryGroupDiscount {
    pub country_group_id: Uuid,
    pub product_id: Uuid,
    pub coupon: String,
    /// Fraction (0–1); edited as 0–100 in the dashboard
    pub discount_percentage: f64,
}

/// Country summary carried inside group views
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CountrySummary {
    pub name: String,
    pub code: String,
}

/// Discount summary carried inside group and banner views
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscountSummary {
    pub coupon: String,
    pub discount_percentage: f64,
}

/// One country group as shown on the product's discounts tab:
/// the group, its countries, and this product's override if present
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CountryGroupView {
    pub id: Uuid,
    pub name: String,
    pub recommended_discount_percentage: Option<f64>,
    pub countries: Vec<CountrySummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount: Option<DiscountSummary>,
}
