//! Banner resolution payloads
//!
//! The public banner-data endpoint answers with this shape; the embed
//! script polls it to decide whether and how to render a banner.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::country::DiscountSummary;
use super::customization::ProductCustomization;

/// Product slice exposed to the banner (owner id is needed for the
/// branding entitlement lookup, never rendered)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BannerProduct {
    pub id: Uuid,
    pub user_id: String,
    pub customization: ProductCustomization,
}

/// Country that matched the visitor's code
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BannerCountry {
    pub id: Uuid,
    pub name: String,
}

/// Banner resolution result
///
/// `product` is present whenever the (id, url) pair matched; `country`
/// and `discount` only when some discount's group contains the visitor's
/// country code.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BannerData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product: Option<BannerProduct>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<BannerCountry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount: Option<DiscountSummary>,
}
