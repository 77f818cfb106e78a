//! Banner customization model

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Per-product banner customization (1:1 with product)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct ProductCustomization {
    pub product_id: Uuid,
    /// Banner text template with `{country}`, `{coupon}`, `{discount}` placeholders
    pub location_message: String,
    pub background_color: String,
    pub text_color: String,
    pub font_size: String,
    /// CSS selector of the element the banner is injected into
    pub banner_container: String,
    pub is_sticky: bool,
    /// Optional prefix applied to every generated CSS class
    pub class_prefix: Option<String>,
}

/// Defaults seeded when a product is created
pub const DEFAULT_LOCATION_MESSAGE: &str = "Hey! It looks like you are from <b>{country}</b>. \
We support Parity Purchasing Power, so if you need it, use code <b>\"{coupon}\"</b> \
to get <b>{discount}%</b> off.";
pub const DEFAULT_BACKGROUND_COLOR: &str = "hsl(193, 82%, 31%)";
pub const DEFAULT_TEXT_COLOR: &str = "hsl(0, 0%, 100%)";
pub const DEFAULT_FONT_SIZE: &str = "1rem";
pub const DEFAULT_BANNER_CONTAINER: &str = "body";

impl ProductCustomization {
    /// Default customization for a freshly created product
    pub fn defaults(product_id: Uuid) -> Self {
        Self {
            product_id,
            location_message: DEFAULT_LOCATION_MESSAGE.to_string(),
            background_color: DEFAULT_BACKGROUND_COLOR.to_string(),
            text_color: DEFAULT_TEXT_COLOR.to_string(),
            font_size: DEFAULT_FONT_SIZE.to_string(),
            banner_container: DEFAULT_BANNER_CONTAINER.to_string(),
            is_sticky: true,
            class_prefix: None,
        }
    }
}
