//! Banner customization endpoints (Standard tier and up)

use axum::{
    Extension, Json,
    extract::{Path, State},
};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use shared::error::{ActionResult, AppError, ErrorCode};
use shared::models::customization::ProductCustomization;

use crate::auth::user_auth::UserIdentity;
use crate::auth::{Capability, authorize};
use crate::db::customizations::{self, CustomizationWrite};
use crate::state::AppState;

use super::action_error;

type ApiResult<T> = Result<Json<T>, AppError>;

const SAVE_ERROR: &str = "There was an error updating your banner";

#[derive(Debug, Deserialize, Validate)]
pub struct CustomizationRequest {
    #[validate(length(min = 1, message = "Banner message is required"))]
    pub location_message: String,
    #[validate(length(min = 1, message = "Background color is required"))]
    pub background_color: String,
    #[validate(length(min = 1, message = "Text color is required"))]
    pub text_color: String,
    #[validate(length(min = 1, message = "Font size is required"))]
    pub font_size: String,
    #[validate(length(min = 1, message = "Banner container is required"))]
    pub banner_container: String,
    pub is_sticky: bool,
    pub class_prefix: Option<String>,
}

impl CustomizationRequest {
    fn into_write(self) -> CustomizationWrite {
        CustomizationWrite {
            location_message: self.location_message,
            background_color: self.background_color,
            text_color: self.text_color,
            font_size: self.font_size,
            banner_container: self.banner_container,
            is_sticky: self.is_sticky,
            class_prefix: self.class_prefix.filter(|p| !p.is_empty()),
        }
    }
}

pub async fn get_customization(
    State(state): State<AppState>,
    Extension(identity): Extension<UserIdentity>,
    Path(id): Path<Uuid>,
) -> ApiResult<ProductCustomization> {
    let customization =
        customizations::get_product_customization(&state.pool, &state.cache, id, &identity.user_id)
            .await?
            .ok_or_else(|| AppError::new(ErrorCode::CustomizationNotFound))?;
    Ok(Json(customization))
}

pub async fn save_customization(
    State(state): State<AppState>,
    Extension(identity): Extension<UserIdentity>,
    Path(id): Path<Uuid>,
    Json(req): Json<CustomizationRequest>,
) -> ApiResult<ActionResult> {
    req.validate()
        .map_err(|_| AppError::with_message(ErrorCode::ValidationFailed, SAVE_ERROR))?;

    authorize(&state.pool, &state.cache, &identity.user_id, Capability::CustomizeBanner)
        .await
        .map_err(|e| action_error(e, SAVE_ERROR))?;

    let updated = customizations::update_product_customization(
        &state.pool,
        &state.cache,
        id,
        &identity.user_id,
        &req.into_write(),
    )
    .await
    .map_err(|e| action_error(e, SAVE_ERROR))?;

    if !updated {
        return Err(AppError::with_message(ErrorCode::ProductNotFound, SAVE_ERROR));
    }
    Ok(Json(ActionResult::ok("Banner updated")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_request() -> CustomizationRequest {
        CustomizationRequest {
            location_message: "Use {coupon} for {discount}% off in {country}".to_string(),
            background_color: "hsl(193, 82%, 31%)".to_string(),
            text_color: "hsl(0, 0%, 100%)".to_string(),
            font_size: "1rem".to_string(),
            banner_container: "body".to_string(),
            is_sticky: true,
            class_prefix: None,
        }
    }

    #[test]
    fn test_valid_request_passes() {
        assert!(valid_request().validate().is_ok());
    }

    #[test]
    fn test_empty_message_rejected() {
        let mut req = valid_request();
        req.location_message = String::new();
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_empty_class_prefix_normalized_to_none() {
        let mut req = valid_request();
        req.class_prefix = Some(String::new());
        assert!(req.into_write().class_prefix.is_none());
    }
}
