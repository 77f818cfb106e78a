//! Country discounts tab: group listing and override saves
//!
//! Discounts are edited as 0-100 percentages but stored as 0-1 fractions;
//! the conversion happens here, at the mutation boundary. A group entry
//! without both a coupon and a positive percentage means "no override",
//! which maps to a delete.

use axum::{
    Extension, Json,
    extract::{Path, State},
};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use shared::error::{ActionResult, AppError, ErrorCode};
use shared::models::country::CountryGroupView;

use crate::auth::user_auth::UserIdentity;
use crate::auth::{Capability, authorize};
use crate::db::country_groups::{self, DiscountUpsert};
use crate::state::AppState;

use super::action_error;

type ApiResult<T> = Result<Json<T>, AppError>;

const SAVE_ERROR: &str = "There was an error saving your country discounts";

/// One group's edited state as submitted by the discounts tab
#[derive(Debug, Deserialize, Validate)]
pub struct DiscountGroupEntry {
    pub country_group_id: Uuid,
    pub coupon: Option<String>,
    /// Percentage as edited, 0-100
    #[validate(range(min = 0.0, max = 100.0, message = "Discount must be between 0 and 100"))]
    pub discount_percentage: Option<f64>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CountryDiscountsRequest {
    #[validate(nested)]
    pub groups: Vec<DiscountGroupEntry>,
}

/// Split submitted entries into overrides to upsert (converted to
/// fractions) and groups whose override is cleared
fn partition_groups(groups: &[DiscountGroupEntry]) -> (Vec<DiscountUpsert>, Vec<Uuid>) {
    let mut upserts = Vec::new();
    let mut deletes = Vec::new();

    for entry in groups {
        let coupon = entry.coupon.as_deref().unwrap_or("").trim();
        let percentage = entry.discount_percentage.unwrap_or(0.0);
        if !coupon.is_empty() && percentage > 0.0 {
            upserts.push(DiscountUpsert {
                country_group_id: entry.country_group_id,
                coupon: coupon.to_string(),
                discount_percentage: percentage / 100.0,
            });
        } else {
            deletes.push(entry.country_group_id);
        }
    }

    (upserts, deletes)
}

pub async fn list_country_groups(
    State(state): State<AppState>,
    Extension(identity): Extension<UserIdentity>,
    Path(id): Path<Uuid>,
) -> ApiResult<Vec<CountryGroupView>> {
    let groups =
        country_groups::get_product_country_groups(&state.pool, &state.cache, id, &identity.user_id)
            .await?;
    Ok(Json(groups))
}

pub async fn save_country_discounts(
    State(state): State<AppState>,
    Extension(identity): Extension<UserIdentity>,
    Path(id): Path<Uuid>,
    Json(req): Json<CountryDiscountsRequest>,
) -> ApiResult<ActionResult> {
    req.validate()
        .map_err(|_| AppError::with_message(ErrorCode::ValidationFailed, SAVE_ERROR))?;

    authorize(&state.pool, &state.cache, &identity.user_id, Capability::ManageOwnProducts)
        .await
        .map_err(|e| action_error(e, SAVE_ERROR))?;

    let (upserts, deletes) = partition_groups(&req.groups);

    let saved = country_groups::update_country_discounts(
        &state.pool,
        &state.cache,
        id,
        &identity.user_id,
        &upserts,
        &deletes,
    )
    .await
    .map_err(|e| action_error(e, SAVE_ERROR))?;

    if !saved {
        return Err(AppError::with_message(ErrorCode::ProductNotFound, SAVE_ERROR));
    }
    Ok(Json(ActionResult::ok("Country discounts saved")))
}
