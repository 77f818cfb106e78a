//! Product CRUD for the merchant dashboard
//!
//! Mutations follow a fixed pipeline: validate the payload, authorize the
//! capability, then hit the data layer. Failures surface as the action's
//! generic message regardless of cause; the internal code only drives the
//! HTTP status.

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    response::IntoResponse,
};
use http::{StatusCode, header};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use shared::error::{ActionResult, AppError, ErrorCode};
use shared::models::product::Product;

use crate::auth::user_auth::UserIdentity;
use crate::auth::{Capability, authorize};
use crate::db::products::{self, ProductWrite};
use crate::state::AppState;

use super::action_error;

type ApiResult<T> = Result<Json<T>, AppError>;

const CREATE_ERROR: &str = "There was an error creating your product";
const UPDATE_ERROR: &str = "There was an error updating your product";
const DELETE_ERROR: &str = "There was an error deleting your product";

/// Product details payload (create and update)
#[derive(Debug, Deserialize, Validate)]
pub struct ProductDetailsRequest {
    #[validate(length(min = 1, message = "Product name is required"))]
    pub name: String,
    #[validate(url(message = "Product URL must be a valid URL"))]
    pub url: String,
    pub description: Option<String>,
}

impl ProductDetailsRequest {
    fn into_write(self) -> ProductWrite {
        ProductWrite {
            name: self.name,
            url: self.url,
            description: self.description.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub limit: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct CreatedProduct {
    pub id: Uuid,
}

pub async fn list_products(
    State(state): State<AppState>,
    Extension(identity): Extension<UserIdentity>,
    Query(params): Query<ListParams>,
) -> ApiResult<Vec<Product>> {
    let products =
        products::get_products(&state.pool, &state.cache, &identity.user_id, params.limit).await?;
    Ok(Json(products))
}

pub async fn get_product(
    State(state): State<AppState>,
    Extension(identity): Extension<UserIdentity>,
    Path(id): Path<Uuid>,
) -> ApiResult<Product> {
    let product = products::get_product(&state.pool, &state.cache, id, &identity.user_id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::ProductNotFound))?;
    Ok(Json(product))
}

pub async fn create_product(
    State(state): State<AppState>,
    Extension(identity): Extension<UserIdentity>,
    Json(req): Json<ProductDetailsRequest>,
) -> Result<impl IntoResponse, AppError> {
    req.validate()
        .map_err(|_| AppError::with_message(ErrorCode::ValidationFailed, CREATE_ERROR))?;

    authorize(&state.pool, &state.cache, &identity.user_id, Capability::CreateProduct)
        .await
        .map_err(|e| action_error(e, CREATE_ERROR))?;

    let product =
        products::create_product(&state.pool, &state.cache, &identity.user_id, &req.into_write())
            .await
            .map_err(|e| action_error(e, CREATE_ERROR))?;

    let location = format!("/dashboard/products/{}/edit?tab=countries", product.id);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(CreatedProduct { id: product.id }),
    ))
}

pub async fn update_product(
    State(state): State<AppState>,
    Extension(identity): Extension<UserIdentity>,
    Path(id): Path<Uuid>,
    Json(req): Json<ProductDetailsRequest>,
) -> ApiResult<ActionResult> {
    req.validate()
        .map_err(|_| AppError::with_message(ErrorCode::ValidationFailed, UPDATE_ERROR))?;

    authorize(&state.pool, &state.cache, &identity.user_id, Capability::ManageOwnProducts)
        .await
        .map_err(|e| action_error(e, UPDATE_ERROR))?;

    let updated =
        products::update_product(&state.pool, &state.cache, id, &identity.user_id, &req.into_write())
            .await
            .map_err(|e| action_error(e, UPDATE_ERROR))?;

    if !updated {
        return Err(AppError::with_message(ErrorCode::ProductNotFound, UPDATE_ERROR));
    }
    Ok(Json(ActionResult::ok("Product details updated")))
}

pub async fn delete_product(
    State(state): State<AppState>,
    Extension(identity): Extension<UserIdentity>,
    Path(id): Path<Uuid>,
) -> ApiResult<ActionResult> {
    authorize(&state.pool, &state.cache, &identity.user_id, Capability::ManageOwnProducts)
        .await
        .map_err(|e| action_error(e, DELETE_ERROR))?;

    let deleted = products::delete_product(&state.pool, &state.cache, id, &identity.user_id)
        .await
        .map_err(|e| action_error(e, DELETE_ERROR))?;

    if !deleted {
        return Err(AppError::with_message(ErrorCode::ProductNotFound, DELETE_ERROR));
    }
    Ok(Json(ActionResult::ok("Successfully deleted your product")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_details_request_rejects_empty_name() {
        let req = ProductDetailsRequest {
            name: String::new(),
            url: "https://example.com".to_string(),
            description: None,
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_details_request_rejects_bad_url() {
        let req = ProductDetailsRequest {
            name: "Course".to_string(),
            url: "not a url".to_string(),
            description: None,
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_details_request_accepts_valid_payload() {
        let req = ProductDetailsRequest {
            name: "Course".to_string(),
            url: "https://example.com/course".to_string(),
            description: Some("A course".to_string()),
        };
        assert!(req.validate().is_ok());
    }
}
