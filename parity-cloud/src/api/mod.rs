//! API routes for parity-cloud

pub mod banner;
pub mod customization;
pub mod discounts;
pub mod health;
pub mod products;

use axum::routing::{get, put};
use axum::{Router, middleware};
use http::Method;
use shared::error::AppError;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::auth::user_auth::user_auth_middleware;
use crate::error::ServiceError;
use crate::state::AppState;

/// Create the combined router
pub fn create_router(state: AppState) -> Router {
    // Public banner endpoints (consumed by merchant sites, no auth).
    // Any origin: the embed script runs on arbitrary merchant domains.
    let public = Router::new()
        .route("/api/products/{id}/banner-data", get(banner::banner_data))
        .route("/api/products/{id}/banner", get(banner::banner_script))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods([Method::GET]),
        );

    // Merchant dashboard API (JWT authenticated)
    let dashboard = Router::new()
        .route(
            "/api/products",
            get(products::list_products).post(products::create_product),
        )
        .route(
            "/api/products/{id}",
            get(products::get_product)
                .put(products::update_product)
                .delete(products::delete_product),
        )
        .route(
            "/api/products/{id}/country-groups",
            get(discounts::list_country_groups),
        )
        .route(
            "/api/products/{id}/country-discounts",
            put(discounts::save_country_discounts),
        )
        .route(
            "/api/products/{id}/customization",
            get(customization::get_customization).put(customization::save_customization),
        )
        .layer(middleware::from_fn_with_state(
            state.clone(),
            user_auth_middleware,
        ));

    Router::new()
        .route("/health", get(health::health_check))
        .merge(public)
        .merge(dashboard)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Collapse a mutation failure to the action's generic message while
/// keeping the internal error code (and its HTTP status) intact.
pub(crate) fn action_error(err: ServiceError, message: &str) -> AppError {
    let app = AppError::from(err);
    AppError::with_message(app.code, message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::error::ErrorCode;

    #[test]
    fn test_action_error_keeps_code() {
        let err = ServiceError::App(AppError::new(ErrorCode::ProductLimitReached));
        let out = action_error(err, "There was an error creating your product");
        assert_eq!(out.code, ErrorCode::ProductLimitReached);
        assert_eq!(out.message, "There was an error creating your product");
    }

    #[test]
    fn test_action_error_masks_db_details() {
        let err = ServiceError::Db("connection reset".into());
        let out = action_error(err, "There was an error updating your product");
        assert_eq!(out.code, ErrorCode::InternalError);
        assert!(!out.message.contains("connection reset"));
    }
}
