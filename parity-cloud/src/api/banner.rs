//! Public banner endpoints
//!
//! `banner_data` answers JSON for clients that render themselves;
//! `banner_script` answers a small JS snippet that injects the rendered
//! banner into the page, which is what the copy-paste embed tag loads.

use axum::{
    Json,
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
};
use http::{StatusCode, header};
use serde::Deserialize;
use uuid::Uuid;

use shared::banner::{BannerMappings, format_discount_percent, render_banner, substitute_message};
use shared::error::{AppError, ErrorCode};
use shared::models::banner::BannerData;

use crate::auth::permissions::can_remove_branding;
use crate::db::products;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct BannerQuery {
    #[serde(rename = "countryCode")]
    pub country_code: String,
    pub url: String,
}

pub async fn banner_data(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<BannerQuery>,
) -> Result<Json<BannerData>, AppError> {
    let data = products::get_product_for_banner(
        &state.pool,
        &state.cache,
        id,
        &query.country_code,
        &query.url,
    )
    .await?;
    Ok(Json(data))
}

pub async fn banner_script(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<BannerQuery>,
) -> Result<Response, AppError> {
    let data = products::get_product_for_banner(
        &state.pool,
        &state.cache,
        id,
        &query.country_code,
        &query.url,
    )
    .await?;

    let Some(product) = data.product else {
        return Err(AppError::new(ErrorCode::ProductNotFound));
    };

    // Visitor's country carries no discount: serve an empty script so the
    // embed stays silent instead of erroring on the merchant's page.
    let (Some(country), Some(discount)) = (data.country, data.discount) else {
        return Ok(script_response(String::new()));
    };

    let remove_branding =
        can_remove_branding(&state.pool, &state.cache, &product.user_id).await?;

    let mappings = BannerMappings {
        country: country.name,
        coupon: discount.coupon,
        discount: format_discount_percent(discount.discount_percentage),
    };
    let message = substitute_message(&product.customization.location_message, &mappings);
    let html = render_banner(
        &product.customization,
        &message,
        remove_branding,
        &state.server_url,
    );

    Ok(script_response(embed_snippet(
        &html,
        &product.customization.banner_container,
    )))
}

fn script_response(body: String) -> Response {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/javascript; charset=utf-8")],
        body,
    )
        .into_response()
}

/// Build the injection snippet: parse the banner markup into a detached
/// element and prepend its children into the configured container,
/// falling back to `document.body` when the selector matches nothing.
fn embed_snippet(html: &str, container_selector: &str) -> String {
    format!(
        "(function () {{\n\
         const wrapper = document.createElement('div');\n\
         wrapper.innerHTML = '{html}';\n\
         const container = document.querySelector('{selector}') ?? document.body;\n\
         container.prepend(...wrapper.children);\n\
         }})();\n",
        html = js_string_escape(html),
        selector = js_string_escape(container_selector),
    )
}

/// Escape a value for embedding in a single-quoted JS string literal
fn js_string_escape(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('\'', "\\'")
        .replace('\n', "\\n")
        .replace('\r', "")
}
