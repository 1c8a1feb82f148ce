//! Banner read endpoint.
//!
//! ```text
//! GET /api/v1/banners
//! ```
//!
//! Banners carry no reference fields; this is the one list that skips the
//! resolver entirely.

use actix_web::{HttpResponse, get, web};
use pagination::PageInfo;

use crate::inbound::http::envelope::Envelope;
use crate::inbound::http::error::ApiResult;
use crate::inbound::http::params::ListParams;
use crate::inbound::http::state::HttpState;

/// List banners in display order.
#[utoipa::path(
    get,
    path = "/api/v1/banners",
    params(ListParams),
    responses(
        (status = 200, description = "One page of banners"),
        (status = 400, description = "Invalid pagination parameters"),
        (status = 500, description = "Store unavailable")
    ),
    tags = ["banners"],
    operation_id = "listBanners"
)]
#[get("/api/v1/banners")]
pub async fn list_banners(
    state: web::Data<HttpState>,
    query: web::Query<ListParams>,
) -> ApiResult<HttpResponse> {
    let window = query.window()?;
    let page = state.catalog.list_banners(&window).await?;
    let info = PageInfo::for_page(&window, page.total);
    Ok(HttpResponse::Ok().json(Envelope::page(page.records, info)))
}
