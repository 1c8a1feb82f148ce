//! Department read endpoints.
//!
//! ```text
//! GET /api/v1/departments
//! GET /api/v1/departments/{id}
//! ```
//!
//! Departments sit at the top of the hierarchy, so listings need no
//! population; the detail route accepts either a native key or a legacy
//! `department_id` code.

use actix_web::{HttpResponse, get, web};
use pagination::PageInfo;

use crate::domain::{EntityType, Resolution};
use crate::inbound::http::envelope::Envelope;
use crate::inbound::http::error::{ApiError, ApiResult};
use crate::inbound::http::params::ListParams;
use crate::inbound::http::state::HttpState;

const SORT_FIELDS: &[&str] = &["name", "sequence"];

/// List departments.
#[utoipa::path(
    get,
    path = "/api/v1/departments",
    params(ListParams),
    responses(
        (status = 200, description = "One page of departments"),
        (status = 400, description = "Invalid pagination or sort parameters"),
        (status = 500, description = "Store unavailable")
    ),
    tags = ["departments"],
    operation_id = "listDepartments"
)]
#[get("/api/v1/departments")]
pub async fn list_departments(
    state: web::Data<HttpState>,
    query: web::Query<ListParams>,
) -> ApiResult<HttpResponse> {
    let window = query.window()?;
    let sort = query.sort(SORT_FIELDS, "sequence")?;

    let page = state
        .catalog
        .list_references(EntityType::Department, None, &sort, &window)
        .await?;

    let info = PageInfo::for_page(&window, page.total);
    Ok(HttpResponse::Ok().json(Envelope::page(page.records, info)))
}

/// Fetch one department by native key or legacy code.
#[utoipa::path(
    get,
    path = "/api/v1/departments/{id}",
    params(("id" = String, Path, description = "Native key or legacy department_id code")),
    responses(
        (status = 200, description = "The department"),
        (status = 404, description = "No department matches the identifier"),
        (status = 500, description = "Store unavailable")
    ),
    tags = ["departments"],
    operation_id = "getDepartment"
)]
#[get("/api/v1/departments/{id}")]
pub async fn get_department(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = path.into_inner();
    match state
        .resolver()
        .resolve(EntityType::Department, Some(id.as_str()))
        .await?
    {
        Resolution::Resolved(resolved) => {
            Ok(HttpResponse::Ok().json(Envelope::ok(resolved.entity)))
        }
        Resolution::Unresolved { .. } | Resolution::Absent => Err(ApiError::not_found(format!(
            "no department matches `{id}`"
        ))),
    }
}
