//! Category read endpoints.
//!
//! ```text
//! GET /api/v1/categories?department=…
//! GET /api/v1/categories/{id}
//! ```
//!
//! The `department` filter accepts a native key or a legacy code and is
//! normalized before querying; listings and details embed the populated
//! parent department.

use actix_web::{HttpResponse, get, web};
use pagination::PageInfo;
use serde::Deserialize;
use serde_json::Value;
use utoipa::IntoParams;

use crate::domain::{EntityType, FieldSpec, RefMatch, Resolution};
use crate::inbound::http::envelope::Envelope;
use crate::inbound::http::error::{ApiError, ApiResult};
use crate::inbound::http::params::ListParams;
use crate::inbound::http::state::HttpState;

const SORT_FIELDS: &[&str] = &["name", "sequence"];

/// Filter parameters specific to category listings.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct CategoryFilterParams {
    /// Parent department, as a native key or legacy `department_id` code.
    pub department: Option<String>,
}

fn parent_spec() -> FieldSpec {
    FieldSpec::new("parentRef", EntityType::Department)
}

/// List categories, optionally constrained to one department.
#[utoipa::path(
    get,
    path = "/api/v1/categories",
    params(ListParams, CategoryFilterParams),
    responses(
        (status = 200, description = "One page of categories with their department populated"),
        (status = 400, description = "Invalid pagination or sort parameters"),
        (status = 500, description = "Store unavailable")
    ),
    tags = ["categories"],
    operation_id = "listCategories"
)]
#[get("/api/v1/categories")]
pub async fn list_categories(
    state: web::Data<HttpState>,
    query: web::Query<ListParams>,
    filter: web::Query<CategoryFilterParams>,
) -> ApiResult<HttpResponse> {
    let window = query.window()?;
    let sort = query.sort(SORT_FIELDS, "sequence")?;

    let parent = match state
        .resolver()
        .resolve(EntityType::Department, filter.department.as_deref())
        .await?
    {
        Resolution::Absent => None,
        // An unknown department filter yields an empty page, not a raw
        // string pushed into the store.
        Resolution::Unresolved { .. } => {
            let info = PageInfo::for_page(&window, 0);
            return Ok(HttpResponse::Ok().json(Envelope::page(Vec::<Value>::new(), info)));
        }
        Resolution::Resolved(ref resolved) => Some(RefMatch::from(resolved)),
    };

    let page = state
        .catalog
        .list_references(EntityType::Category, parent.as_ref(), &sort, &window)
        .await?;

    let records = page
        .records
        .iter()
        .map(serde_json::to_value)
        .collect::<Result<Vec<_>, _>>()
        .map_err(|err| ApiError::internal(err.to_string()))?;
    let populated = state
        .populator()
        .populate_many(records, &[parent_spec()])
        .await?;

    let info = PageInfo::for_page(&window, page.total);
    Ok(HttpResponse::Ok().json(Envelope::page(populated, info)))
}

/// Fetch one category by native key or legacy code.
#[utoipa::path(
    get,
    path = "/api/v1/categories/{id}",
    params(("id" = String, Path, description = "Native key or legacy idcategory_master code")),
    responses(
        (status = 200, description = "The category with its department populated"),
        (status = 404, description = "No category matches the identifier"),
        (status = 500, description = "Store unavailable")
    ),
    tags = ["categories"],
    operation_id = "getCategory"
)]
#[get("/api/v1/categories/{id}")]
pub async fn get_category(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = path.into_inner();
    let resolved = match state
        .resolver()
        .resolve(EntityType::Category, Some(id.as_str()))
        .await?
    {
        Resolution::Resolved(resolved) => resolved,
        Resolution::Unresolved { .. } | Resolution::Absent => {
            return Err(ApiError::not_found(format!("no category matches `{id}`")));
        }
    };

    let record =
        serde_json::to_value(&resolved.entity).map_err(|err| ApiError::internal(err.to_string()))?;
    let populated = state.populator().populate(record, &[parent_spec()]).await?;
    Ok(HttpResponse::Ok().json(Envelope::ok(populated)))
}
