//! Subcategory read endpoints.
//!
//! ```text
//! GET /api/v1/subcategories?category=…
//! GET /api/v1/subcategories/{id}
//! ```
//!
//! Both routes populate the two-level chain: the parent category with its
//! own department nested inside.

use actix_web::{HttpResponse, get, web};
use pagination::PageInfo;
use serde::Deserialize;
use serde_json::Value;
use utoipa::IntoParams;

use crate::domain::{EntityType, FieldSpec, FieldSpecError, RefMatch, Resolution};
use crate::inbound::http::envelope::Envelope;
use crate::inbound::http::error::{ApiError, ApiResult};
use crate::inbound::http::params::ListParams;
use crate::inbound::http::state::HttpState;

const SORT_FIELDS: &[&str] = &["name", "sequence"];

/// Filter parameters specific to subcategory listings.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct SubCategoryFilterParams {
    /// Parent category, as a native key or legacy `idcategory_master` code.
    pub category: Option<String>,
}

fn chain_spec() -> Result<FieldSpec, FieldSpecError> {
    FieldSpec::new("parentRef", EntityType::Category)
        .with_nested(FieldSpec::new("department", EntityType::Department))
}

/// List subcategories, optionally constrained to one category.
#[utoipa::path(
    get,
    path = "/api/v1/subcategories",
    params(ListParams, SubCategoryFilterParams),
    responses(
        (status = 200, description = "One page of subcategories with the category chain populated"),
        (status = 400, description = "Invalid pagination or sort parameters"),
        (status = 500, description = "Store unavailable")
    ),
    tags = ["subcategories"],
    operation_id = "listSubcategories"
)]
#[get("/api/v1/subcategories")]
pub async fn list_subcategories(
    state: web::Data<HttpState>,
    query: web::Query<ListParams>,
    filter: web::Query<SubCategoryFilterParams>,
) -> ApiResult<HttpResponse> {
    let window = query.window()?;
    let sort = query.sort(SORT_FIELDS, "sequence")?;

    let parent = match state
        .resolver()
        .resolve(EntityType::Category, filter.category.as_deref())
        .await?
    {
        Resolution::Absent => None,
        Resolution::Unresolved { .. } => {
            let info = PageInfo::for_page(&window, 0);
            return Ok(HttpResponse::Ok().json(Envelope::page(Vec::<Value>::new(), info)));
        }
        Resolution::Resolved(ref resolved) => Some(RefMatch::from(resolved)),
    };

    let page = state
        .catalog
        .list_references(EntityType::SubCategory, parent.as_ref(), &sort, &window)
        .await?;

    let records = page
        .records
        .iter()
        .map(serde_json::to_value)
        .collect::<Result<Vec<_>, _>>()
        .map_err(|err| ApiError::internal(err.to_string()))?;
    let populated = state
        .populator()
        .populate_many(records, &[chain_spec()?])
        .await?;

    let info = PageInfo::for_page(&window, page.total);
    Ok(HttpResponse::Ok().json(Envelope::page(populated, info)))
}

/// Fetch one subcategory by native key or legacy code.
#[utoipa::path(
    get,
    path = "/api/v1/subcategories/{id}",
    params(("id" = String, Path, description = "Native key or legacy idsub_category_master code")),
    responses(
        (status = 200, description = "The subcategory with the category chain populated"),
        (status = 404, description = "No subcategory matches the identifier"),
        (status = 500, description = "Store unavailable")
    ),
    tags = ["subcategories"],
    operation_id = "getSubcategory"
)]
#[get("/api/v1/subcategories/{id}")]
pub async fn get_subcategory(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = path.into_inner();
    let resolved = match state
        .resolver()
        .resolve(EntityType::SubCategory, Some(id.as_str()))
        .await?
    {
        Resolution::Resolved(resolved) => resolved,
        Resolution::Unresolved { .. } | Resolution::Absent => {
            return Err(ApiError::not_found(format!(
                "no subcategory matches `{id}`"
            )));
        }
    };

    let record =
        serde_json::to_value(&resolved.entity).map_err(|err| ApiError::internal(err.to_string()))?;
    let populated = state.populator().populate(record, &[chain_spec()?]).await?;
    Ok(HttpResponse::Ok().json(Envelope::ok(populated)))
}
