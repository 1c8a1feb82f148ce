//! Product read endpoints.
//!
//! ```text
//! GET /api/v1/products?department=…&category=…&subcategory=…&search=…
//! GET /api/v1/products/{key}
//! ```
//!
//! Products carry three independent reference fields. List queries go
//! through filter normalization first, then one batch population pass
//! over the whole page; the detail route additionally populates the
//! nested chains (category → department, subcategory → category →
//! department).

use actix_web::{HttpResponse, get, web};
use pagination::PageInfo;
use serde::Deserialize;
use serde_json::Value;
use utoipa::IntoParams;

use crate::domain::{
    CatalogFilter, EntityType, FieldSpec, FieldSpecError, NativeKey, NormalizedFilter,
};
use crate::inbound::http::envelope::Envelope;
use crate::inbound::http::error::{ApiError, ApiResult};
use crate::inbound::http::params::ListParams;
use crate::inbound::http::state::HttpState;

const SORT_FIELDS: &[&str] = &["name", "sequence", "price"];

/// Filter parameters specific to product listings.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct ProductFilterParams {
    /// Department constraint, native key or legacy code.
    pub department: Option<String>,
    /// Category constraint, native key or legacy code.
    pub category: Option<String>,
    /// Subcategory constraint, native key or legacy code.
    pub subcategory: Option<String>,
    /// Free-text search over product names.
    pub search: Option<String>,
}

impl From<ProductFilterParams> for CatalogFilter {
    fn from(params: ProductFilterParams) -> Self {
        Self {
            department: params.department,
            category: params.category,
            subcategory: params.subcategory,
            search: params.search,
        }
    }
}

fn list_specs() -> Vec<FieldSpec> {
    vec![
        FieldSpec::new("department", EntityType::Department),
        FieldSpec::new("category", EntityType::Category),
        FieldSpec::new("subcategory", EntityType::SubCategory),
    ]
}

fn detail_specs() -> Result<Vec<FieldSpec>, FieldSpecError> {
    Ok(vec![
        FieldSpec::new("department", EntityType::Department),
        FieldSpec::new("category", EntityType::Category)
            .with_nested(FieldSpec::new("department", EntityType::Department))?,
        FieldSpec::new("subcategory", EntityType::SubCategory).with_nested(
            FieldSpec::new("category", EntityType::Category)
                .with_nested(FieldSpec::new("department", EntityType::Department))?,
        )?,
    ])
}

/// List products matching the supplied filters.
#[utoipa::path(
    get,
    path = "/api/v1/products",
    params(ListParams, ProductFilterParams),
    responses(
        (status = 200, description = "One page of products with reference fields populated"),
        (status = 400, description = "Invalid pagination or sort parameters"),
        (status = 500, description = "Store unavailable")
    ),
    tags = ["products"],
    operation_id = "listProducts"
)]
#[get("/api/v1/products")]
pub async fn list_products(
    state: web::Data<HttpState>,
    query: web::Query<ListParams>,
    filter: web::Query<ProductFilterParams>,
) -> ApiResult<HttpResponse> {
    let window = query.window()?;
    let sort = query.sort(SORT_FIELDS, "name")?;

    let resolver = state.resolver();
    let catalog_filter = CatalogFilter::from(filter.into_inner());
    let resolved = match catalog_filter.normalize(&resolver).await? {
        NormalizedFilter::Query(resolved) => resolved,
        NormalizedFilter::Empty => {
            let info = PageInfo::for_page(&window, 0);
            return Ok(HttpResponse::Ok().json(Envelope::page(Vec::<Value>::new(), info)));
        }
    };

    let page = state
        .catalog
        .search_products(&resolved, &sort, &window)
        .await?;
    let populated = state
        .populator()
        .populate_many(page.records, &list_specs())
        .await?;

    let info = PageInfo::for_page(&window, page.total);
    Ok(HttpResponse::Ok().json(Envelope::page(populated, info)))
}

/// Fetch one product by native key.
#[utoipa::path(
    get,
    path = "/api/v1/products/{key}",
    params(("key" = String, Path, description = "Native product key")),
    responses(
        (status = 200, description = "The product with reference chains populated"),
        (status = 400, description = "The identifier is not a native key"),
        (status = 404, description = "No product has this key"),
        (status = 500, description = "Store unavailable")
    ),
    tags = ["products"],
    operation_id = "getProduct"
)]
#[get("/api/v1/products/{key}")]
pub async fn get_product(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let raw = path.into_inner();
    let key = NativeKey::parse(&raw)
        .map_err(|err| ApiError::invalid_request(format!("`{raw}`: {err}")))?;

    let Some(record) = state.catalog.find_product(&key).await? else {
        return Err(ApiError::not_found(format!("no product has key `{raw}`")));
    };

    let populated = state.populator().populate(record, &detail_specs()?).await?;
    Ok(HttpResponse::Ok().json(Envelope::ok(populated)))
}
