//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every HTTP endpoint plus the shared envelope
//! schemas. The generated specification backs Swagger UI in debug builds.

use utoipa::OpenApi;

use crate::inbound::http;

/// OpenAPI document for the catalog REST API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Greenbasket catalog API",
        description = "Read endpoints for the grocery catalog: departments, \
            categories, subcategories, products, and banners. Identifiers \
            may be native keys or legacy codes; responses embed populated \
            reference chains."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        http::departments::list_departments,
        http::departments::get_department,
        http::categories::list_categories,
        http::categories::get_category,
        http::subcategories::list_subcategories,
        http::subcategories::get_subcategory,
        http::products::list_products,
        http::products::get_product,
        http::banners::list_banners,
        http::health::ready,
        http::health::live,
    ),
    components(schemas(
        http::error::ApiError,
        http::error::ErrorCode,
        pagination::PageInfo,
    )),
    tags(
        (name = "departments", description = "Department hierarchy roots"),
        (name = "categories", description = "Categories within departments"),
        (name = "subcategories", description = "Subcategories within categories"),
        (name = "products", description = "Product catalog"),
        (name = "banners", description = "Promotional banners"),
        (name = "health", description = "Orchestration probes"),
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use utoipa::OpenApi;

    use super::ApiDoc;

    #[test]
    fn every_route_is_documented() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&String> = doc.paths.paths.keys().collect();
        for expected in [
            "/api/v1/departments",
            "/api/v1/departments/{id}",
            "/api/v1/categories",
            "/api/v1/subcategories",
            "/api/v1/products",
            "/api/v1/products/{key}",
            "/api/v1/banners",
            "/health/ready",
            "/health/live",
        ] {
            assert!(
                paths.iter().any(|p| p.as_str() == expected),
                "missing path {expected}"
            );
        }
    }
}
