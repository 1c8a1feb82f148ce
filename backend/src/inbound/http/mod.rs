//! HTTP inbound adapter: actix-web handlers over the domain ports.

use actix_web::web;

pub mod banners;
pub mod categories;
pub mod departments;
pub mod envelope;
pub mod error;
pub mod health;
pub mod params;
pub mod products;
pub mod state;
pub mod subcategories;

pub use self::envelope::Envelope;
pub use self::error::{ApiError, ApiResult, ErrorCode};
pub use self::state::HttpState;

/// Register every catalog route. The caller supplies `HttpState` and
/// `HealthState` as app data.
pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.service(departments::list_departments)
        .service(departments::get_department)
        .service(categories::list_categories)
        .service(categories::get_category)
        .service(subcategories::list_subcategories)
        .service(subcategories::get_subcategory)
        .service(products::list_products)
        .service(products::get_product)
        .service(banners::list_banners)
        .service(health::ready)
        .service(health::live);
}

#[cfg(test)]
#[path = "tests.rs"]
mod tests;
