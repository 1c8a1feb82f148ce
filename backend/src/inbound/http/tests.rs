//! Handler tests over fixture and mock ports: envelope shapes, filter
//! short-circuits, degraded population, and error mapping.

use std::sync::Arc;

use actix_http::Request;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::{App, Error, test, web};
use serde_json::{Value, json};

use super::health::HealthState;
use super::routes;
use super::state::HttpState;
use crate::domain::entity::ReferenceEntity;
use crate::domain::identifier::{EntityType, NativeKey};
use crate::domain::ports::{
    CatalogStoreError, FixtureReferenceRepository, MockCatalogRepository, ProductPage,
    ReferencePage,
};
use crate::domain::UNRESOLVED_LABEL;

const DEPT_KEY: &str = "64f1a000000000000000a001";
const CAT_KEY: &str = "64f1b000000000000000b001";
const PRODUCT_KEY: &str = "64f1d000000000000000d001";

fn entity(key: &str, legacy: Option<&str>, name: &str, parent: Option<&str>) -> ReferenceEntity {
    ReferenceEntity {
        key: NativeKey::parse(key).expect("fixture keys are valid"),
        legacy_code: legacy.map(str::to_owned),
        display_name: name.to_owned(),
        parent_ref: parent.map(str::to_owned),
        sequence: Some(1),
        image_link: None,
    }
}

fn reference_fixture() -> FixtureReferenceRepository {
    FixtureReferenceRepository::new()
        .with(
            EntityType::Department,
            entity(DEPT_KEY, Some("18"), "Grocery", None),
        )
        .with(
            EntityType::Category,
            entity(CAT_KEY, Some("118"), "Snacks", Some("18")),
        )
}

async fn spawn(
    catalog: MockCatalogRepository,
) -> impl Service<Request, Response = ServiceResponse, Error = Error> {
    let state = HttpState::new(Arc::new(reference_fixture()), Arc::new(catalog));
    test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .app_data(web::Data::new(HealthState::new()))
            .configure(routes),
    )
    .await
}

#[actix_rt::test]
async fn product_listing_populates_references_and_paginates() {
    let mut catalog = MockCatalogRepository::new();
    catalog.expect_search_products().times(1).returning(|_, _, _| {
        Ok(ProductPage {
            records: vec![
                json!({"key": PRODUCT_KEY, "name": "Sea salt crisps", "category": "118", "department": "18"}),
                json!({"key": "64f1d000000000000000d002", "name": "Cider vinegar crisps", "category": "118", "department": null}),
            ],
            total: 12,
        })
    });
    let app = spawn(catalog).await;

    let req = test::TestRequest::get()
        .uri("/api/v1/products?page=1&limit=2")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["success"], json!(true));
    assert_eq!(body["pagination"]["total"], json!(12));
    assert_eq!(body["pagination"]["totalPages"], json!(6));
    let first = &body["data"][0];
    assert_eq!(
        first["category"],
        json!({"key": CAT_KEY, "displayName": "Snacks"})
    );
    assert_eq!(
        first["department"],
        json!({"key": DEPT_KEY, "displayName": "Grocery"})
    );
    // Absent reference populates to null, not an error.
    assert_eq!(body["data"][1]["department"], Value::Null);
}

#[actix_rt::test]
async fn dangling_product_reference_returns_200_with_sentinel() {
    let mut catalog = MockCatalogRepository::new();
    catalog.expect_search_products().times(1).returning(|_, _, _| {
        Ok(ProductPage {
            records: vec![json!({"name": "Orphaned", "category": "XYZ"})],
            total: 1,
        })
    });
    let app = spawn(catalog).await;

    let req = test::TestRequest::get().uri("/api/v1/products").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(
        body["data"][0]["category"],
        json!({"key": "XYZ", "displayName": UNRESOLVED_LABEL, "unresolved": true})
    );
}

/// An unresolved filter value never reaches the primary collection: the
/// mock has no expectation, so any call would fail the test.
#[actix_rt::test]
async fn unknown_filter_value_short_circuits_to_an_empty_page() {
    let app = spawn(MockCatalogRepository::new()).await;

    let req = test::TestRequest::get()
        .uri("/api/v1/products?category=no-such-category")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["success"], json!(true));
    assert_eq!(body["data"], json!([]));
    assert_eq!(body["pagination"]["total"], json!(0));
}

#[actix_rt::test]
async fn invalid_pagination_is_a_400_error_envelope() {
    let app = spawn(MockCatalogRepository::new()).await;

    let req = test::TestRequest::get()
        .uri("/api/v1/products?limit=1000")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["error"], json!("invalid_request"));
}

#[actix_rt::test]
async fn store_failure_is_a_500_with_redacted_message() {
    let mut catalog = MockCatalogRepository::new();
    catalog.expect_search_products().times(1).returning(|_, _, _| {
        Err(CatalogStoreError::connection("mongodb://secret@host refused"))
    });
    let app = spawn(catalog).await;

    let req = test::TestRequest::get().uri("/api/v1/products").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["message"], json!("Internal server error"));
}

#[actix_rt::test]
async fn department_detail_accepts_legacy_codes() {
    let app = spawn(MockCatalogRepository::new()).await;

    let req = test::TestRequest::get()
        .uri("/api/v1/departments/18")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["success"], json!(true));
    assert_eq!(body["data"]["key"], json!(DEPT_KEY));
    assert_eq!(body["data"]["displayName"], json!("Grocery"));
}

#[actix_rt::test]
async fn unknown_department_detail_is_404() {
    let app = spawn(MockCatalogRepository::new()).await;

    let req = test::TestRequest::get()
        .uri("/api/v1/departments/nope")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_rt::test]
async fn category_listing_populates_the_parent_department() {
    let mut catalog = MockCatalogRepository::new();
    catalog
        .expect_list_references()
        .times(1)
        .returning(|_, _, _, _| {
            Ok(ReferencePage {
                records: vec![entity(CAT_KEY, Some("118"), "Snacks", Some("18"))],
                total: 1,
            })
        });
    let app = spawn(catalog).await;

    let req = test::TestRequest::get()
        .uri("/api/v1/categories?department=18")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(
        body["data"][0]["parentRef"],
        json!({"key": DEPT_KEY, "displayName": "Grocery"})
    );
}

#[actix_rt::test]
async fn product_detail_rejects_non_native_keys() {
    let app = spawn(MockCatalogRepository::new()).await;

    let req = test::TestRequest::get()
        .uri("/api/v1/products/118")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_rt::test]
async fn readiness_probe_reports_ready_state() {
    let app = spawn(MockCatalogRepository::new()).await;

    let req = test::TestRequest::get().uri("/health/live").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_rt::test]
async fn draining_instance_fails_the_liveness_probe() {
    let health = web::Data::new(HealthState::new());
    health.mark_unhealthy();
    let state = HttpState::new(
        Arc::new(reference_fixture()),
        Arc::new(MockCatalogRepository::new()),
    );
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .app_data(health)
            .configure(routes),
    )
    .await;

    let req = test::TestRequest::get().uri("/health/live").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
}
