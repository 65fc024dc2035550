//! End-to-end handler coverage over the in-memory repository.

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::{App, Error, test, web};
use async_trait::async_trait;
use serde_json::json;

use cadastro::api::customers;
use cadastro::api::error::{ApiError, ErrorCode};
use cadastro::config::RuntimeEnvironment;
use cadastro::domain::ports::{AddressSource, AddressSourceError};
use cadastro::domain::{Address, Customer, CustomerAddress, CustomerService};
use cadastro::outbound::InMemoryCustomerRepository;
use cadastro::telemetry::TracingTelemetrySink;
use cadastro::{FaultBoundary, Trace};

/// Source resolving every postal code to the same canned address.
struct FixedAddressSource;

#[async_trait]
impl AddressSource for FixedAddressSource {
    async fn address_by_cep(&self, cep: &str) -> Result<Address, AddressSourceError> {
        Ok(Address {
            cep: cep.to_owned(),
            street: "Rua Primeiro de Agosto".into(),
            neighborhood: "Centro".into(),
            city: "Bauru".into(),
            state: "SP".into(),
        })
    }
}

/// Source whose circuit is permanently open.
struct OpenCircuitSource;

#[async_trait]
impl AddressSource for OpenCircuitSource {
    async fn address_by_cep(&self, _cep: &str) -> Result<Address, AddressSourceError> {
        Err(AddressSourceError::CircuitOpen)
    }
}

async fn app_with(
    repository: InMemoryCustomerRepository,
    lookup: Arc<dyn AddressSource>,
) -> impl actix_web::dev::Service<
    actix_http::Request,
    Response = actix_web::dev::ServiceResponse<impl actix_web::body::MessageBody>,
    Error = Error,
> {
    let service = web::Data::new(CustomerService::new(Arc::new(repository), lookup));
    let boundary = FaultBoundary::new(
        RuntimeEnvironment::Production,
        Arc::new(TracingTelemetrySink::new("test-key")),
    );
    test::init_service(
        App::new().wrap(boundary).wrap(Trace).service(
            web::scope("/api/v1")
                .app_data(service)
                .service(customers::list)
                .service(customers::get_by_id)
                .service(customers::get_by_name)
                .service(customers::create)
                .service(customers::update)
                .service(customers::remove),
        ),
    )
    .await
}

fn seeded_repository() -> (InMemoryCustomerRepository, Customer) {
    let ada = Customer {
        id: uuid::Uuid::new_v4(),
        name: "Ada".into(),
        cep: "17052520".into(),
    };
    (
        InMemoryCustomerRepository::seeded([ada.clone()]),
        ada,
    )
}

#[actix_web::test]
async fn list_returns_customers_joined_with_addresses() {
    let (repository, ada) = seeded_repository();
    let app = app_with(repository, Arc::new(FixedAddressSource)).await;

    let res = test::call_service(
        &app,
        test::TestRequest::get().uri("/api/v1/customers").to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let listed: Vec<CustomerAddress> = test::read_body_json(res).await;
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, ada.id);
    assert_eq!(listed[0].address.city, "Bauru");
}

#[actix_web::test]
async fn get_by_id_returns_the_customer() {
    let (repository, ada) = seeded_repository();
    let app = app_with(repository, Arc::new(FixedAddressSource)).await;

    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&format!("/api/v1/customers/{}", ada.id))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let found: CustomerAddress = test::read_body_json(res).await;
    assert_eq!(found.name, "Ada");
    assert_eq!(found.address.state, "SP");
}

#[actix_web::test]
async fn get_by_name_returns_the_customer() {
    let (repository, _) = seeded_repository();
    let app = app_with(repository, Arc::new(FixedAddressSource)).await;

    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/v1/customers/name/Ada")
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
}

#[actix_web::test]
async fn missing_customer_maps_to_a_shaped_404() {
    let app = app_with(InMemoryCustomerRepository::new(), Arc::new(FixedAddressSource)).await;

    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&format!("/api/v1/customers/{}", uuid::Uuid::new_v4()))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let payload: ApiError = test::read_body_json(res).await;
    assert_eq!(payload.code, ErrorCode::NotFound);
}

#[actix_web::test]
async fn create_returns_201_with_location() {
    let app = app_with(InMemoryCustomerRepository::new(), Arc::new(FixedAddressSource)).await;

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/customers")
            .set_json(json!({ "name": "Grace", "cep": "01001000" }))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let location = res
        .headers()
        .get("location")
        .expect("location header is set")
        .to_str()
        .expect("ascii header")
        .to_owned();
    let created: Customer = test::read_body_json(res).await;
    assert_eq!(location, format!("/api/v1/customers/{}", created.id));
}

#[actix_web::test]
async fn duplicate_postal_code_maps_to_conflict() {
    let (repository, _) = seeded_repository();
    let app = app_with(repository, Arc::new(FixedAddressSource)).await;

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/customers")
            .set_json(json!({ "name": "Grace", "cep": "17052520" }))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::CONFLICT);
    let payload: ApiError = test::read_body_json(res).await;
    assert_eq!(payload.code, ErrorCode::Conflict);
}

#[actix_web::test]
async fn invalid_postal_code_maps_to_bad_request() {
    let app = app_with(InMemoryCustomerRepository::new(), Arc::new(FixedAddressSource)).await;

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/customers")
            .set_json(json!({ "name": "Grace", "cep": "01001-000" }))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn malformed_json_stays_a_client_error() {
    let app = app_with(InMemoryCustomerRepository::new(), Arc::new(FixedAddressSource)).await;

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/customers")
            .insert_header(("content-type", "application/json"))
            .set_payload("{not json")
            .to_request(),
    )
    .await;
    assert!(
        res.status().is_client_error(),
        "expected a 4xx, got {}",
        res.status()
    );
}

#[actix_web::test]
async fn non_uuid_identifier_stays_a_client_error() {
    let app = app_with(InMemoryCustomerRepository::new(), Arc::new(FixedAddressSource)).await;

    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/v1/customers/not-a-uuid")
            .to_request(),
    )
    .await;
    assert!(
        res.status().is_client_error(),
        "expected a 4xx, got {}",
        res.status()
    );
}

#[actix_web::test]
async fn update_then_delete_round_trips() {
    let (repository, ada) = seeded_repository();
    let app = app_with(repository, Arc::new(FixedAddressSource)).await;

    let res = test::call_service(
        &app,
        test::TestRequest::put()
            .uri(&format!("/api/v1/customers/{}", ada.id))
            .set_json(json!({ "name": "Ada L.", "cep": "17052520" }))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let res = test::call_service(
        &app,
        test::TestRequest::delete()
            .uri(&format!("/api/v1/customers/{}", ada.id))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let res = test::call_service(
        &app,
        test::TestRequest::delete()
            .uri(&format!("/api/v1/customers/{}", ada.id))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn lookup_outage_surfaces_the_sanitized_envelope() {
    let (repository, ada) = seeded_repository();
    let app = app_with(repository, Arc::new(OpenCircuitSource)).await;

    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&format!("/api/v1/customers/{}", ada.id))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let payload: ApiError = test::read_body_json(res).await;
    assert_eq!(payload.code, ErrorCode::InternalError);
    assert!(!payload.message.contains("circuit"));
    assert!(payload.trace_id.is_some());
}
