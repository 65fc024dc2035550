//! Customer API handlers.

use actix_web::{HttpResponse, delete, get, post, put, web};
use uuid::Uuid;

use crate::domain::{CustomerAddress, CustomerService, NewCustomer};

use super::error::{ApiResult, map_service_error};

/// List every customer with its resolved address.
#[get("/customers")]
pub async fn list(service: web::Data<CustomerService>) -> ApiResult<web::Json<Vec<CustomerAddress>>> {
    let customers = service
        .list_with_addresses()
        .await
        .map_err(map_service_error)?;
    Ok(web::Json(customers))
}

/// Fetch one customer by identifier.
#[get("/customers/{id}")]
pub async fn get_by_id(
    service: web::Data<CustomerService>,
    id: web::Path<Uuid>,
) -> ApiResult<web::Json<CustomerAddress>> {
    let customer = service
        .address_by_id(id.into_inner())
        .await
        .map_err(map_service_error)?;
    Ok(web::Json(customer))
}

/// Fetch one customer by display name.
#[get("/customers/name/{name}")]
pub async fn get_by_name(
    service: web::Data<CustomerService>,
    name: web::Path<String>,
) -> ApiResult<web::Json<CustomerAddress>> {
    let customer = service
        .address_by_name(&name)
        .await
        .map_err(map_service_error)?;
    Ok(web::Json(customer))
}

/// Create a customer.
#[post("/customers")]
pub async fn create(
    service: web::Data<CustomerService>,
    payload: web::Json<NewCustomer>,
) -> ApiResult<HttpResponse> {
    let created = service
        .create(payload.into_inner())
        .await
        .map_err(map_service_error)?;
    let location = format!("/api/v1/customers/{}", created.id);
    Ok(HttpResponse::Created()
        .insert_header(("location", location))
        .json(created))
}

/// Replace a customer record.
#[put("/customers/{id}")]
pub async fn update(
    service: web::Data<CustomerService>,
    id: web::Path<Uuid>,
    payload: web::Json<NewCustomer>,
) -> ApiResult<HttpResponse> {
    service
        .update(id.into_inner(), payload.into_inner())
        .await
        .map_err(map_service_error)?;
    Ok(HttpResponse::NoContent().finish())
}

/// Remove a customer record.
#[delete("/customers/{id}")]
pub async fn remove(
    service: web::Data<CustomerService>,
    id: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    service
        .remove(id.into_inner())
        .await
        .map_err(map_service_error)?;
    Ok(HttpResponse::NoContent().finish())
}
