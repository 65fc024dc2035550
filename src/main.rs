//! Service entry-point: wires configuration, adapters, and the HTTP server.

use std::sync::Arc;

use actix_web::{App, HttpServer, web};
use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};

use cadastro::api::customers;
use cadastro::api::health::{HealthState, live, ready};
use cadastro::config::AppConfig;
use cadastro::domain::CustomerService;
use cadastro::outbound::{InMemoryCustomerRepository, ViaCepHttpSource};
use cadastro::resilience::{CircuitBreaker, ResilientAddressSource, RetryPolicy};
use cadastro::telemetry::TracingTelemetrySink;
use cadastro::{FaultBoundary, Trace};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let config = AppConfig::from_env().map_err(std::io::Error::other)?;

    let lookup = ViaCepHttpSource::new(config.lookup_base_url.clone())
        .map_err(std::io::Error::other)?;
    // One breaker per downstream dependency, shared across workers.
    let breaker = Arc::new(CircuitBreaker::default());
    let lookup = Arc::new(ResilientAddressSource::new(
        lookup,
        RetryPolicy::default(),
        breaker,
    ));
    let repository = Arc::new(InMemoryCustomerRepository::new());
    let service = web::Data::new(CustomerService::new(repository, lookup));

    let fault_boundary = FaultBoundary::new(
        config.environment,
        Arc::new(TracingTelemetrySink::new(config.application_key.clone())),
    );

    let health_state = web::Data::new(HealthState::new());
    // Clone for the server factory so the readiness probe stays reachable.
    let server_health_state = health_state.clone();
    let server = HttpServer::new(move || {
        let api = web::scope("/api/v1")
            .app_data(service.clone())
            .service(customers::list)
            .service(customers::get_by_id)
            .service(customers::get_by_name)
            .service(customers::create)
            .service(customers::update)
            .service(customers::remove);

        App::new()
            .app_data(server_health_state.clone())
            .wrap(fault_boundary.clone())
            .wrap(Trace)
            .service(api)
            .service(ready)
            .service(live)
    })
    .bind(config.bind_addr)?;

    health_state.mark_ready();
    server.run().await
}
