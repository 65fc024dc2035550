//! Terminal fault boundary.
//!
//! Wraps the whole request pipeline and guarantees no unhandled failure
//! leaves the service unshaped: any server-error outcome that is not already
//! a shaped [`ApiError`] becomes a 500 envelope, reported to telemetry
//! exactly once. Responses carrying no fault, shaped errors, and framework
//! client errors all pass through untouched.

use std::sync::Arc;
use std::task::{Context, Poll};

use actix_web::body::EitherBody;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::StatusCode;
use actix_web::{Error, HttpResponse, ResponseError};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use tracing::{error, warn};

use crate::api::error::ApiError;
use crate::config::RuntimeEnvironment;
use crate::middleware::trace::TraceId;
use crate::telemetry::TelemetrySink;

/// Generic message returned to callers in production environments.
const SANITIZED_MESSAGE: &str = "An unexpected error occurred.";

/// Fault boundary middleware.
///
/// Environment and telemetry sink are supplied at construction; nothing is
/// read from ambient configuration.
#[derive(Clone)]
pub struct FaultBoundary {
    environment: RuntimeEnvironment,
    telemetry: Arc<dyn TelemetrySink>,
}

impl FaultBoundary {
    pub fn new(environment: RuntimeEnvironment, telemetry: Arc<dyn TelemetrySink>) -> Self {
        Self {
            environment,
            telemetry,
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for FaultBoundary
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = FaultBoundaryMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(FaultBoundaryMiddleware {
            service,
            environment: self.environment,
            telemetry: Arc::clone(&self.telemetry),
        }))
    }
}

/// Service wrapper produced by [`FaultBoundary`].
pub struct FaultBoundaryMiddleware<S> {
    service: S,
    environment: RuntimeEnvironment,
    telemetry: Arc<dyn TelemetrySink>,
}

impl<S, B> Service<ServiceRequest> for FaultBoundaryMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let environment = self.environment;
        let telemetry = Arc::clone(&self.telemetry);
        // Cloning the `HttpRequest` itself is off-limits while routing has
        // yet to run; only the path string is captured for logging.
        let path = req.path().to_owned();
        let fut = self.service.call(req);

        Box::pin(async move {
            match fut.await {
                Ok(res) => {
                    let unhandled = res.response().status().is_server_error()
                        && res
                            .response()
                            .error()
                            .is_some_and(|err| err.as_error::<ApiError>().is_none());
                    if !unhandled {
                        // No recorded fault, a shaped one, or a framework
                        // client error (e.g. a payload that failed
                        // extraction): no-op.
                        return Ok(res.map_into_left_body());
                    }

                    let detail = res
                        .response()
                        .error()
                        .map(|err| err.to_string())
                        .unwrap_or_default();
                    let envelope = shape_fault(&path, environment, &telemetry, detail);
                    let response = render(&envelope);
                    let (request, _) = res.into_parts();
                    Ok(ServiceResponse::new(request, response).map_into_right_body())
                }
                // Failures raised beneath this middleware arrive without a
                // response; shaped errors and client errors render
                // themselves, everything else becomes the envelope.
                Err(err) => {
                    if err.as_error::<ApiError>().is_some()
                        || !err.as_response_error().status_code().is_server_error()
                    {
                        return Err(err);
                    }
                    let envelope = shape_fault(&path, environment, &telemetry, err.to_string());
                    Err(ShapedFault { envelope }.into())
                }
            }
        })
    }
}

/// Carrier for an envelope the boundary has already built.
///
/// [`ApiError`]'s own `ResponseError` impl redacts internal errors; this
/// wrapper renders the environment-gated envelope verbatim instead.
#[derive(Debug)]
struct ShapedFault {
    envelope: ApiError,
}

impl std::fmt::Display for ShapedFault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.envelope.message)
    }
}

impl ResponseError for ShapedFault {
    fn status_code(&self) -> StatusCode {
        StatusCode::INTERNAL_SERVER_ERROR
    }

    fn error_response(&self) -> HttpResponse {
        render(&self.envelope)
    }
}

fn shape_fault(
    path: &str,
    environment: RuntimeEnvironment,
    telemetry: &Arc<dyn TelemetrySink>,
    detail: String,
) -> ApiError {
    let trace_id = TraceId::current().map(|id| id.to_string());
    error!(path, error = %detail, "unhandled fault reached the boundary");

    // Reporting failures must never escalate into a caller-visible failure.
    if let Err(report_error) = telemetry.report(&detail, trace_id) {
        warn!(error = %report_error, "fault report failed");
    }

    let message = if environment.exposes_detail() {
        detail
    } else {
        SANITIZED_MESSAGE.to_owned()
    };
    ApiError::internal(message)
}

fn render(envelope: &ApiError) -> HttpResponse {
    let mut builder = HttpResponse::InternalServerError();
    if let Some(id) = &envelope.trace_id {
        builder.insert_header(("trace-id", id.clone()));
    }
    builder.json(envelope)
}
