//! Customer records API with resilient postal-code address lookup.

pub mod api;
pub mod config;
pub mod domain;
pub mod middleware;
pub mod outbound;
pub mod resilience;
pub mod telemetry;

pub use middleware::fault::FaultBoundary;
pub use middleware::trace::Trace;
