//! Request middleware.
//!
//! Purpose: request-scoped correlation identifiers and the terminal fault
//! boundary that shapes every unhandled failure.

pub mod fault;
pub mod trace;

pub use fault::FaultBoundary;
pub use trace::Trace;
