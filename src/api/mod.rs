//! REST API modules.

pub mod customers;
pub mod error;
pub mod health;

pub use error::{ApiError, ApiResult, ErrorCode};
