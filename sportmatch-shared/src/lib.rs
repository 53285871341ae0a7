//! Error taxonomy, response envelopes, auth extractors and middleware shared by SportMatch services.

pub mod types;
pub mod errors;
pub mod middleware;
pub mod clients;

pub use types::*;
pub use errors::{AppError, ErrorCode, AppResult};
