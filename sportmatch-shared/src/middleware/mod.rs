mod auth_extractor;
mod request_extractors;
mod tracing_layer;
mod metrics_layer;

pub use auth_extractor::*;
pub use request_extractors::*;
pub use tracing_layer::*;
pub use metrics_layer::*;
