//! Provider gateway abstraction
//!
//! The engine consumes providers through one uniform seam: invoke a model
//! with a prompt and obtain text. Everything provider-specific (endpoints,
//! auth headers, body shapes) lives behind [`Gateway`] so the routing logic
//! never sees a wire format.

pub mod adapter;
pub mod error;
pub mod http;

pub use adapter::Gateway;
pub use error::{ProviderError, ProviderResult};
pub use http::HttpGateway;
