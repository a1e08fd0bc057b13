//! Gateway trait: the engine's only view of a provider

use async_trait::async_trait;

use crate::catalog::ModelId;
use crate::providers::error::ProviderError;

/// Uniform invocation seam over whichever backend serves a model.
///
/// Every error is recoverable at the escalation layer; a first failure is
/// never fatal to the request.
#[async_trait]
pub trait Gateway: Send + Sync {
    /// Send `prompt` (with an optional system prompt) to `model` and return
    /// the response text.
    async fn invoke(
        &self,
        model: ModelId,
        prompt: &str,
        system: Option<&str>,
    ) -> Result<String, ProviderError>;
}
