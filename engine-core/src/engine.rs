use crate::types::{AdapterResult, InvocationRequest};
use async_trait::async_trait;

/// An adapter that runs prompts through one external AI CLI.
///
/// Implementations never return an error past this boundary: spawn failures,
/// timeouts and CLI-reported errors all come back as a failed
/// [`AdapterResult`]. Each call is independent and runs exactly one
/// subprocess; retrying is the caller's decision.
#[async_trait]
pub trait Engine: Send + Sync {
    /// Short identifier used for dispatch and in error messages.
    fn name(&self) -> &str;

    /// Runs one prompt and normalizes the outcome.
    async fn execute(&self, request: &InvocationRequest) -> AdapterResult;
}
