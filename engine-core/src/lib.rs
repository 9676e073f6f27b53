//! Shared contract for CLI-based AI engine adapters.
//!
//! Every engine adapter accepts an [`InvocationRequest`], runs its external
//! CLI, and hands back an [`AdapterResult`]. The helpers here are the pieces
//! all adapters agree on: structured error detection over raw output and the
//! message format used when a CLI exits unsuccessfully.

/// The [`Engine`] trait implemented by every adapter.
pub mod engine;
/// Exit-error formatting and log previews.
pub mod format;
/// Detection of machine-readable error payloads in CLI output.
pub mod structured;
/// Request and result types.
pub mod types;

pub use engine::Engine;
pub use format::{format_exit_error, preview};
pub use structured::detect_structured_error;
pub use types::{AdapterResult, InvocationRequest};
