//! LLM provider layer for Lumina.
//!
//! # Architecture
//!
//! - [`registry`] — static descriptors for the supported providers, in failover order
//! - [`transport::Transport`] — the network seam; [`transport::HttpTransport`] uses reqwest
//! - [`dispatcher::Dispatcher`] — tries providers in order, returns the first answer
//! - [`error`] — per-attempt failures and caller-facing errors

pub mod dispatcher;
pub mod error;
pub mod registry;
pub mod transport;

// Re-export main types for convenience
pub use dispatcher::{Answer, AttemptOutcome, Dispatcher, ProviderStatus};
pub use error::{AttemptFailure, DispatchError, FailedAttempt};
pub use registry::{ProviderDescriptor, ProviderKind, PROVIDERS};
pub use transport::{HttpTransport, ProviderRequest, Transport, TransportResponse};
