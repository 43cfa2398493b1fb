//! Error types for the component core.
//!
//! Only the network boundary produces errors callers ever see; configuration
//! problems are swallowed by design and the parser/sanitizer contracts are
//! infallible.

use thiserror::Error;

/// Network/fetch-related errors for remote markdown sources.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    /// The request could not be issued or the transport failed.
    #[error("request failed: {0}")]
    Network(String),
    /// The server answered with a non-success status.
    #[error("unexpected status {0}")]
    Status(u16),
    /// The response arrived but its body could not be read as text.
    #[error("response body could not be read")]
    Body,
}
