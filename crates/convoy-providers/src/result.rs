//! The uniform provider result contract.
//!
//! Every provider execution, successful or not, produces a
//! [`ProviderResult`]. A result with `success == true` always carries a
//! data payload; a failed result always carries an error message. The
//! router relies on this invariant to merge heterogeneous providers
//! without special-casing any of them.

use std::time::Duration;

use serde::Serialize;
use serde_json::Value;

use crate::error::ProviderError;

/// Execution metadata attached to every provider result.
#[derive(Debug, Clone, Serialize)]
pub struct ResultMetadata {
    /// Name of the provider that produced this result.
    pub provider: String,
    /// Wall-clock execution time, stamped by the router.
    pub elapsed_ms: u64,
    /// Backend endpoint that was called, when applicable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    /// Failure class for failed results (e.g. "timeout").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<&'static str>,
}

/// The outcome of one provider execution.
#[derive(Debug, Clone, Serialize)]
pub struct ProviderResult {
    /// Whether the provider produced usable data.
    pub success: bool,
    /// Provider-specific payload; always present on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    /// Failure message; always present on failure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Execution metadata.
    pub metadata: ResultMetadata,
}

impl ProviderResult {
    /// Creates a successful result carrying `data`.
    pub fn success(provider: impl Into<String>, data: Value) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            metadata: ResultMetadata {
                provider: provider.into(),
                elapsed_ms: 0,
                endpoint: None,
                error_code: None,
            },
        }
    }

    /// Creates a failed result with a plain error message.
    pub fn failure(provider: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
            metadata: ResultMetadata {
                provider: provider.into(),
                elapsed_ms: 0,
                endpoint: None,
                error_code: None,
            },
        }
    }

    /// Creates a failed result from a [`ProviderError`], keeping the
    /// failure class in metadata.
    pub fn from_error(err: &ProviderError) -> Self {
        let provider = err.provider().unwrap_or("unknown").to_string();
        let mut result = Self::failure(provider, err.message());
        result.metadata.error_code = Some(err.code().as_str());
        result
    }

    /// Builder method to record the endpoint that was called.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.metadata.endpoint = Some(endpoint.into());
        self
    }

    /// Builder method to stamp the execution time.
    pub fn with_elapsed(mut self, elapsed: Duration) -> Self {
        self.metadata.elapsed_ms = elapsed.as_millis() as u64;
        self
    }

    /// The error message, or a placeholder for (malformed) failures
    /// without one.
    pub fn error_message(&self) -> &str {
        self.error.as_deref().unwrap_or("unknown error")
    }
}
