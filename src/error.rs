//! Upstream failure taxonomy

use thiserror::Error;

/// Failure of a single upstream data or text source.
///
/// Core components never surface this to their callers; it is logged and
/// replaced by the component's degenerate output.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{provider} returned status {status}")]
    Status { provider: &'static str, status: u16 },

    #[error("malformed payload from {provider}: {reason}")]
    Malformed {
        provider: &'static str,
        reason: String,
    },

    #[error("{0} is not configured")]
    NotConfigured(&'static str),

    #[error("{provider} returned non-positive price {price}")]
    InvalidPrice { provider: &'static str, price: f64 },
}

impl ProviderError {
    pub fn malformed(provider: &'static str, reason: impl Into<String>) -> Self {
        Self::Malformed {
            provider,
            reason: reason.into(),
        }
    }
}
