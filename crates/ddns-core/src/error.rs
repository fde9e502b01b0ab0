//! Error types for the DDNS updater
//!
//! This module defines all error types used throughout the workspace.
//!
//! Errors fall into three families that callers treat differently:
//!
//! - **Configuration** ([`Error::Config`]): fatal, raised before any network I/O.
//! - **Discovery** ([`Error::LocalDiscovery`], [`Error::RemoteDiscovery`]): recovered by
//!   the discovery pass, logged, and turned into failsafe mode.
//! - **Provider** ([`Error::Provider`], [`Error::Authentication`], [`Error::RateLimited`],
//!   [`Error::NotFound`]): never recovered; they abort the reconciliation pass.

use thiserror::Error;

/// Result type alias for DDNS operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for the DDNS updater
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration errors (missing credentials, invalid arguments)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Local network interface query failed
    #[error("Local address discovery failed: {0}")]
    LocalDiscovery(String),

    /// Remote IP-echo query failed
    #[error("Remote address discovery failed: {0}")]
    RemoteDiscovery(String),

    /// Provider-specific error
    #[error("Provider error ({provider}): {message}")]
    Provider {
        /// Provider name
        provider: String,
        /// Error message
        message: String,
    },

    /// Authentication errors
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Rate limiting errors
    #[error("Rate limited: {0}")]
    RateLimited(String),

    /// Record or zone not found
    #[error("Not found: {0}")]
    NotFound(String),

}

impl Error {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a local discovery error
    pub fn local_discovery(msg: impl Into<String>) -> Self {
        Self::LocalDiscovery(msg.into())
    }

    /// Create a remote discovery error
    pub fn remote_discovery(msg: impl Into<String>) -> Self {
        Self::RemoteDiscovery(msg.into())
    }

    /// Create a provider-specific error
    pub fn provider(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Provider {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// Create an authentication error
    pub fn auth(msg: impl Into<String>) -> Self {
        Self::Authentication(msg.into())
    }

    /// Create a rate limit error
    pub fn rate_limited(msg: impl Into<String>) -> Self {
        Self::RateLimited(msg.into())
    }

    /// Create a "not found" error
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Whether this error came from a discovery source (recoverable)
    pub fn is_discovery_error(&self) -> bool {
        matches!(self, Self::LocalDiscovery(_) | Self::RemoteDiscovery(_))
    }

    /// Whether this error was surfaced by the DNS provider (fatal for the run)
    pub fn is_provider_error(&self) -> bool {
        matches!(
            self,
            Self::Provider { .. } | Self::Authentication(_) | Self::RateLimited(_) | Self::NotFound(_)
        )
    }
}
