// # HTTP IP-Echo Address Source
//
// This crate provides the remote address source for the DDNS updater.
//
// ## Purpose
//
// Behind NAT the local interface only knows a private address. A public
// "what is my IP" service (icanhazip.com by default) reports the address the
// outside world sees, which is what the DNS record should carry.
//
// ## Contract
//
// - One GET per query, hard timeout (10 seconds by default)
// - The body, with trailing whitespace removed, must be exactly four
//   dot-separated groups of digits; anything else is rejected
// - Rejected bodies are quoted and escaped in the error, cut to 50
//   characters plus "..."

use ddns_core::config::{DEFAULT_ECHO_TIMEOUT_SECS, DEFAULT_ECHO_URL, EchoConfig};
use ddns_core::traits::AddressSource;
use ddns_core::{Error, Result};

use std::time::Duration;

/// Longest prefix of a rejected body quoted in error messages
const MAX_QUOTED_CHARS: usize = 50;

/// Marker appended when a quoted body was cut
const ELLIPSIS: &str = "...";

/// HTTP-based address source (public address via an IP-echo service)
#[derive(Debug, Clone)]
pub struct HttpEchoSource {
    /// URL to fetch the address from
    url: String,

    /// Request timeout
    timeout: Duration,

    /// HTTP client
    client: reqwest::Client,
}

impl HttpEchoSource {
    /// Create a source for `url` with the default 10 second timeout
    pub fn new(url: impl Into<String>) -> Result<Self> {
        Self::with_timeout(url, Duration::from_secs(DEFAULT_ECHO_TIMEOUT_SECS))
    }

    /// Create a source with a custom timeout
    pub fn with_timeout(url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            url: url.into(),
            timeout,
            client,
        })
    }

    pub fn from_config(config: &EchoConfig) -> Result<Self> {
        Self::with_timeout(config.url.clone(), Duration::from_secs(config.timeout_secs))
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Fetch the public IPv4 address
    ///
    /// # Returns
    ///
    /// - `Ok(String)`: The dotted-quad address, trailing whitespace removed
    /// - `Err(Error::RemoteDiscovery)`: Timeout, connection failure, or a body
    ///   that does not look like an IPv4 address, whatever the HTTP status
    pub async fn public_address(&self) -> Result<String> {
        tracing::debug!("Fetching public address from {}", self.url);

        let response = self.client.get(&self.url).send().await.map_err(|e| {
            if e.is_timeout() {
                Error::remote_discovery(format!(
                    "Request to {} timed out after {:?}",
                    self.url, self.timeout
                ))
            } else {
                Error::remote_discovery(format!("Request failed: {}", e))
            }
        })?;

        // Only the body decides; an error page fails the shape check below.
        let status = response.status();
        if !status.is_success() {
            tracing::debug!("IP-echo service answered {}", status);
        }

        let body = response
            .text()
            .await
            .map_err(|e| Error::remote_discovery(format!("Failed to read response: {}", e)))?;

        parse_echo_body(&body)
    }
}

impl Default for HttpEchoSource {
    fn default() -> Self {
        Self {
            url: DEFAULT_ECHO_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_ECHO_TIMEOUT_SECS),
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(DEFAULT_ECHO_TIMEOUT_SECS))
                .build()
                .unwrap_or_default(),
        }
    }
}

#[async_trait::async_trait]
impl AddressSource for HttpEchoSource {
    async fn discover(&self) -> Result<Vec<String>> {
        self.public_address().await.map(|addr| vec![addr])
    }

    fn source_name(&self) -> &'static str {
        "remote"
    }
}

/// Validate an IP-echo response body
///
/// Trailing whitespace is removed first. The remainder must split on `.` into
/// exactly four non-empty, all-digit groups.
pub fn parse_echo_body(body: &str) -> Result<String> {
    let candidate = body.trim_end();

    if looks_like_ipv4(candidate) {
        Ok(candidate.to_string())
    } else {
        Err(Error::remote_discovery(format!(
            "Remote IP doesn't look like an IP: {:?}",
            quote_truncated(candidate)
        )))
    }
}

fn looks_like_ipv4(text: &str) -> bool {
    let groups: Vec<&str> = text.split('.').collect();
    groups.len() == 4
        && groups
            .iter()
            .all(|g| !g.is_empty() && g.chars().all(|c| c.is_ascii_digit()))
}

/// First 50 characters of `text`, followed by "..." if anything was cut
pub fn quote_truncated(text: &str) -> String {
    match text.char_indices().nth(MAX_QUOTED_CHARS) {
        Some((cut, _)) => format!("{}{}", &text[..cut], ELLIPSIS),
        None => text.to_string(),
    }
}
