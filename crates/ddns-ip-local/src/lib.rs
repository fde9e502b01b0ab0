// # Local Interface Address Source
//
// This crate provides the local-interface address source for the DDNS updater.
//
// ## Implementation
//
// Runs the iproute2 tool once per query:
//
// ```text
// ip -4 addr show dev <interface>
// ```
//
// and extracts every `inet a.b.c.d/n` line, dropping the prefix length.
//
// ## Failure Modes
//
// All of these surface as `Error::LocalDiscovery`:
// - The tool cannot be spawned (not installed, not on PATH)
// - The tool exits non-zero (e.g., `Device "eth9" does not exist.`)
// - The output is not valid UTF-8
//
// An interface without IPv4 addresses is a successful, empty answer.
//
// ## Platform Support
//
// Linux only in practice: other platforms lack `ip` and report a discovery error.

use ddns_core::config::LocalSourceConfig;
use ddns_core::traits::AddressSource;
use ddns_core::{Error, Result};
use tokio::process::Command;

/// Address source reading IPv4 addresses bound to a local interface
#[derive(Debug, Clone)]
pub struct LocalInterfaceSource {
    /// Interface to query (e.g., "eth0")
    interface: String,

    /// Interface query tool
    command: String,
}

impl LocalInterfaceSource {
    /// Create a source for `interface` using the default `ip` tool
    pub fn new(interface: impl Into<String>) -> Self {
        Self::from_config(&LocalSourceConfig::new(interface))
    }

    pub fn from_config(config: &LocalSourceConfig) -> Self {
        Self {
            interface: config.interface.clone(),
            command: config.command.clone(),
        }
    }

    pub fn interface(&self) -> &str {
        &self.interface
    }

    /// Query the IPv4 addresses currently bound to the interface
    ///
    /// # Returns
    ///
    /// - `Ok(Vec<String>)`: Zero or more dotted-quad addresses, without prefix length
    /// - `Err(Error::LocalDiscovery)`: The query could not be run or failed
    pub async fn interface_addresses(&self) -> Result<Vec<String>> {
        tracing::debug!(
            "Querying addresses: {} -4 addr show dev {}",
            self.command,
            self.interface
        );

        let output = Command::new(&self.command)
            .args(["-4", "addr", "show", "dev", self.interface.as_str()])
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| {
                Error::local_discovery(format!("Failed to run '{}': {}", self.command, e))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::local_discovery(format!(
                "'{}' failed for interface {} ({}): {}",
                self.command,
                self.interface,
                output.status,
                stderr.trim()
            )));
        }

        let stdout = String::from_utf8(output.stdout).map_err(|_| {
            Error::local_discovery(format!(
                "Output of '{}' is not valid UTF-8",
                self.command
            ))
        })?;

        Ok(parse_inet_addresses(&stdout))
    }
}

#[async_trait::async_trait]
impl AddressSource for LocalInterfaceSource {
    async fn discover(&self) -> Result<Vec<String>> {
        self.interface_addresses().await
    }

    fn source_name(&self) -> &'static str {
        "local"
    }
}

/// Extract IPv4 addresses from `ip -4 addr show` output
///
/// Matches lines of the form `inet a.b.c.d/n ...` (leading whitespace allowed)
/// and returns the bare address in output order.
pub fn parse_inet_addresses(output: &str) -> Vec<String> {
    output.lines().filter_map(parse_inet_line).collect()
}

fn parse_inet_line(line: &str) -> Option<String> {
    let rest = line.trim_start().strip_prefix("inet ")?;
    let (addr, _prefix) = rest.split_once('/')?;

    if addr.is_empty() || !addr.chars().all(|c| c.is_ascii_digit() || c == '.') {
        return None;
    }

    Some(addr.to_string())
}
