// # Address Source Trait
//
// Defines the interface for discovering the addresses a host should publish.
//
// ## Implementations
//
// - Local interface (iproute2): `ddns-ip-local` crate
// - Remote IP-echo (HTTP): `ddns-ip-http` crate
//
// ## Usage
//
// ```rust,ignore
// use ddns_core::AddressSource;
//
// #[tokio::main]
// async fn main() -> anyhow::Result<()> {
//     let source = /* AddressSource implementation */;
//
//     for addr in source.discover().await? {
//         println!("{}: {}", source.source_name(), addr);
//     }
//
//     Ok(())
// }
// ```

use async_trait::async_trait;

/// Trait for address source implementations
///
/// A source answers one question: which IPv4 addresses (dotted-quad strings)
/// does it currently see for this host? Sources are queried once per run.
///
/// # Failure
///
/// A source that cannot answer returns [`crate::Error::LocalDiscovery`] or
/// [`crate::Error::RemoteDiscovery`]. Callers treat these as recoverable:
/// the run continues in failsafe mode.
///
/// An empty vector is a successful answer (e.g., an interface with no IPv4 address).
///
/// # Restrictions
///
/// Sources must not retry, must not touch the DNS provider, and must not spawn
/// background tasks. Each call performs at most one query.
#[async_trait]
pub trait AddressSource: Send + Sync {
    /// Discover the addresses currently visible to this source
    async fn discover(&self) -> Result<Vec<String>, crate::Error>;

    /// Source name (for logging)
    fn source_name(&self) -> &'static str;
}
