// # DNS Provider Trait
//
// Defines the interface for reading and mutating address records via provider APIs.
//
// ## Implementations
//
// - DNSimple: `ddns-provider-dnsimple` crate
//
// ## Usage
//
// ```rust,ignore
// use ddns_core::traits::{DnsProvider, NewRecord, ZoneContext};
//
// #[tokio::main]
// async fn main() -> anyhow::Result<()> {
//     let provider = /* DnsProvider implementation */;
//
//     let account_id = provider.whoami().await?;
//     let ctx = ZoneContext::new(account_id, "example.com");
//
//     for record in provider.list_records(&ctx, "myip").await? {
//         provider.delete_record(&ctx, &record.id).await?;
//     }
//     provider.create_record(&ctx, &NewRecord::a("myip", "203.0.113.5")).await?;
//
//     Ok(())
// }
// ```

use async_trait::async_trait;
use serde::Serialize;

/// Record type for IPv4 address records
pub const RECORD_TYPE_A: &str = "A";

/// A record as published by the provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DnsRecord {
    /// Provider-assigned identifier
    pub id: String,
    /// Record name relative to the zone
    pub name: String,
    /// Record type (e.g., "A")
    pub record_type: String,
    /// Record content (the address for A records)
    pub content: String,
}

impl DnsRecord {
    /// Whether this is an IPv4 address record
    pub fn is_address_record(&self) -> bool {
        self.record_type.eq_ignore_ascii_case(RECORD_TYPE_A)
    }
}

/// A record to be created
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewRecord {
    /// Record name relative to the zone
    pub name: String,
    /// Record type
    #[serde(rename = "type")]
    pub record_type: String,
    /// Record content
    pub content: String,
}

impl NewRecord {
    /// An "A" record for `name` pointing at `address`
    pub fn a(name: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            record_type: RECORD_TYPE_A.to_string(),
            content: address.into(),
        }
    }
}

/// Explicit provider context for record operations
///
/// Resolved once per run (account via [`DnsProvider::whoami`]) and passed to
/// every record call instead of living inside the provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZoneContext {
    /// Provider account identifier
    pub account_id: String,
    /// Zone (domain) name
    pub zone: String,
}

impl ZoneContext {
    pub fn new(account_id: impl Into<String>, zone: impl Into<String>) -> Self {
        Self {
            account_id: account_id.into(),
            zone: zone.into(),
        }
    }
}

/// Trait for DNS provider implementations
///
/// The reconciler depends only on the semantics of these four operations,
/// never on their transport.
///
/// # Restrictions
///
/// - One API round-trip per logical call (pagination excepted)
/// - No retry logic or backoff: return the error, the run aborts
/// - No caching of records between calls
/// - Never log credentials
#[async_trait]
pub trait DnsProvider: Send + Sync {
    /// Look up the account the credentials belong to
    ///
    /// # Returns
    ///
    /// - `Ok(String)`: The account identifier
    /// - `Err(Error)`: Authentication or transport failure
    async fn whoami(&self) -> Result<String, crate::Error>;

    /// List records in `ctx.zone` whose name matches `name`
    ///
    /// Implementations should narrow the query to address records when the
    /// API allows it; callers still ignore non-address records.
    async fn list_records(
        &self,
        ctx: &ZoneContext,
        name: &str,
    ) -> Result<Vec<DnsRecord>, crate::Error>;

    /// Delete a record by its provider-assigned id
    async fn delete_record(&self, ctx: &ZoneContext, record_id: &str) -> Result<(), crate::Error>;

    /// Create a record
    ///
    /// # Returns
    ///
    /// The record as stored by the provider
    async fn create_record(
        &self,
        ctx: &ZoneContext,
        record: &NewRecord,
    ) -> Result<DnsRecord, crate::Error>;

    /// Get the provider name (for logging/debugging)
    fn provider_name(&self) -> &'static str;
}
