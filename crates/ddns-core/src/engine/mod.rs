//! Core DDNS engine
//!
//! The DdnsEngine runs one update pass:
//! - Resolving the provider account (explicit [`ZoneContext`])
//! - Discovering addresses via every [`AddressSource`]
//! - Reconciling the provider's records against them
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐      ┌──────────────┐
//! │ AddressSource│ ...  │ AddressSource│
//! └──────────────┘      └──────────────┘
//!         └────── Discovery ──────┘
//!                     │ addresses + failsafe
//!                     ▼
//!            ┌──────────────┐        ┌─────────────┐
//!            │  Reconciler  │───────▶│ DnsProvider │
//!            └──────────────┘        └─────────────┘
//! ```
//!
//! There is no loop, no state store and no retry: the process runs once and exits.

use crate::config::RecordTarget;
use crate::discovery::{self, Discovery};
use crate::error::Result;
use crate::reconcile::{ReconcileReport, Reconciler};
use crate::traits::{AddressSource, DnsProvider, ZoneContext};
use tracing::info;

/// Everything a completed run observed and did
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    /// Discovery outcome, including the failsafe flag
    pub discovery: Discovery,

    /// Reconciliation outcome
    pub report: ReconcileReport,
}

/// Core DDNS engine
///
/// ## Lifecycle
///
/// 1. Create with [`DdnsEngine::new()`]
/// 2. Call [`DdnsEngine::run_once()`]
/// 3. Drop
pub struct DdnsEngine {
    /// Address sources, queried in order
    sources: Vec<Box<dyn AddressSource>>,

    /// DNS provider for reading and writing records
    provider: Box<dyn DnsProvider>,

    /// The record being managed
    target: RecordTarget,
}

impl DdnsEngine {
    /// Create a new DDNS engine
    ///
    /// # Parameters
    ///
    /// - `sources`: Address sources (typically local interface + remote echo)
    /// - `provider`: DNS provider implementation
    /// - `target`: Domain and record name to reconcile
    pub fn new(
        sources: Vec<Box<dyn AddressSource>>,
        provider: Box<dyn DnsProvider>,
        target: RecordTarget,
    ) -> Self {
        Self {
            sources,
            provider,
            target,
        }
    }

    /// Run one discovery + reconciliation pass
    ///
    /// # Returns
    ///
    /// - `Ok(RunSummary)`: The pass completed (possibly in failsafe mode)
    /// - `Err(Error)`: A provider call failed; the pass was aborted
    pub async fn run_once(&self) -> Result<RunSummary> {
        info!(
            "Updating {} via {}",
            self.target.fqdn(),
            self.provider.provider_name()
        );

        let account_id = self.provider.whoami().await?;
        let ctx = ZoneContext::new(account_id, self.target.domain.clone());

        let discovery = discovery::discover_all(&self.sources).await;

        let report = Reconciler::new(self.provider.as_ref())
            .reconcile(&ctx, &self.target.name, &discovery.addresses, discovery.failsafe)
            .await?;

        info!(
            "Reconciliation complete: {} kept, {} created, {} deleted, {} refused",
            report.kept.len(),
            report.created.len(),
            report.deleted.len(),
            report.refused.len()
        );

        Ok(RunSummary { discovery, report })
    }
}
