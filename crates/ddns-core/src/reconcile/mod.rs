//! Record reconciliation
//!
//! Makes the provider's address records for one name match the discovered
//! [`AddressSet`] with the fewest create/delete calls.
//!
//! ## Flow
//!
//! 1. Fetch the existing records and key them by address ([`ExistingRecordMap`])
//! 2. Diff desired against existing ([`plan`]): kept, to-create, to-delete
//! 3. Delete stale records, unless failsafe mode refuses
//! 4. Create missing records
//!
//! Provider errors are not caught. Calls issued before a failure stay applied;
//! the provider may be left with a mix of old and new records.

use crate::discovery::AddressSet;
use crate::error::Result;
use crate::traits::{DnsProvider, DnsRecord, NewRecord, ZoneContext};
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

/// Existing address records keyed by their content
///
/// Keys are unique. When the provider returns several records with the same
/// address, the last one wins and the others are left alone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExistingRecordMap {
    records: BTreeMap<String, DnsRecord>,
}

impl ExistingRecordMap {
    /// Build the map from a provider listing
    ///
    /// Records that are not address ("A") records are skipped.
    pub fn from_records(records: impl IntoIterator<Item = DnsRecord>) -> Self {
        let mut map = BTreeMap::new();

        for record in records {
            if !record.is_address_record() {
                debug!(
                    "Ignoring {} record {} (id {})",
                    record.record_type, record.name, record.id
                );
                continue;
            }

            if let Some(shadowed) = map.insert(record.content.clone(), record) {
                warn!(
                    "Duplicate record for {:?} (id {}); only one will be managed",
                    shadowed.content, shadowed.id
                );
            }
        }

        Self { records: map }
    }

    pub fn get(&self, address: &str) -> Option<&DnsRecord> {
        self.records.get(address)
    }

    pub fn contains(&self, address: &str) -> bool {
        self.records.contains_key(address)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterate over (address, record) pairs in address order
    pub fn iter(&self) -> impl Iterator<Item = (&String, &DnsRecord)> {
        self.records.iter()
    }
}

/// The three disjoint outcomes of diffing desired against existing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcilePlan {
    /// Desired addresses that already have a record
    pub kept: AddressSet,

    /// Desired addresses with no record yet
    pub to_create: AddressSet,

    /// Existing records whose address is no longer desired
    pub to_delete: Vec<DnsRecord>,
}

impl ReconcilePlan {
    /// Whether the plan requires no provider writes
    pub fn is_noop(&self) -> bool {
        self.to_create.is_empty() && self.to_delete.is_empty()
    }
}

/// Diff the desired addresses against the existing records
///
/// Pure: neither input is modified.
pub fn plan(desired: &AddressSet, existing: &ExistingRecordMap) -> ReconcilePlan {
    let (kept, to_create): (AddressSet, AddressSet) = desired
        .iter()
        .cloned()
        .partition(|addr| existing.contains(addr));

    let to_delete = existing
        .iter()
        .filter(|(addr, _)| !desired.contains(*addr))
        .map(|(_, record)| record.clone())
        .collect();

    ReconcilePlan {
        kept,
        to_create,
        to_delete,
    }
}

/// What a reconciliation pass actually did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    /// Addresses whose record was already present
    pub kept: AddressSet,

    /// Addresses for which a record was created
    pub created: AddressSet,

    /// Records that were deleted
    pub deleted: Vec<DnsRecord>,

    /// Records whose deletion was refused by failsafe mode
    pub refused: Vec<DnsRecord>,
}

/// Applies reconciliation plans through a [`DnsProvider`]
pub struct Reconciler<'a> {
    provider: &'a dyn DnsProvider,
}

impl<'a> Reconciler<'a> {
    pub fn new(provider: &'a dyn DnsProvider) -> Self {
        Self { provider }
    }

    /// Fetch the existing records for `name` in `ctx.zone`
    pub async fn fetch_existing(&self, ctx: &ZoneContext, name: &str) -> Result<ExistingRecordMap> {
        let records = self.provider.list_records(ctx, name).await?;
        debug!(
            "Provider {} returned {} record(s) for {:?} in {}",
            self.provider.provider_name(),
            records.len(),
            name,
            ctx.zone
        );
        Ok(ExistingRecordMap::from_records(records))
    }

    /// Make the records for `name` match `desired`
    ///
    /// # Parameters
    ///
    /// - `ctx`: Account and zone to operate on
    /// - `name`: Record name relative to the zone
    /// - `desired`: Addresses that should be published
    /// - `failsafe`: When set, stale records are reported but not deleted
    ///
    /// # Returns
    ///
    /// - `Ok(ReconcileReport)`: Every planned operation was issued
    /// - `Err(Error)`: A provider call failed; earlier calls stay applied
    pub async fn reconcile(
        &self,
        ctx: &ZoneContext,
        name: &str,
        desired: &AddressSet,
        failsafe: bool,
    ) -> Result<ReconcileReport> {
        let existing = self.fetch_existing(ctx, name).await?;
        let plan = plan(desired, &existing);

        let mut report = ReconcileReport {
            kept: plan.kept,
            ..ReconcileReport::default()
        };

        for addr in &report.kept {
            info!("Found existing record for {:?}", addr);
        }

        for record in plan.to_delete {
            if failsafe {
                warn!("FAILSAFE MODE: Refusing to delete record for {:?}", record.content);
                report.refused.push(record);
            } else {
                info!("Deleting record for {:?}", record.content);
                self.provider.delete_record(ctx, &record.id).await?;
                report.deleted.push(record);
            }
        }

        for addr in plan.to_create {
            info!("Creating record for {:?}", addr);
            self.provider
                .create_record(ctx, &NewRecord::a(name, addr.clone()))
                .await?;
            report.created.insert(addr);
        }

        Ok(report)
    }
}
