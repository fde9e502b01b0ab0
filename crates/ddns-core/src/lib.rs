// # ddns-core
//
// Core library for the one-shot DDNS updater.
//
// ## Architecture Overview
//
// This library provides the core functionality for dynamic DNS updates:
// - **AddressSource**: Trait for discovering addresses that should be published
// - **DnsProvider**: Trait for listing, creating and deleting records via provider APIs
// - **discovery**: Queries every source, tolerating failure via a failsafe flag
// - **reconcile**: Diffs desired addresses against published records and applies the result
// - **DdnsEngine**: Runs discovery then reconciliation once
//
// ## Design Principles
//
// 1. **Separation of Concerns**: Core logic is separate from source and provider implementations
// 2. **Degrade, don't abort**: A failing address source switches off deletions instead of failing the run
// 3. **Library-First**: All core functionality can be used as a library
// 4. **Explicit context**: Provider account and zone travel as values, not hidden state

pub mod traits;
pub mod discovery;
pub mod reconcile;
pub mod engine;
pub mod config;
pub mod error;

// Re-export core types for convenience
pub use traits::{AddressSource, DnsProvider, DnsRecord, NewRecord, ZoneContext};
pub use discovery::{AddressSet, Discovery, discover_all};
pub use reconcile::{ExistingRecordMap, ReconcilePlan, ReconcileReport, Reconciler, plan};
pub use engine::{DdnsEngine, RunSummary};
pub use config::{Credentials, DdnsConfig, EchoConfig, LocalSourceConfig, ProviderConfig, RecordTarget};
pub use error::{Error, Result};
