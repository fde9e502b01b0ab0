//! Core traits for the DDNS updater
//!
//! This module defines the collaborator interfaces the core consumes.
//!
//! - [`AddressSource`]: Discover addresses that should be published
//! - [`DnsProvider`]: Read and mutate address records via provider APIs

pub mod address_source;
pub mod dns_provider;

pub use address_source::AddressSource;
pub use dns_provider::{DnsProvider, DnsRecord, NewRecord, ZoneContext, RECORD_TYPE_A};
