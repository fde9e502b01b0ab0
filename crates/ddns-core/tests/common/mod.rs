//! Test doubles and common utilities for reconciliation contract tests
//!
//! These doubles record every provider call so tests can assert on the exact
//! set of operations a run issued.

#![allow(dead_code)]

use ddns_core::error::{Error, Result};
use ddns_core::traits::{AddressSource, DnsProvider, DnsRecord, NewRecord, ZoneContext};
use ddns_core::AddressSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Account id returned by [`MockDnsProvider::whoami`]
pub const TEST_ACCOUNT: &str = "1010";

/// An address source that always returns the same addresses
pub struct StaticSource {
    name: &'static str,
    addresses: Vec<String>,
    call_count: Arc<AtomicUsize>,
}

impl StaticSource {
    pub fn new(name: &'static str, addresses: &[&str]) -> Self {
        Self {
            name,
            addresses: addresses.iter().map(|a| a.to_string()).collect(),
            call_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl AddressSource for StaticSource {
    async fn discover(&self) -> Result<Vec<String>> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        Ok(self.addresses.clone())
    }

    fn source_name(&self) -> &'static str {
        self.name
    }
}

/// An address source that always fails with a discovery error
pub struct FailingSource {
    name: &'static str,
    remote: bool,
}

impl FailingSource {
    pub fn local() -> Self {
        Self {
            name: "local",
            remote: false,
        }
    }

    pub fn remote() -> Self {
        Self {
            name: "remote",
            remote: true,
        }
    }
}

#[async_trait::async_trait]
impl AddressSource for FailingSource {
    async fn discover(&self) -> Result<Vec<String>> {
        if self.remote {
            Err(Error::remote_discovery("request timed out"))
        } else {
            Err(Error::local_discovery("Device \"eth9\" does not exist."))
        }
    }

    fn source_name(&self) -> &'static str {
        self.name
    }
}

/// A provider call, as recorded by [`MockDnsProvider`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Whoami,
    List { zone: String, name: String },
    Delete { zone: String, id: String },
    Create { zone: String, name: String, content: String },
}

/// An in-memory provider that records calls
pub struct MockDnsProvider {
    records: Arc<Mutex<Vec<DnsRecord>>>,
    calls: Arc<Mutex<Vec<Call>>>,
    next_id: Arc<AtomicUsize>,
    /// Content whose creation fails with a provider error
    fail_create_for: Option<String>,
    /// Make every list call fail
    fail_list: bool,
}

impl MockDnsProvider {
    pub fn new() -> Self {
        Self {
            records: Arc::new(Mutex::new(Vec::new())),
            calls: Arc::new(Mutex::new(Vec::new())),
            next_id: Arc::new(AtomicUsize::new(100)),
            fail_create_for: None,
            fail_list: false,
        }
    }

    /// Seed the provider with A records for `name`, ids "1", "2", ...
    pub fn with_records(name: &str, contents: &[&str]) -> Self {
        let provider = Self::new();
        {
            let mut records = provider.records.lock().unwrap();
            for (i, content) in contents.iter().enumerate() {
                records.push(a_record(&(i + 1).to_string(), name, content));
            }
        }
        provider
    }

    /// Seed an arbitrary record
    pub fn push_record(&self, record: DnsRecord) {
        self.records.lock().unwrap().push(record);
    }

    pub fn failing_create_for(mut self, content: &str) -> Self {
        self.fail_create_for = Some(content.to_string());
        self
    }

    pub fn failing_list(mut self) -> Self {
        self.fail_list = true;
        self
    }

    /// Create a new provider that shares records and call log with an existing one
    pub fn sharing_state_with(other: &Self) -> Self {
        Self {
            records: Arc::clone(&other.records),
            calls: Arc::clone(&other.calls),
            next_id: Arc::clone(&other.next_id),
            fail_create_for: other.fail_create_for.clone(),
            fail_list: other.fail_list,
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn delete_calls(&self) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|c| matches!(c, Call::Delete { .. }))
            .collect()
    }

    pub fn create_calls(&self) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|c| matches!(c, Call::Create { .. }))
            .collect()
    }

    /// Contents currently published, as a set
    pub fn published(&self) -> AddressSet {
        self.records
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.is_address_record())
            .map(|r| r.content.clone())
            .collect()
    }

    fn record_call(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait::async_trait]
impl DnsProvider for MockDnsProvider {
    async fn whoami(&self) -> Result<String> {
        self.record_call(Call::Whoami);
        Ok(TEST_ACCOUNT.to_string())
    }

    async fn list_records(&self, ctx: &ZoneContext, name: &str) -> Result<Vec<DnsRecord>> {
        self.record_call(Call::List {
            zone: ctx.zone.clone(),
            name: name.to_string(),
        });
        if self.fail_list {
            return Err(Error::auth("token rejected"));
        }
        Ok(self
            .records
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.name == name)
            .cloned()
            .collect())
    }

    async fn delete_record(&self, ctx: &ZoneContext, record_id: &str) -> Result<()> {
        self.record_call(Call::Delete {
            zone: ctx.zone.clone(),
            id: record_id.to_string(),
        });
        let mut records = self.records.lock().unwrap();
        let before = records.len();
        records.retain(|r| r.id != record_id);
        if records.len() == before {
            return Err(Error::not_found(format!("record {}", record_id)));
        }
        Ok(())
    }

    async fn create_record(&self, ctx: &ZoneContext, record: &NewRecord) -> Result<DnsRecord> {
        self.record_call(Call::Create {
            zone: ctx.zone.clone(),
            name: record.name.clone(),
            content: record.content.clone(),
        });
        if self.fail_create_for.as_deref() == Some(record.content.as_str()) {
            return Err(Error::provider("mock", "validation failed"));
        }
        let id = self.next_id.fetch_add(1, Ordering::SeqCst).to_string();
        let created = DnsRecord {
            id,
            name: record.name.clone(),
            record_type: record.record_type.clone(),
            content: record.content.clone(),
        };
        self.records.lock().unwrap().push(created.clone());
        Ok(created)
    }

    fn provider_name(&self) -> &'static str {
        "mock"
    }
}

pub fn a_record(id: &str, name: &str, content: &str) -> DnsRecord {
    DnsRecord {
        id: id.to_string(),
        name: name.to_string(),
        record_type: "A".to_string(),
        content: content.to_string(),
    }
}

pub fn set(addrs: &[&str]) -> AddressSet {
    addrs.iter().map(|a| a.to_string()).collect()
}

pub fn ctx() -> ZoneContext {
    ZoneContext::new(TEST_ACCOUNT, "example.com")
}
