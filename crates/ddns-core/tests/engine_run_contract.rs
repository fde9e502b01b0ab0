//! Contract Test: One-shot Run
//!
//! Constraints verified:
//! - The account is resolved before discovery and reconciliation
//! - A degraded discovery proceeds to reconciliation in failsafe mode
//! - Provider errors abort the run

mod common;

use common::*;
use ddns_core::{AddressSource, DdnsEngine, DnsProvider, RecordTarget};

fn engine(sources: Vec<Box<dyn AddressSource>>, provider: &MockDnsProvider) -> DdnsEngine {
    let provider: Box<dyn DnsProvider> = Box::new(MockDnsProvider::sharing_state_with(provider));
    DdnsEngine::new(sources, provider, RecordTarget::new("example.com", "myip"))
}

#[tokio::test]
async fn run_resolves_account_then_reconciles() {
    let provider = MockDnsProvider::with_records("myip", &["192.0.2.1", "192.0.2.2"]);
    let sources: Vec<Box<dyn AddressSource>> = vec![
        Box::new(StaticSource::new("local", &["192.0.2.1"])),
        Box::new(StaticSource::new("remote", &["192.0.2.3"])),
    ];

    let summary = engine(sources, &provider)
        .run_once()
        .await
        .expect("run succeeds");

    let calls = provider.calls();
    assert_eq!(calls.first(), Some(&Call::Whoami));
    assert_eq!(
        calls.get(1),
        Some(&Call::List {
            zone: "example.com".to_string(),
            name: "myip".to_string(),
        })
    );

    assert!(!summary.discovery.failsafe);
    assert_eq!(summary.report.created, set(&["192.0.2.3"]));
    assert_eq!(summary.report.deleted.len(), 1);
    assert_eq!(provider.published(), set(&["192.0.2.1", "192.0.2.3"]));
}

#[tokio::test]
async fn both_sources_failing_still_reconciles_without_deleting() {
    let provider = MockDnsProvider::with_records("myip", &["192.0.2.1", "192.0.2.2"]);
    let sources: Vec<Box<dyn AddressSource>> = vec![
        Box::new(FailingSource::local()),
        Box::new(FailingSource::remote()),
    ];

    let summary = engine(sources, &provider)
        .run_once()
        .await
        .expect("degraded run still succeeds");

    assert!(summary.discovery.failsafe);
    assert!(summary.discovery.addresses.is_empty());
    assert_eq!(summary.report.refused.len(), 2);
    assert!(summary.report.created.is_empty());
    assert!(provider.delete_calls().is_empty());
    assert!(provider.create_calls().is_empty());
}

#[tokio::test]
async fn provider_failure_aborts_run() {
    let provider = MockDnsProvider::with_records("myip", &["192.0.2.1"]).failing_list();
    let sources: Vec<Box<dyn AddressSource>> =
        vec![Box::new(StaticSource::new("remote", &["192.0.2.3"]))];

    let err = engine(sources, &provider)
        .run_once()
        .await
        .expect_err("provider failure must abort");

    assert!(err.is_provider_error());
    assert!(provider.create_calls().is_empty());
}
