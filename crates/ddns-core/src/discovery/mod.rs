//! Address discovery
//!
//! Queries every configured [`AddressSource`] once, independently, and unions
//! the results. A failing source never aborts the run: the failure is logged
//! and the run degrades into failsafe mode, in which the reconciler refuses
//! to delete records.
//!
//! ```text
//! ┌──────────────────┐   ┌──────────────────┐
//! │ local interface  │   │  remote IP-echo  │
//! └──────────────────┘   └──────────────────┘
//!          │ Ok / Err             │ Ok / Err
//!          └──────────┬───────────┘
//!                     ▼
//!        Discovery { addresses, failsafe }
//! ```

use crate::traits::AddressSource;
use std::collections::BTreeSet;
use tracing::{debug, info, warn};

/// The set of addresses a run decides should be published
pub type AddressSet = BTreeSet<String>;

/// Outcome of a discovery pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Discovery {
    /// Union of addresses from every source that answered
    pub addresses: AddressSet,

    /// Set when at least one source failed; never cleared within a run
    pub failsafe: bool,
}

impl Discovery {
    /// Fold one source's outcome into the pass
    fn absorb(&mut self, source: &str, outcome: Result<Vec<String>, crate::Error>) {
        match outcome {
            Ok(addrs) => {
                debug!("Source {} returned {} address(es)", source, addrs.len());
                self.addresses.extend(addrs);
            }
            Err(e) => {
                warn!("Failed to get address(es) from {}: {}", source, e);
                self.failsafe = true;
            }
        }
    }
}

/// Query every source and union the results
///
/// Sources are queried in order. Every failure sets the failsafe flag; when
/// all sources fail the result is an empty set with failsafe enabled, which
/// is still a valid input to reconciliation.
pub async fn discover_all(sources: &[Box<dyn AddressSource>]) -> Discovery {
    let mut discovery = Discovery::default();

    for source in sources {
        let outcome = source.discover().await;
        discovery.absorb(source.source_name(), outcome);
    }

    info!("Current IP addresses: {:?}", discovery.addresses);
    if discovery.failsafe {
        warn!("FAILSAFE MODE ENABLED: at least one address source failed");
    }

    discovery
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absorb_unions_and_flags() {
        let mut discovery = Discovery::default();
        discovery.absorb("local", Ok(vec!["192.0.2.1".to_string(), "192.0.2.2".to_string()]));
        discovery.absorb("remote", Ok(vec!["192.0.2.1".to_string()]));
        assert_eq!(discovery.addresses.len(), 2);
        assert!(!discovery.failsafe);

        discovery.absorb("remote", Err(crate::Error::remote_discovery("timeout")));
        assert!(discovery.failsafe);
        assert_eq!(discovery.addresses.len(), 2);

        // A later success never clears the flag
        discovery.absorb("local", Ok(vec![]));
        assert!(discovery.failsafe);
    }
}
