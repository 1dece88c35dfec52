//! Application layer: orchestration across domain logic and infrastructure I/O.

pub mod applications;
pub mod attestation;
pub mod ballots;
pub mod results;

pub use applications::{review_application, submit_application, update_application};
pub use attestation::verify_application_proof;
pub use ballots::{patch_ballot, submit_ballot, BallotParams};
pub use results::{calculate_results, export_round_weights, list_round_results, publish_results};

use crate::domain::ballot::BallotSigningScope;
use crate::infrastructure::cache::CacheSink;
use crate::infrastructure::content::ContentStore;
use crate::infrastructure::ledger::{LedgerClient, PollConfig};
use crate::infrastructure::storage::Storage;
use std::sync::Arc;

/// Shared dependencies for every round operation. Cheap to clone; all
/// members sit behind `Arc`.
#[derive(Clone)]
pub struct RoundContext {
    pub storage: Arc<dyn Storage>,
    pub ledger: Arc<dyn LedgerClient>,
    pub content: Arc<dyn ContentStore>,
    pub cache: Arc<dyn CacheSink>,
    pub signing_scope: BallotSigningScope,
    pub poll: PollConfig,
}

impl RoundContext {
    pub fn new(
        storage: Arc<dyn Storage>,
        ledger: Arc<dyn LedgerClient>,
        content: Arc<dyn ContentStore>,
        cache: Arc<dyn CacheSink>,
    ) -> Self {
        Self { storage, ledger, content, cache, signing_scope: BallotSigningScope::default(), poll: PollConfig::default() }
    }

    /// Overrides the ledger polling window. Tests shrink it to keep the
    /// not-found paths fast.
    pub fn with_poll(mut self, poll: PollConfig) -> Self {
        self.poll = poll;
        self
    }

    pub fn with_signing_scope(mut self, scope: BallotSigningScope) -> Self {
        self.signing_scope = scope;
        self
    }
}
