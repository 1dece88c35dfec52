#![allow(dead_code)]

use crate::fixtures::{APP_END, APP_START, RESULTS_START, TEST_ROUND_ID, VOTING_END, VOTING_START};
use rounds_core::application::RoundContext;
use rounds_core::domain::form::{FieldKind, FormField, RoundForm};
use rounds_core::domain::{
    ApplicationDraft, AttestationProof, AttestationSetup, Round, RoundSchedule, VotingConfig,
};
use rounds_core::foundation::{AccountId, CategoryId, UserId, WalletAddress};
use rounds_core::infrastructure::cache::NoopCache;
use rounds_core::infrastructure::content::MemoryContentStore;
use rounds_core::infrastructure::ledger::{MockLedger, PollConfig};
use rounds_core::infrastructure::storage::MemoryStorage;
use secp256k1::{PublicKey, Secp256k1, SecretKey};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use std::time::Duration;

pub struct RoundBuilder {
    id: String,
    schedule: RoundSchedule,
    max_votes_per_voter: u64,
    max_votes_per_project_per_voter: u64,
    allowed_voter_ids: BTreeSet<UserId>,
    form: RoundForm,
    attestation_setup: Option<AttestationSetup>,
}

impl Default for RoundBuilder {
    fn default() -> Self {
        Self {
            id: TEST_ROUND_ID.to_string(),
            schedule: RoundSchedule {
                application_start: APP_START,
                application_end: APP_END,
                voting_start: VOTING_START,
                voting_end: VOTING_END,
                results_start: RESULTS_START,
            },
            max_votes_per_voter: 100,
            max_votes_per_project_per_voter: 50,
            allowed_voter_ids: BTreeSet::new(),
            form: default_form(),
            attestation_setup: None,
        }
    }
}

impl RoundBuilder {
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn schedule(mut self, schedule: RoundSchedule) -> Self {
        self.schedule = schedule;
        self
    }

    pub fn max_votes(mut self, per_voter: u64, per_project: u64) -> Self {
        self.max_votes_per_voter = per_voter;
        self.max_votes_per_project_per_voter = per_project;
        self
    }

    pub fn allow_voter(mut self, user_id: impl Into<UserId>) -> Self {
        self.allowed_voter_ids.insert(user_id.into());
        self
    }

    pub fn attestation_setup(mut self, setup: AttestationSetup) -> Self {
        self.attestation_setup = Some(setup);
        self
    }

    pub fn build(self) -> Round {
        Round {
            id: self.id.into(),
            schedule: self.schedule,
            voting_config: VotingConfig {
                max_votes_per_voter: self.max_votes_per_voter,
                max_votes_per_project_per_voter: self.max_votes_per_project_per_voter,
                allowed_voter_ids: self.allowed_voter_ids,
            },
            form: self.form,
            attestation_setup: self.attestation_setup,
            results_calculated: false,
            results_published: false,
        }
    }
}

pub fn default_form() -> RoundForm {
    RoundForm::new(vec![
        FormField {
            id: "about".to_string(),
            kind: FieldKind::Markdown,
            label: "About the project".to_string(),
            private: false,
            options: vec![],
        },
        FormField {
            id: "website".to_string(),
            kind: FieldKind::Url,
            label: "Website".to_string(),
            private: false,
            options: vec![],
        },
        FormField {
            id: "contact_email".to_string(),
            kind: FieldKind::Email,
            label: "Contact email".to_string(),
            private: true,
            options: vec![],
        },
    ])
}

pub struct DraftBuilder {
    project_name: String,
    account_id: AccountId,
    category_id: CategoryId,
    answers: BTreeMap<String, serde_json::Value>,
    proof: Option<AttestationProof>,
}

impl Default for DraftBuilder {
    fn default() -> Self {
        let mut answers = BTreeMap::new();
        answers.insert("about".to_string(), serde_json::json!("We build round tooling."));
        Self {
            project_name: "Project One".to_string(),
            account_id: AccountId::from("acct-1"),
            category_id: CategoryId::from("cat-infra"),
            answers,
            proof: None,
        }
    }
}

impl DraftBuilder {
    pub fn project_name(mut self, name: impl Into<String>) -> Self {
        self.project_name = name.into();
        self
    }

    pub fn answer(mut self, field_id: impl Into<String>, value: serde_json::Value) -> Self {
        self.answers.insert(field_id.into(), value);
        self
    }

    pub fn no_answers(mut self) -> Self {
        self.answers.clear();
        self
    }

    pub fn proof(mut self, proof: AttestationProof) -> Self {
        self.proof = Some(proof);
        self
    }

    pub fn build(self) -> ApplicationDraft {
        ApplicationDraft {
            project_name: self.project_name,
            account_id: self.account_id,
            category_id: self.category_id,
            answers: self.answers,
            proof: self.proof,
        }
    }
}

/// Shared context wired to in-memory collaborators, plus direct handles for
/// scripting and inspection. The polling window is shrunk so not-found
/// paths stay fast.
pub struct TestContext {
    pub ctx: RoundContext,
    pub storage: Arc<MemoryStorage>,
    pub ledger: Arc<MockLedger>,
    pub content: Arc<MemoryContentStore>,
}

pub fn test_context() -> TestContext {
    let storage = Arc::new(MemoryStorage::new());
    let ledger = Arc::new(MockLedger::new());
    let content = Arc::new(MemoryContentStore::new());
    let ctx = RoundContext::new(storage.clone(), ledger.clone(), content.clone(), Arc::new(NoopCache))
        .with_poll(PollConfig { timeout: Duration::from_millis(200), interval: Duration::from_millis(10) });
    TestContext { ctx, storage, ledger, content }
}

/// Fresh secp256k1 key and its derived wallet address.
pub fn wallet_keypair() -> (SecretKey, WalletAddress) {
    let secp = Secp256k1::new();
    let secret_key = SecretKey::new(&mut rand::thread_rng());
    let public_key = PublicKey::from_secret_key(&secp, &secret_key);
    (secret_key, WalletAddress::from_public_key(&public_key))
}
