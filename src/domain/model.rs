use crate::domain::form::RoundForm;
use crate::domain::phase::RoundSchedule;
use crate::foundation::{
    AccountId, ApplicationId, AttestationUid, CategoryId, RoundId, SchemaId, Timestamp, TxHash, UserId, WalletAddress,
};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Vote budget limits and the optional voter allow-list for a round.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct VotingConfig {
    pub max_votes_per_voter: u64,
    pub max_votes_per_project_per_voter: u64,
    /// Empty set means every authenticated voter is allowed.
    #[serde(default)]
    pub allowed_voter_ids: BTreeSet<UserId>,
}

/// Per-chain attestation configuration. Presence makes a ledger proof
/// mandatory for every application in the round.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AttestationSetup {
    pub contract_address: WalletAddress,
    pub application_schema_id: SchemaId,
    pub review_schema_id: SchemaId,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Round {
    pub id: RoundId,
    pub schedule: RoundSchedule,
    pub voting_config: VotingConfig,
    pub form: RoundForm,
    pub attestation_setup: Option<AttestationSetup>,
    #[serde(default)]
    pub results_calculated: bool,
    #[serde(default)]
    pub results_published: bool,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationState {
    #[default]
    Pending,
    Approved,
    Rejected,
}

/// Ledger proof attached to an application version.
///
/// Exactly one form exists at a time; the only allowed mutation is the
/// deferred-to-attested promotion once the minting transaction confirms.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttestationProof {
    Attested(AttestationUid),
    Deferred(TxHash),
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ApplicationVersion {
    pub project_name: String,
    pub account_id: AccountId,
    pub category_id: CategoryId,
    /// Form answers keyed by field id. `BTreeMap` keeps iteration order
    /// deterministic for hashing and comparison.
    pub answers: BTreeMap<String, serde_json::Value>,
    pub proof: Option<AttestationProof>,
    pub created_at: Timestamp,
}

/// Application aggregate: immutable identity plus an append-only version
/// list. The latest version is current; editing appends and resets the
/// review state to `Pending`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Application {
    pub id: ApplicationId,
    pub round_id: RoundId,
    pub submitter_user_id: UserId,
    pub submitter_wallet: WalletAddress,
    pub state: ApplicationState,
    pub versions: Vec<ApplicationVersion>,
}

impl Application {
    pub fn current_version(&self) -> Option<&ApplicationVersion> {
        self.versions.last()
    }
}

/// One voter's allocation map for a round. Unique per `(round, voter)`;
/// the storage layer enforces the constraint.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Ballot {
    pub round_id: RoundId,
    pub voter_user_id: UserId,
    pub voter_wallet: WalletAddress,
    pub allocations: BTreeMap<ApplicationId, u64>,
    pub created_at: Timestamp,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TallyMethod {
    Sum,
    Average,
    Median,
}

impl TallyMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            TallyMethod::Sum => "sum",
            TallyMethod::Average => "average",
            TallyMethod::Median => "median",
        }
    }
}

/// One persisted tally row. The full set for a round is replaced wholesale
/// on every recalculation; rows are never merged.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ResultRow {
    pub round_id: RoundId,
    pub application_id: ApplicationId,
    pub allocation: u64,
    pub method: TallyMethod,
}

/// Draft payload for submit/update application operations.
#[derive(Clone, Debug)]
pub struct ApplicationDraft {
    pub project_name: String,
    pub account_id: AccountId,
    pub category_id: CategoryId,
    pub answers: BTreeMap<String, serde_json::Value>,
    pub proof: Option<AttestationProof>,
}

/// Caller identity pre-resolved by the authorization layer above this core.
#[derive(Clone, Debug)]
pub struct Actor {
    pub user_id: UserId,
    pub wallet: WalletAddress,
    pub is_admin: bool,
}

impl Actor {
    pub fn user(user_id: impl Into<UserId>, wallet: impl Into<WalletAddress>) -> Self {
        Self { user_id: user_id.into(), wallet: wallet.into(), is_admin: false }
    }

    pub fn admin(user_id: impl Into<UserId>) -> Self {
        Self { user_id: user_id.into(), wallet: WalletAddress::default(), is_admin: true }
    }
}
