//! System-wide constants for the round core.

/// Total polling budget for ledger lookups (attestations and receipts).
pub const LEDGER_POLL_TIMEOUT_SECS: u64 = 30;

/// Delay between ledger polling attempts.
pub const LEDGER_POLL_INTERVAL_SECS: u64 = 2;

/// Fixed total that exported proportional weights must sum to (100%).
pub const WEIGHT_PRECISION_SCALE: u64 = 1_000_000;

/// Domain separator for delegated ballot signatures.
pub const BALLOT_SIGNING_DOMAIN: &str = "retro-rounds-ballot";

/// Version of the ballot signing payload layout.
pub const BALLOT_SIGNING_VERSION: &str = "1";

/// Recoverable ECDSA signature size: 64-byte compact form plus recovery id.
pub const RECOVERABLE_SIGNATURE_SIZE: usize = 65;

/// Maximum length of a project name in an application version.
pub const MAX_PROJECT_NAME_LENGTH: usize = 256;

/// Maximum size of a single form answer when serialized (10 KB).
pub const MAX_ANSWER_SIZE_BYTES: usize = 10 * 1024;

/// Env var honored by `now_millis` for deterministic tests.
pub const TEST_NOW_MILLIS_ENV_VAR: &str = "ROUNDS_TEST_NOW_MILLIS";

/// Event signature topic for `Attested(address,address,bytes32,bytes32)` as
/// emitted by the attestation contract.
pub const ATTESTED_EVENT_SIGNATURE: &str = "8bf46bf4cfd674fa735a3d63ec1c9ad4153f033c290341f3a588b75685141b35";
