use secp256k1::Error as SecpError;
use std::io;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    PhaseClosed,
    ScheduleOutOfOrder,
    AttestationRequired,
    AttestationNotFound,
    TransactionNotFound,
    AttestationSubmitterMismatch,
    AttestationPayloadInvalid,
    AttestationEventNotFound,
    PrivateFieldLeaked,
    FieldMismatch,
    BudgetExceeded,
    PerProjectLimitExceeded,
    InvalidApplicationReference,
    InvalidSignature,
    VoterNotAllowed,
    BallotAlreadySubmitted,
    BallotNotFound,
    RowParseError,
    DuplicateRow,
    NoVotesAllocated,
    ResultsNotCalculated,
    ResultsNotPublished,
    RoundNotFound,
    ApplicationNotFound,
    InvalidAnswer,
    NotAuthorized,
    LedgerUnavailable,
    ContentUnavailable,
    StorageError,
    SerializationError,
    EncodingError,
    CryptoError,
    Message,
}

/// Coarse classification of an error for the caller-facing taxonomy.
///
/// Orchestrators never branch on `ErrorKind`; it exists so the application
/// layer above this crate can map failures onto its own response shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Authorization,
    NotFound,
    Attestation,
    Transient,
    Storage,
    Internal,
}

#[derive(Debug, Clone)]
pub struct ErrorContext {
    pub code: ErrorCode,
    pub kind: ErrorKind,
    pub message: String,
}

#[derive(Debug, Error)]
pub enum RoundError {
    #[error("operation {operation} not allowed in phase {phase}")]
    PhaseClosed { operation: String, phase: String },

    #[error("round schedule out of order: {later} precedes {earlier}")]
    ScheduleOutOfOrder { earlier: String, later: String },

    #[error("attestation proof required for round {round_id}")]
    AttestationRequired { round_id: String },

    #[error("attestation not found after {waited_secs}s: {uid}")]
    AttestationNotFound { uid: String, waited_secs: u64 },

    #[error("transaction not confirmed after {waited_secs}s: {tx_hash}")]
    TransactionNotFound { tx_hash: String, waited_secs: u64 },

    #[error("attestation signer mismatch: expected {expected}, got {actual}")]
    AttestationSubmitterMismatch { expected: String, actual: String },

    #[error("attestation payload invalid: {details}")]
    AttestationPayloadInvalid { details: String },

    #[error("no attestation event found in receipt for tx {tx_hash}")]
    AttestationEventNotFound { tx_hash: String },

    #[error("private field {field_id} present in attested payload")]
    PrivateFieldLeaked { field_id: String },

    #[error("attested value mismatch for field {field_id}")]
    FieldMismatch { field_id: String },

    #[error("ballot total {total} exceeds budget {max}")]
    BudgetExceeded { total: u64, max: u64 },

    #[error("allocation {allocation} for application {application_id} exceeds per-project limit {max}")]
    PerProjectLimitExceeded { application_id: String, allocation: u64, max: u64 },

    #[error("ballot references unknown or non-approved applications: {ids:?}")]
    InvalidApplicationReference { ids: Vec<String> },

    #[error("ballot signature verification failed")]
    InvalidSignature,

    #[error("user {user_id} is not an allowed voter for round {round_id}")]
    VoterNotAllowed { user_id: String, round_id: String },

    #[error("ballot already submitted for round {round_id} by {voter_user_id}")]
    BallotAlreadySubmitted { round_id: String, voter_user_id: String },

    #[error("no ballot found for round {round_id} by {voter_user_id}")]
    BallotNotFound { round_id: String, voter_user_id: String },

    #[error("row {row}: invalid allocation value {value:?}")]
    RowParseError { row: usize, value: String },

    #[error("row {row}: duplicate application id {application_id}")]
    DuplicateRow { row: usize, application_id: String },

    #[error("cannot export weights: no votes allocated")]
    NoVotesAllocated,

    #[error("results not calculated for round {round_id}")]
    ResultsNotCalculated { round_id: String },

    #[error("results not published for round {round_id}")]
    ResultsNotPublished { round_id: String },

    #[error("round not found: {0}")]
    RoundNotFound(String),

    #[error("application not found: {0}")]
    ApplicationNotFound(String),

    #[error("invalid answer for field {field_id}: {details}")]
    InvalidAnswer { field_id: String, details: String },

    #[error("not authorized: {0}")]
    NotAuthorized(String),

    #[error("ledger unavailable during {operation}: {details}")]
    LedgerUnavailable { operation: String, details: String },

    #[error("content fetch failed for pointer {pointer}: {details}")]
    ContentUnavailable { pointer: String, details: String },

    #[error("storage error during {operation}: {details}")]
    StorageError { operation: String, details: String },

    #[error("{format} serialization error: {details}")]
    SerializationError { format: String, details: String },

    #[error("encoding error: {0}")]
    EncodingError(String),

    #[error("crypto error during {operation}: {details}")]
    CryptoError { operation: String, details: String },

    #[error("{0}")]
    Message(String),
}

pub type Result<T> = std::result::Result<T, RoundError>;

impl RoundError {
    pub fn code(&self) -> ErrorCode {
        match self {
            RoundError::PhaseClosed { .. } => ErrorCode::PhaseClosed,
            RoundError::ScheduleOutOfOrder { .. } => ErrorCode::ScheduleOutOfOrder,
            RoundError::AttestationRequired { .. } => ErrorCode::AttestationRequired,
            RoundError::AttestationNotFound { .. } => ErrorCode::AttestationNotFound,
            RoundError::TransactionNotFound { .. } => ErrorCode::TransactionNotFound,
            RoundError::AttestationSubmitterMismatch { .. } => ErrorCode::AttestationSubmitterMismatch,
            RoundError::AttestationPayloadInvalid { .. } => ErrorCode::AttestationPayloadInvalid,
            RoundError::AttestationEventNotFound { .. } => ErrorCode::AttestationEventNotFound,
            RoundError::PrivateFieldLeaked { .. } => ErrorCode::PrivateFieldLeaked,
            RoundError::FieldMismatch { .. } => ErrorCode::FieldMismatch,
            RoundError::BudgetExceeded { .. } => ErrorCode::BudgetExceeded,
            RoundError::PerProjectLimitExceeded { .. } => ErrorCode::PerProjectLimitExceeded,
            RoundError::InvalidApplicationReference { .. } => ErrorCode::InvalidApplicationReference,
            RoundError::InvalidSignature => ErrorCode::InvalidSignature,
            RoundError::VoterNotAllowed { .. } => ErrorCode::VoterNotAllowed,
            RoundError::BallotAlreadySubmitted { .. } => ErrorCode::BallotAlreadySubmitted,
            RoundError::BallotNotFound { .. } => ErrorCode::BallotNotFound,
            RoundError::RowParseError { .. } => ErrorCode::RowParseError,
            RoundError::DuplicateRow { .. } => ErrorCode::DuplicateRow,
            RoundError::NoVotesAllocated => ErrorCode::NoVotesAllocated,
            RoundError::ResultsNotCalculated { .. } => ErrorCode::ResultsNotCalculated,
            RoundError::ResultsNotPublished { .. } => ErrorCode::ResultsNotPublished,
            RoundError::RoundNotFound(_) => ErrorCode::RoundNotFound,
            RoundError::ApplicationNotFound(_) => ErrorCode::ApplicationNotFound,
            RoundError::InvalidAnswer { .. } => ErrorCode::InvalidAnswer,
            RoundError::NotAuthorized(_) => ErrorCode::NotAuthorized,
            RoundError::LedgerUnavailable { .. } => ErrorCode::LedgerUnavailable,
            RoundError::ContentUnavailable { .. } => ErrorCode::ContentUnavailable,
            RoundError::StorageError { .. } => ErrorCode::StorageError,
            RoundError::SerializationError { .. } => ErrorCode::SerializationError,
            RoundError::EncodingError(_) => ErrorCode::EncodingError,
            RoundError::CryptoError { .. } => ErrorCode::CryptoError,
            RoundError::Message(_) => ErrorCode::Message,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self.code() {
            ErrorCode::PhaseClosed
            | ErrorCode::ScheduleOutOfOrder
            | ErrorCode::AttestationRequired
            | ErrorCode::BudgetExceeded
            | ErrorCode::PerProjectLimitExceeded
            | ErrorCode::InvalidApplicationReference
            | ErrorCode::InvalidSignature
            | ErrorCode::VoterNotAllowed
            | ErrorCode::BallotAlreadySubmitted
            | ErrorCode::RowParseError
            | ErrorCode::DuplicateRow
            | ErrorCode::NoVotesAllocated
            | ErrorCode::ResultsNotCalculated
            | ErrorCode::ResultsNotPublished
            | ErrorCode::InvalidAnswer => ErrorKind::Validation,
            ErrorCode::NotAuthorized => ErrorKind::Authorization,
            ErrorCode::RoundNotFound | ErrorCode::ApplicationNotFound | ErrorCode::BallotNotFound => ErrorKind::NotFound,
            ErrorCode::AttestationNotFound
            | ErrorCode::TransactionNotFound
            | ErrorCode::AttestationSubmitterMismatch
            | ErrorCode::AttestationPayloadInvalid
            | ErrorCode::AttestationEventNotFound
            | ErrorCode::PrivateFieldLeaked
            | ErrorCode::FieldMismatch => ErrorKind::Attestation,
            ErrorCode::LedgerUnavailable | ErrorCode::ContentUnavailable => ErrorKind::Transient,
            ErrorCode::StorageError => ErrorKind::Storage,
            ErrorCode::SerializationError | ErrorCode::EncodingError | ErrorCode::CryptoError | ErrorCode::Message => {
                ErrorKind::Internal
            }
        }
    }

    pub fn context(&self) -> ErrorContext {
        ErrorContext { code: self.code(), kind: self.kind(), message: self.to_string() }
    }
}

impl From<hex::FromHexError> for RoundError {
    fn from(err: hex::FromHexError) -> Self {
        RoundError::EncodingError(format!("hex decode error: {}", err))
    }
}

impl From<io::Error> for RoundError {
    fn from(err: io::Error) -> Self {
        RoundError::StorageError { operation: "io".to_string(), details: err.to_string() }
    }
}

impl From<serde_json::Error> for RoundError {
    fn from(err: serde_json::Error) -> Self {
        RoundError::SerializationError { format: "json".to_string(), details: err.to_string() }
    }
}

impl From<SecpError> for RoundError {
    fn from(err: SecpError) -> Self {
        RoundError::CryptoError { operation: "secp256k1".to_string(), details: err.to_string() }
    }
}

#[macro_export]
macro_rules! storage_err {
    ($op:expr, $err:expr) => {
        $crate::foundation::RoundError::StorageError { operation: $op.into(), details: $err.to_string() }
    };
}

// NOTE: Avoid adding generic "stringly" error conversions here.
// Use structured `RoundError` variants at the call site to preserve context.
