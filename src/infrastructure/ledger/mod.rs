//! Read-only ledger client: attestation records and transaction receipts.

pub mod mock;
pub mod poll;

pub use mock::MockLedger;
pub use poll::{poll_until, PollConfig};

use crate::foundation::{AttestationUid, Hash32, SchemaId, TxHash, WalletAddress};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// An attestation as read from the ledger.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AttestationRecord {
    pub uid: AttestationUid,
    pub schema_id: SchemaId,
    /// Wallet that signed the attestation.
    pub attester: WalletAddress,
    /// Structured payload; decodes to `domain::attestation::AttestationData`.
    pub data: Vec<u8>,
}

/// One event emitted during a transaction.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ReceiptLog {
    /// Emitting contract.
    pub address: WalletAddress,
    /// `topics[0]` is the event signature; indexed parameters follow.
    pub topics: Vec<Hash32>,
    /// Non-indexed payload; the first 32 bytes carry the new attestation uid
    /// for an Attested event.
    pub data: Vec<u8>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TransactionReceipt {
    pub tx_hash: TxHash,
    pub success: bool,
    pub logs: Vec<ReceiptLog>,
}

/// Best-effort chain read endpoint. Both lookups are idempotent and safe to
/// poll; `Ok(None)` means "not (yet) visible", errors mean the endpoint
/// itself failed.
#[async_trait]
pub trait LedgerClient: Send + Sync {
    async fn get_attestation(&self, uid: &AttestationUid) -> crate::foundation::Result<Option<AttestationRecord>>;
    async fn get_transaction_receipt(&self, tx_hash: &TxHash) -> crate::foundation::Result<Option<TransactionReceipt>>;
}
