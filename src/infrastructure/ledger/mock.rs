use crate::foundation::{AttestationUid, Result, TxHash};
use crate::infrastructure::ledger::{AttestationRecord, LedgerClient, TransactionReceipt};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Scriptable in-process ledger for tests and local runs.
///
/// `miss_before_found` makes the first N lookups of any key report
/// not-found, which exercises the polling path deterministically.
#[derive(Default)]
pub struct MockLedger {
    attestations: Mutex<HashMap<AttestationUid, AttestationRecord>>,
    receipts: Mutex<HashMap<TxHash, TransactionReceipt>>,
    miss_before_found: AtomicUsize,
    lookups: AtomicUsize,
}

impl MockLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_attestation(&self, record: AttestationRecord) {
        if let Ok(mut attestations) = self.attestations.lock() {
            attestations.insert(record.uid, record);
        }
    }

    pub fn insert_receipt(&self, receipt: TransactionReceipt) {
        if let Ok(mut receipts) = self.receipts.lock() {
            receipts.insert(receipt.tx_hash, receipt);
        }
    }

    pub fn miss_before_found(&self, misses: usize) {
        self.miss_before_found.store(misses, Ordering::SeqCst);
    }

    pub fn lookup_count(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }

    fn should_miss(&self) -> bool {
        self.lookups.fetch_add(1, Ordering::SeqCst) < self.miss_before_found.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LedgerClient for MockLedger {
    async fn get_attestation(&self, uid: &AttestationUid) -> Result<Option<AttestationRecord>> {
        if self.should_miss() {
            return Ok(None);
        }
        Ok(self.attestations.lock().ok().and_then(|a| a.get(uid).cloned()))
    }

    async fn get_transaction_receipt(&self, tx_hash: &TxHash) -> Result<Option<TransactionReceipt>> {
        if self.should_miss() {
            return Ok(None);
        }
        Ok(self.receipts.lock().ok().and_then(|r| r.get(tx_hash).cloned()))
    }
}
