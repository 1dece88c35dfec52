use crate::foundation::{
    ApplicationId, Hash32, RoundError, WalletAddress, BALLOT_SIGNING_DOMAIN, BALLOT_SIGNING_VERSION,
    RECOVERABLE_SIGNATURE_SIZE,
};
use blake3::Hasher;
use secp256k1::ecdsa::{RecoverableSignature, RecoveryId};
use secp256k1::{Message, Secp256k1, SecretKey};
use std::collections::BTreeMap;

/// Scope binding a ballot signature to one deployment and chain.
///
/// Signing the counts plus the allocation hash keeps the signed payload
/// small while still binding the signature to the exact ballot content.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BallotSigningScope {
    pub domain_name: String,
    pub version: String,
    pub chain_id: u64,
}

impl Default for BallotSigningScope {
    fn default() -> Self {
        Self { domain_name: BALLOT_SIGNING_DOMAIN.to_string(), version: BALLOT_SIGNING_VERSION.to_string(), chain_id: 1 }
    }
}

/// Canonical allocation hash: keys sorted ascending (`BTreeMap` order),
/// one `id:allocation` line per entry.
pub fn hash_allocations(allocations: &BTreeMap<ApplicationId, u64>) -> Hash32 {
    let mut hasher = Hasher::new();
    for (application_id, allocation) in allocations {
        hasher.update(application_id.as_str().as_bytes());
        hasher.update(b":");
        hasher.update(&allocation.to_be_bytes());
        hasher.update(b"\n");
    }
    *hasher.finalize().as_bytes()
}

/// Digest the voter signs: scope triple, total votes, distinct project
/// count and the canonical allocation hash, length-prefix separated.
pub fn ballot_signing_digest(scope: &BallotSigningScope, allocations: &BTreeMap<ApplicationId, u64>) -> Hash32 {
    let total_votes: u64 = allocations.values().fold(0u64, |acc, v| acc.saturating_add(*v));
    let project_count = allocations.len() as u64;
    let hashed_votes = hash_allocations(allocations);

    let mut hasher = Hasher::new();
    hasher.update(&(scope.domain_name.len() as u64).to_be_bytes());
    hasher.update(scope.domain_name.as_bytes());
    hasher.update(&(scope.version.len() as u64).to_be_bytes());
    hasher.update(scope.version.as_bytes());
    hasher.update(&scope.chain_id.to_be_bytes());
    hasher.update(&total_votes.to_be_bytes());
    hasher.update(&project_count.to_be_bytes());
    hasher.update(&hashed_votes);
    *hasher.finalize().as_bytes()
}

/// Verifies a delegated 65-byte recoverable signature over a ballot.
///
/// The recovered signer's wallet must equal `expected_wallet`
/// (case-insensitive); any parse or recovery failure maps to
/// `InvalidSignature` rather than leaking crypto internals.
pub fn verify_ballot_signature(
    scope: &BallotSigningScope,
    allocations: &BTreeMap<ApplicationId, u64>,
    signature: &[u8],
    expected_wallet: &WalletAddress,
) -> Result<(), RoundError> {
    if signature.len() != RECOVERABLE_SIGNATURE_SIZE {
        return Err(RoundError::InvalidSignature);
    }

    // Accept both raw (0/1) and offset (27/28) recovery ids, as wallets emit either.
    let rec_id_raw = signature[64];
    let rec_id = match rec_id_raw {
        27 | 28 => rec_id_raw - 27,
        0 | 1 => rec_id_raw,
        _ => return Err(RoundError::InvalidSignature),
    };
    let rid = RecoveryId::from_i32(rec_id as i32).map_err(|_| RoundError::InvalidSignature)?;
    let rec_sig = RecoverableSignature::from_compact(&signature[0..64], rid).map_err(|_| RoundError::InvalidSignature)?;

    let digest = ballot_signing_digest(scope, allocations);
    let msg = Message::from_digest_slice(&digest).map_err(|_| RoundError::InvalidSignature)?;

    let secp = Secp256k1::verification_only();
    let recovered = secp.recover_ecdsa(&msg, &rec_sig).map_err(|_| RoundError::InvalidSignature)?;
    let recovered_wallet = WalletAddress::from_public_key(&recovered);
    if &recovered_wallet != expected_wallet {
        return Err(RoundError::InvalidSignature);
    }
    Ok(())
}

/// Produces the 65-byte recoverable signature a delegated signer submits.
pub fn sign_ballot(
    scope: &BallotSigningScope,
    allocations: &BTreeMap<ApplicationId, u64>,
    secret_key: &SecretKey,
) -> Result<Vec<u8>, RoundError> {
    let digest = ballot_signing_digest(scope, allocations);
    let msg = Message::from_digest_slice(&digest)?;
    let secp = Secp256k1::signing_only();
    let (rid, compact) = secp.sign_ecdsa_recoverable(&msg, secret_key).serialize_compact();
    let mut out = Vec::with_capacity(RECOVERABLE_SIGNATURE_SIZE);
    out.extend_from_slice(&compact);
    out.push(rid.to_i32() as u8);
    Ok(out)
}
