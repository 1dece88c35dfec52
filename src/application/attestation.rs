//! Ledger-side verification of application attestation proofs.
use crate::application::RoundContext;
use crate::domain::attestation::{check_declared_payload, AttestationData, DeclaredApplication};
use crate::domain::{ApplicationDraft, AttestationProof, AttestationSetup, Round};
use crate::foundation::util::encoding::parse_hex_32bytes;
use crate::foundation::{
    AttestationUid, Result, RoundError, TxHash, WalletAddress, ATTESTED_EVENT_SIGNATURE,
};
use crate::infrastructure::ledger::{poll_until, ReceiptLog};
use log::{debug, info};

/// Verifies `proof` against the ledger before anything is persisted.
///
/// Returns the attestation uid on success. For a deferred proof the uid is
/// extracted from the confirmed transaction's Attested event, so the caller
/// can promote the stored proof once the version is committed.
pub async fn verify_application_proof(
    ctx: &RoundContext,
    round: &Round,
    setup: &AttestationSetup,
    submitter_wallet: &WalletAddress,
    draft: &ApplicationDraft,
    proof: &AttestationProof,
) -> Result<AttestationUid> {
    match proof {
        AttestationProof::Attested(uid) => verify_attested(ctx, round, setup, submitter_wallet, draft, *uid).await,
        AttestationProof::Deferred(tx_hash) => verify_deferred(ctx, round, setup, submitter_wallet, draft, *tx_hash).await,
    }
}

/// Immediate mode: the attestation already exists on the ledger, so the
/// declared payload is fetched by content hash and compared field by field
/// against what the submitter sent us.
async fn verify_attested(
    ctx: &RoundContext,
    round: &Round,
    setup: &AttestationSetup,
    submitter_wallet: &WalletAddress,
    draft: &ApplicationDraft,
    uid: AttestationUid,
) -> Result<AttestationUid> {
    let record = poll_until("get_attestation", ctx.poll, || ctx.ledger.get_attestation(&uid))
        .await?
        .ok_or_else(|| RoundError::AttestationNotFound { uid: uid.to_string(), waited_secs: ctx.poll.timeout.as_secs() })?;

    if &record.attester != submitter_wallet {
        return Err(RoundError::AttestationSubmitterMismatch {
            expected: submitter_wallet.to_string(),
            actual: record.attester.to_string(),
        });
    }
    if record.schema_id != setup.application_schema_id {
        return Err(RoundError::AttestationPayloadInvalid {
            details: format!("schema {} does not match the round's application schema", record.schema_id),
        });
    }

    let data = AttestationData::decode(&record.data)?;
    if data.round_id != round.id {
        return Err(RoundError::AttestationPayloadInvalid {
            details: format!("attestation targets round {} not {}", data.round_id, round.id),
        });
    }

    let pointer = parse_hex_32bytes(&data.content_hash)
        .map_err(|_| RoundError::AttestationPayloadInvalid { details: format!("malformed content hash {}", data.content_hash) })?;
    let bytes = ctx
        .content
        .get_by_hash(&pointer)
        .await?
        .ok_or_else(|| RoundError::ContentUnavailable { pointer: data.content_hash.clone(), details: "not found".to_string() })?;
    let declared = DeclaredApplication::decode(&bytes)?;

    check_declared_payload(&round.form, &draft.project_name, &draft.account_id, &draft.answers, &declared)?;
    info!("attestation verified round_id={} uid={}", round.id, uid);
    Ok(uid)
}

/// Deferred mode: the attestation is still being minted, so only the
/// transaction hash is known. The confirmed receipt must carry an Attested
/// event from the round's contract; the declared payload is reconstructed
/// from the submitted answers, which makes the field walk an internal
/// consistency check (notably that no private value leaks into it).
async fn verify_deferred(
    ctx: &RoundContext,
    round: &Round,
    setup: &AttestationSetup,
    submitter_wallet: &WalletAddress,
    draft: &ApplicationDraft,
    tx_hash: TxHash,
) -> Result<AttestationUid> {
    let receipt = poll_until("get_transaction_receipt", ctx.poll, || ctx.ledger.get_transaction_receipt(&tx_hash))
        .await?
        .ok_or_else(|| RoundError::TransactionNotFound { tx_hash: tx_hash.to_string(), waited_secs: ctx.poll.timeout.as_secs() })?;
    if !receipt.success {
        return Err(RoundError::AttestationEventNotFound { tx_hash: tx_hash.to_string() });
    }

    let attested_topic = parse_hex_32bytes(ATTESTED_EVENT_SIGNATURE)?;
    let (uid, attester) = receipt
        .logs
        .iter()
        .find_map(|log| extract_attested_event(log, setup, &attested_topic))
        .ok_or_else(|| RoundError::AttestationEventNotFound { tx_hash: tx_hash.to_string() })?;

    if &attester != submitter_wallet {
        return Err(RoundError::AttestationSubmitterMismatch {
            expected: submitter_wallet.to_string(),
            actual: attester.to_string(),
        });
    }

    // No on-ledger payload exists yet; check the submitted answers against
    // themselves minus private fields.
    let declared = DeclaredApplication {
        project_name: draft.project_name.clone(),
        account_id: draft.account_id.clone(),
        answers: draft
            .answers
            .iter()
            .filter(|(field_id, _)| round.form.field(field_id).map(|f| !f.private).unwrap_or(false))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect(),
    };
    check_declared_payload(&round.form, &draft.project_name, &draft.account_id, &draft.answers, &declared)?;

    debug!("deferred attestation resolved round_id={} tx_hash={} uid={}", round.id, tx_hash, uid);
    Ok(uid)
}

/// Matches one receipt log against the round's Attested event layout:
/// `topics[0]` = event signature, `topics[1]` = attester (padded),
/// `topics[3]` = schema uid, `data[0..32]` = new attestation uid.
fn extract_attested_event(
    log: &ReceiptLog,
    setup: &AttestationSetup,
    attested_topic: &crate::foundation::Hash32,
) -> Option<(AttestationUid, WalletAddress)> {
    if log.address != setup.contract_address {
        return None;
    }
    if log.topics.len() < 4 || &log.topics[0] != attested_topic {
        return None;
    }
    if &log.topics[3] != setup.application_schema_id.as_hash() {
        return None;
    }
    if log.data.len() < 32 {
        return None;
    }
    let mut uid = [0u8; 32];
    uid.copy_from_slice(&log.data[..32]);
    Some((AttestationUid::new(uid), WalletAddress::from_topic_word(&log.topics[1])))
}
