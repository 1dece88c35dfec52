//! Application intake: submission, edits, and admin review.
use crate::application::attestation::verify_application_proof;
use crate::application::RoundContext;
use crate::domain::form::validate_answer;
use crate::domain::{
    Actor, Application, ApplicationDraft, ApplicationState, ApplicationVersion, AttestationProof, Round, RoundPhase,
};
use crate::foundation::{ApplicationId, AttestationUid, Result, RoundError, RoundId, Timestamp, MAX_PROJECT_NAME_LENGTH};
use crate::infrastructure::audit::{audit, AuditEvent};
use log::info;

/// Submits a new application to a round.
///
/// Only open during `Intake`; admins may file outside the window (late
/// additions agreed out of band). When the round carries an attestation
/// setup the draft must include a proof, which is verified against the
/// ledger before anything is written.
pub async fn submit_application(
    ctx: &RoundContext,
    now: Timestamp,
    actor: &Actor,
    round_id: &RoundId,
    draft: ApplicationDraft,
) -> Result<Application> {
    let round = load_round(ctx, round_id)?;
    ensure_intake_open(&round, now, actor, "submit_application")?;
    validate_draft_answers(&round, &draft)?;

    let resolved_uid = verify_required_proof(ctx, &round, &actor.wallet, &draft).await?;
    let (proof, promoted_uid) = settle_proof(draft.proof, resolved_uid);

    let application_id = derive_application_id(round_id, actor, now);
    let version = ApplicationVersion {
        project_name: draft.project_name,
        account_id: draft.account_id,
        category_id: draft.category_id,
        answers: draft.answers,
        proof,
        created_at: now,
    };
    let application = Application {
        id: application_id.clone(),
        round_id: round_id.clone(),
        submitter_user_id: actor.user_id.clone(),
        submitter_wallet: actor.wallet.clone(),
        state: ApplicationState::Pending,
        versions: vec![version],
    };
    ctx.storage.insert_application(application.clone())?;
    info!("application submitted round_id={} application_id={} submitter={}", round_id, application_id, actor.user_id);

    audit_promotion(round_id, &application_id, promoted_uid, now);
    ctx.cache.invalidate(&format!("applications:{}", round_id));
    audit(AuditEvent::ApplicationSubmitted {
        round_id: round_id.to_string(),
        application_id: application_id.to_string(),
        submitter_user_id: actor.user_id.to_string(),
        attested: resolved_uid.is_some(),
        timestamp_millis: now,
    });
    ctx.storage.get_application(&application_id)?.ok_or_else(|| RoundError::ApplicationNotFound(application_id.to_string()))
}

/// Appends a new version to an existing application.
///
/// Submitter or admin only. The review state resets to `Pending` atomically
/// with the append, so an edited application always goes back through
/// review.
pub async fn update_application(
    ctx: &RoundContext,
    now: Timestamp,
    actor: &Actor,
    application_id: &ApplicationId,
    draft: ApplicationDraft,
) -> Result<Application> {
    let application = load_application(ctx, application_id)?;
    if application.submitter_user_id != actor.user_id && !actor.is_admin {
        return Err(RoundError::NotAuthorized(format!("user {} may not edit application {}", actor.user_id, application_id)));
    }
    let round = load_round(ctx, &application.round_id)?;
    ensure_intake_open(&round, now, actor, "update_application")?;
    validate_draft_answers(&round, &draft)?;

    // Attestations are bound to the original submitter's wallet, even when
    // an admin performs the edit.
    let resolved_uid = verify_required_proof(ctx, &round, &application.submitter_wallet, &draft).await?;
    let (proof, promoted_uid) = settle_proof(draft.proof, resolved_uid);

    let version = ApplicationVersion {
        project_name: draft.project_name,
        account_id: draft.account_id,
        category_id: draft.category_id,
        answers: draft.answers,
        proof,
        created_at: now,
    };
    ctx.storage.append_version(application_id, version)?;
    info!("application updated round_id={} application_id={} editor={}", round.id, application_id, actor.user_id);

    audit_promotion(&round.id, application_id, promoted_uid, now);
    let updated = load_application(ctx, application_id)?;
    ctx.cache.invalidate(&format!("applications:{}", round.id));
    audit(AuditEvent::ApplicationUpdated {
        round_id: round.id.to_string(),
        application_id: application_id.to_string(),
        submitter_user_id: application.submitter_user_id.to_string(),
        version_count: updated.versions.len(),
        timestamp_millis: now,
    });
    Ok(updated)
}

/// Records an admin review decision for an application.
pub fn review_application(
    ctx: &RoundContext,
    now: Timestamp,
    actor: &Actor,
    application_id: &ApplicationId,
    decision: ApplicationState,
) -> Result<()> {
    if !actor.is_admin {
        return Err(RoundError::NotAuthorized("review requires an admin".to_string()));
    }
    if decision == ApplicationState::Pending {
        return Err(RoundError::Message("review decision must be approved or rejected".to_string()));
    }
    let application = load_application(ctx, application_id)?;
    ctx.storage.set_application_state(application_id, decision)?;
    info!("application reviewed application_id={} decision={:?} reviewer={}", application_id, decision, actor.user_id);

    ctx.cache.invalidate(&format!("applications:{}", application.round_id));
    audit(AuditEvent::ApplicationReviewed {
        round_id: application.round_id.to_string(),
        application_id: application_id.to_string(),
        reviewer_user_id: actor.user_id.to_string(),
        state: decision,
        timestamp_millis: now,
    });
    Ok(())
}

fn load_round(ctx: &RoundContext, round_id: &RoundId) -> Result<Round> {
    ctx.storage.get_round(round_id)?.ok_or_else(|| RoundError::RoundNotFound(round_id.to_string()))
}

fn load_application(ctx: &RoundContext, application_id: &ApplicationId) -> Result<Application> {
    ctx.storage.get_application(application_id)?.ok_or_else(|| RoundError::ApplicationNotFound(application_id.to_string()))
}

fn ensure_intake_open(round: &Round, now: Timestamp, actor: &Actor, operation: &str) -> Result<()> {
    let phase = round.schedule.phase_at(now);
    if phase != RoundPhase::Intake && !actor.is_admin {
        return Err(RoundError::PhaseClosed { operation: operation.to_string(), phase: phase.as_str().to_string() });
    }
    Ok(())
}

fn validate_draft_answers(round: &Round, draft: &ApplicationDraft) -> Result<()> {
    if draft.project_name.len() > MAX_PROJECT_NAME_LENGTH {
        return Err(RoundError::InvalidAnswer {
            field_id: "project_name".to_string(),
            details: format!("exceeds {} bytes", MAX_PROJECT_NAME_LENGTH),
        });
    }
    for (field_id, value) in &draft.answers {
        let field = round
            .form
            .field(field_id)
            .ok_or_else(|| RoundError::InvalidAnswer { field_id: field_id.clone(), details: "unknown field".to_string() })?;
        validate_answer(field, value)?;
    }
    Ok(())
}

/// Runs attestation verification when the round mandates it. Returns the
/// resolved uid, or `None` when the round has no attestation setup.
async fn verify_required_proof(
    ctx: &RoundContext,
    round: &Round,
    submitter_wallet: &crate::foundation::WalletAddress,
    draft: &ApplicationDraft,
) -> Result<Option<AttestationUid>> {
    let setup = match &round.attestation_setup {
        Some(setup) => setup,
        None => return Ok(None),
    };
    let proof = draft.proof.as_ref().ok_or_else(|| RoundError::AttestationRequired { round_id: round.id.to_string() })?;
    let uid = verify_application_proof(ctx, round, setup, submitter_wallet, draft, proof).await?;
    Ok(Some(uid))
}

/// Folds a verified deferred proof into its attested form before the
/// version is written. The uid came out of the confirmed receipt during
/// verification, so the single storage insert carries the final state and
/// no unresolved proof is ever visible. Returns the promoted uid for the
/// audit trail.
fn settle_proof(
    submitted: Option<AttestationProof>,
    resolved_uid: Option<AttestationUid>,
) -> (Option<AttestationProof>, Option<AttestationUid>) {
    match (submitted, resolved_uid) {
        (Some(AttestationProof::Deferred(_)), Some(uid)) => (Some(AttestationProof::Attested(uid)), Some(uid)),
        (other, _) => (other, None),
    }
}

fn audit_promotion(round_id: &RoundId, application_id: &ApplicationId, promoted_uid: Option<AttestationUid>, now: Timestamp) {
    if let Some(uid) = promoted_uid {
        audit(AuditEvent::DeferredProofResolved {
            round_id: round_id.to_string(),
            application_id: application_id.to_string(),
            attestation_uid: uid.to_string(),
            timestamp_millis: now,
        });
    }
}

/// Ids are content-derived so resubmission retries land on the same key
/// instead of minting duplicates.
fn derive_application_id(round_id: &RoundId, actor: &Actor, now: Timestamp) -> ApplicationId {
    let mut hasher = blake3::Hasher::new();
    hasher.update(round_id.as_str().as_bytes());
    hasher.update(actor.user_id.as_str().as_bytes());
    hasher.update(&now.to_be_bytes());
    ApplicationId::from(hex::encode(&hasher.finalize().as_bytes()[..16]))
}
