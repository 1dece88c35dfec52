//! Ballot submission and replacement during the voting window.
use crate::application::RoundContext;
use crate::domain::ballot::{validate_allocations, verify_ballot_signature};
use crate::domain::{Actor, ApplicationState, Ballot, Round, RoundPhase};
use crate::foundation::{ApplicationId, Result, RoundError, RoundId, Timestamp};
use crate::infrastructure::audit::{audit, AuditEvent};
use log::info;
use std::collections::{BTreeMap, BTreeSet};

/// Payload for submit/patch ballot.
#[derive(Clone, Debug, Default)]
pub struct BallotParams {
    pub allocations: BTreeMap<ApplicationId, u64>,
    /// 65-byte recoverable signature over the canonical ballot digest,
    /// required only for delegated submissions.
    pub signature: Option<Vec<u8>>,
}

/// Creates the voter's ballot for a round. Strict create: the storage
/// uniqueness constraint on `(round, voter)` is the authority, so two
/// racing submissions cannot both land.
pub fn submit_ballot(ctx: &RoundContext, now: Timestamp, actor: &Actor, round_id: &RoundId, params: BallotParams) -> Result<Ballot> {
    let round = prepare_ballot_checks(ctx, now, actor, round_id, &params, "submit_ballot")?;

    let ballot = Ballot {
        round_id: round.id.clone(),
        voter_user_id: actor.user_id.clone(),
        voter_wallet: actor.wallet.clone(),
        allocations: params.allocations,
        created_at: now,
    };
    ctx.storage.insert_ballot(ballot.clone())?;
    info!("ballot submitted round_id={} voter={} projects={}", round_id, actor.user_id, ballot.allocations.len());

    ctx.cache.invalidate(&format!("ballots:{}", round_id));
    audit(AuditEvent::BallotSubmitted {
        round_id: round_id.to_string(),
        voter_user_id: actor.user_id.to_string(),
        allocation_count: ballot.allocations.len(),
        total_votes: total_votes(&ballot),
        timestamp_millis: now,
    });
    Ok(ballot)
}

/// Replaces the voter's prior ballot wholesale. There is no merge; the new
/// allocation map is revalidated exactly like a first submission.
pub fn patch_ballot(ctx: &RoundContext, now: Timestamp, actor: &Actor, round_id: &RoundId, params: BallotParams) -> Result<Ballot> {
    let round = prepare_ballot_checks(ctx, now, actor, round_id, &params, "patch_ballot")?;

    let ballot = Ballot {
        round_id: round.id.clone(),
        voter_user_id: actor.user_id.clone(),
        voter_wallet: actor.wallet.clone(),
        allocations: params.allocations,
        created_at: now,
    };
    ctx.storage.replace_ballot(ballot.clone())?;
    info!("ballot replaced round_id={} voter={} projects={}", round_id, actor.user_id, ballot.allocations.len());

    ctx.cache.invalidate(&format!("ballots:{}", round_id));
    audit(AuditEvent::BallotReplaced {
        round_id: round_id.to_string(),
        voter_user_id: actor.user_id.to_string(),
        allocation_count: ballot.allocations.len(),
        total_votes: total_votes(&ballot),
        timestamp_millis: now,
    });
    Ok(ballot)
}

/// Shared gate for both ballot paths: voting phase, allow-list, allocation
/// limits against approved applications, and the optional delegated
/// signature.
fn prepare_ballot_checks(
    ctx: &RoundContext,
    now: Timestamp,
    actor: &Actor,
    round_id: &RoundId,
    params: &BallotParams,
    operation: &str,
) -> Result<Round> {
    let round = ctx.storage.get_round(round_id)?.ok_or_else(|| RoundError::RoundNotFound(round_id.to_string()))?;

    let phase = round.schedule.phase_at(now);
    if phase != RoundPhase::Voting {
        return Err(RoundError::PhaseClosed { operation: operation.to_string(), phase: phase.as_str().to_string() });
    }

    let allowed = &round.voting_config.allowed_voter_ids;
    if !allowed.is_empty() && !allowed.contains(&actor.user_id) {
        return Err(RoundError::VoterNotAllowed { user_id: actor.user_id.to_string(), round_id: round_id.to_string() });
    }

    let approved: BTreeSet<ApplicationId> = ctx
        .storage
        .list_applications(round_id)?
        .into_iter()
        .filter(|application| application.state == ApplicationState::Approved)
        .map(|application| application.id)
        .collect();
    validate_allocations(&params.allocations, &round.voting_config, &approved)?;

    if let Some(signature) = &params.signature {
        verify_ballot_signature(&ctx.signing_scope, &params.allocations, signature, &actor.wallet)?;
    }
    Ok(round)
}

fn total_votes(ballot: &Ballot) -> u64 {
    ballot.allocations.values().fold(0u64, |acc, v| acc.saturating_add(*v))
}
