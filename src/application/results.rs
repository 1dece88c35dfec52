//! Tally lifecycle: calculate, publish, read, and export weights.
use crate::application::RoundContext;
use crate::domain::tally::{export_weights, tally};
use crate::domain::{Actor, ApplicationState, ResultRow, Round, RoundPhase, TallyMethod};
use crate::foundation::{ApplicationId, Result, RoundError, RoundId, Timestamp};
use crate::infrastructure::audit::{audit, AuditEvent};
use log::info;
use std::collections::BTreeMap;

/// Tallies every ballot over the round's approved applications and replaces
/// the persisted result set atomically.
///
/// Repeatable: rerunning with the same ballots produces the same rows, and
/// each run replaces the previous set wholesale.
pub fn calculate_results(
    ctx: &RoundContext,
    now: Timestamp,
    actor: &Actor,
    round_id: &RoundId,
    method: TallyMethod,
) -> Result<Vec<ResultRow>> {
    require_admin(actor, "calculate_results")?;
    let round = load_round(ctx, round_id)?;
    let phase = round.schedule.phase_at(now);
    if phase != RoundPhase::PendingResults && phase != RoundPhase::Results {
        return Err(RoundError::PhaseClosed { operation: "calculate_results".to_string(), phase: phase.as_str().to_string() });
    }

    let approved: Vec<ApplicationId> = ctx
        .storage
        .list_applications(round_id)?
        .into_iter()
        .filter(|application| application.state == ApplicationState::Approved)
        .map(|application| application.id)
        .collect();
    let ballots = ctx.storage.list_ballots(round_id)?;

    let totals = tally(&approved, &ballots, method);
    let rows: Vec<ResultRow> = totals
        .into_iter()
        .map(|(application_id, allocation)| ResultRow { round_id: round_id.clone(), application_id, allocation, method })
        .collect();
    ctx.storage.replace_results(round_id, rows.clone())?;
    info!("results calculated round_id={} method={} rows={} ballots={}", round_id, method.as_str(), rows.len(), ballots.len());

    ctx.cache.invalidate(&format!("results:{}", round_id));
    audit(AuditEvent::ResultsCalculated {
        round_id: round_id.to_string(),
        method: method.as_str().to_string(),
        row_count: rows.len(),
        actor_user_id: actor.user_id.to_string(),
        timestamp_millis: now,
    });
    Ok(rows)
}

/// Flips the one-way published flag. Requires a prior calculation; never
/// recomputes.
pub fn publish_results(ctx: &RoundContext, actor: &Actor, round_id: &RoundId) -> Result<()> {
    require_admin(actor, "publish_results")?;
    load_round(ctx, round_id)?;
    ctx.storage.set_results_published(round_id)?;
    info!("results published round_id={} by={}", round_id, actor.user_id);

    ctx.cache.invalidate(&format!("results:{}", round_id));
    audit(AuditEvent::ResultsPublished {
        round_id: round_id.to_string(),
        actor_user_id: actor.user_id.to_string(),
        timestamp_millis: crate::foundation::now_millis(),
    });
    Ok(())
}

/// Reads the persisted rows. Non-admins only see them once the round is
/// published.
pub fn list_round_results(ctx: &RoundContext, actor: &Actor, round_id: &RoundId) -> Result<Vec<ResultRow>> {
    let round = load_round(ctx, round_id)?;
    if !actor.is_admin && !round.results_published {
        return Err(RoundError::ResultsNotPublished { round_id: round_id.to_string() });
    }
    ctx.storage.list_results(round_id)
}

/// Converts the persisted rows into integer weight shares per project
/// group. `group_of` maps application ids to their funding group; ids
/// without a group dilute the distribution but receive nothing.
pub fn export_round_weights(
    ctx: &RoundContext,
    actor: &Actor,
    round_id: &RoundId,
    group_of: &BTreeMap<ApplicationId, String>,
) -> Result<BTreeMap<String, u64>> {
    require_admin(actor, "export_weights")?;
    let round = load_round(ctx, round_id)?;
    if !round.results_calculated {
        return Err(RoundError::ResultsNotCalculated { round_id: round_id.to_string() });
    }

    let rows = ctx.storage.list_results(round_id)?;
    let total_votes = rows.iter().fold(0u64, |acc, row| acc.saturating_add(row.allocation));
    let results: BTreeMap<ApplicationId, u64> = rows.into_iter().map(|row| (row.application_id, row.allocation)).collect();
    export_weights(&results, group_of, total_votes)
}

fn require_admin(actor: &Actor, operation: &str) -> Result<()> {
    if !actor.is_admin {
        return Err(RoundError::NotAuthorized(format!("{} requires an admin", operation)));
    }
    Ok(())
}

fn load_round(ctx: &RoundContext, round_id: &RoundId) -> Result<Round> {
    ctx.storage.get_round(round_id)?.ok_or_else(|| RoundError::RoundNotFound(round_id.to_string()))
}
