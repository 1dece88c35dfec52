use crate::domain::model::VotingConfig;
use crate::foundation::{ApplicationId, RoundError};
use std::collections::{BTreeMap, BTreeSet};

/// Validates an allocation map against the round's budget limits and the
/// set of approved application ids.
///
/// Checks run in a fixed order so callers see the most actionable failure
/// first: unknown references, then per-project limits, then the total.
pub fn validate_allocations(
    allocations: &BTreeMap<ApplicationId, u64>,
    config: &VotingConfig,
    approved_ids: &BTreeSet<ApplicationId>,
) -> Result<(), RoundError> {
    let unknown: Vec<String> =
        allocations.keys().filter(|id| !approved_ids.contains(*id)).map(|id| id.to_string()).collect();
    if !unknown.is_empty() {
        return Err(RoundError::InvalidApplicationReference { ids: unknown });
    }

    for (application_id, allocation) in allocations {
        if *allocation > config.max_votes_per_project_per_voter {
            return Err(RoundError::PerProjectLimitExceeded {
                application_id: application_id.to_string(),
                allocation: *allocation,
                max: config.max_votes_per_project_per_voter,
            });
        }
    }

    let total: u64 = allocations.values().fold(0u64, |acc, v| acc.saturating_add(*v));
    if total > config.max_votes_per_voter {
        return Err(RoundError::BudgetExceeded { total, max: config.max_votes_per_voter });
    }

    Ok(())
}
