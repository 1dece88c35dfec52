//! Results tallying: per-application aggregation and weight export.

pub mod weights;

pub use weights::export_weights;

use crate::domain::model::{Ballot, TallyMethod};
use crate::foundation::ApplicationId;
use std::collections::BTreeMap;

/// Rounds to the nearest integer, halves away from zero.
///
/// Both `Average` and `Median` use this; keeping one rounding rule here
/// means downstream weight exports cannot drift between methods.
fn round_nearest(value: f64) -> u64 {
    value.round() as u64
}

fn reduce(values: &mut Vec<u64>, method: TallyMethod) -> u64 {
    match method {
        TallyMethod::Sum => values.iter().sum(),
        TallyMethod::Average => {
            if values.is_empty() {
                return 0;
            }
            let total: u64 = values.iter().sum();
            round_nearest(total as f64 / values.len() as f64)
        }
        TallyMethod::Median => {
            if values.is_empty() {
                return 0;
            }
            values.sort_unstable();
            let mid = values.len() / 2;
            if values.len() % 2 == 1 {
                values[mid]
            } else {
                round_nearest((values[mid - 1] + values[mid]) as f64 / 2.0)
            }
        }
    }
}

/// Aggregates every ballot's allocation per application.
///
/// Ballots that skip an application contribute 0 to it, so `Average` and
/// `Median` are over the full ballot count, not just the voters who chose
/// the application. Output is invariant under permutation of `ballots`.
pub fn tally(
    application_ids: &[ApplicationId],
    ballots: &[Ballot],
    method: TallyMethod,
) -> BTreeMap<ApplicationId, u64> {
    let mut results = BTreeMap::new();
    for application_id in application_ids {
        let mut values: Vec<u64> =
            ballots.iter().map(|ballot| ballot.allocations.get(application_id).copied().unwrap_or(0)).collect();
        results.insert(application_id.clone(), reduce(&mut values, method));
    }
    results
}
