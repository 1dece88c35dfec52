use crate::foundation::{ApplicationId, RoundError, WEIGHT_PRECISION_SCALE};
use std::collections::BTreeMap;

/// Converts persisted result allocations into integer shares of
/// `WEIGHT_PRECISION_SCALE` per project group.
///
/// Several applications may map to the same group (one project, many
/// applications); their rounded weights are summed per group. Independent
/// rounding rarely lands on the scale exactly, so the remainder is settled
/// `±1` per group in descending-weight order, cycling until zero.
/// Applications absent from `group_of` contribute to `total_votes`
/// upstream but receive no weight.
pub fn export_weights(
    results: &BTreeMap<ApplicationId, u64>,
    group_of: &BTreeMap<ApplicationId, String>,
    total_votes: u64,
) -> Result<BTreeMap<String, u64>, RoundError> {
    if total_votes == 0 {
        return Err(RoundError::NoVotesAllocated);
    }

    let mut weights: BTreeMap<String, u64> = BTreeMap::new();
    for (application_id, allocation) in results {
        let group = match group_of.get(application_id) {
            Some(group) => group,
            None => continue,
        };
        let weight = ((*allocation as f64 / total_votes as f64) * WEIGHT_PRECISION_SCALE as f64).round() as u64;
        *weights.entry(group.clone()).or_insert(0) += weight;
    }

    if weights.is_empty() {
        return Ok(weights);
    }

    let assigned: u64 = weights.values().sum();
    let mut remainder: i64 = WEIGHT_PRECISION_SCALE as i64 - assigned as i64;

    // Descending weight, group key as deterministic tie-break.
    let mut order: Vec<String> = weights.keys().cloned().collect();
    order.sort_by(|a, b| weights[b].cmp(&weights[a]).then_with(|| a.cmp(b)));

    while remainder != 0 {
        let mut moved = false;
        for group in &order {
            if remainder == 0 {
                break;
            }
            let weight = match weights.get_mut(group) {
                Some(weight) => weight,
                None => continue,
            };
            if remainder > 0 {
                *weight += 1;
                remainder -= 1;
                moved = true;
            } else if *weight > 0 {
                *weight -= 1;
                remainder += 1;
                moved = true;
            }
        }
        if !moved {
            // Every weight is already zero and the remainder is negative;
            // cannot happen while weights are computed from the same scale.
            return Err(RoundError::Message("weight remainder cannot be settled".to_string()));
        }
    }

    Ok(weights)
}
