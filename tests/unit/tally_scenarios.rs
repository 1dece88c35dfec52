use rounds_core::domain::tally::{export_weights, tally};
use rounds_core::domain::{Ballot, TallyMethod};
use rounds_core::foundation::{ApplicationId, UserId, WalletAddress, WEIGHT_PRECISION_SCALE};
use std::collections::BTreeMap;

fn ballot(voter: &str, entries: &[(&str, u64)]) -> Ballot {
    Ballot {
        round_id: "round-1".into(),
        voter_user_id: UserId::from(voter),
        voter_wallet: WalletAddress::default(),
        allocations: entries.iter().map(|(id, votes)| (ApplicationId::from(*id), *votes)).collect(),
        created_at: 0,
    }
}

fn apps(ids: &[&str]) -> Vec<ApplicationId> {
    ids.iter().map(|id| ApplicationId::from(*id)).collect()
}

// Three ballots {A:10}, {A:5,B:3}, {B:7}: sum {A:15,B:10}, avg {A:5,B:3}.
#[test]
fn test_three_ballot_round_sums_and_averages() {
    let ballots = vec![ballot("v1", &[("A", 10)]), ballot("v2", &[("A", 5), ("B", 3)]), ballot("v3", &[("B", 7)])];
    let ids = apps(&["A", "B"]);

    let sums = tally(&ids, &ballots, TallyMethod::Sum);
    assert_eq!(sums.get(&ApplicationId::from("A")), Some(&15));
    assert_eq!(sums.get(&ApplicationId::from("B")), Some(&10));

    let averages = tally(&ids, &ballots, TallyMethod::Average);
    assert_eq!(averages.get(&ApplicationId::from("A")), Some(&5));
    assert_eq!(averages.get(&ApplicationId::from("B")), Some(&3));
}

#[test]
fn test_tally_is_invariant_under_ballot_order() {
    let mut ballots = vec![ballot("v1", &[("A", 10)]), ballot("v2", &[("A", 5), ("B", 3)]), ballot("v3", &[("B", 7)])];
    let ids = apps(&["A", "B"]);
    let expected = tally(&ids, &ballots, TallyMethod::Median);
    ballots.rotate_left(1);
    assert_eq!(tally(&ids, &ballots, TallyMethod::Median), expected);
}

// Two equal groups with a third untallied share: independent rounding lands
// short of the scale and the remainder distribution must close the gap.
#[test]
fn test_weights_sum_to_the_scale_despite_an_untallied_share() {
    let results: BTreeMap<ApplicationId, u64> =
        [(ApplicationId::from("A"), 1), (ApplicationId::from("B"), 1), (ApplicationId::from("C"), 1)].into();
    let group_of: BTreeMap<ApplicationId, String> =
        [(ApplicationId::from("A"), "group-a".to_string()), (ApplicationId::from("B"), "group-b".to_string())].into();

    let weights = export_weights(&results, &group_of, 3).expect("weights");
    assert_eq!(weights.len(), 2);
    assert_eq!(weights.values().sum::<u64>(), WEIGHT_PRECISION_SCALE);
}

#[test]
fn test_weight_sums_are_exact_across_distributions() {
    let cases: &[&[(&str, u64)]] = &[
        &[("A", 700_000), ("B", 300_000)],
        &[("A", 1), ("B", 1), ("C", 1)],
        &[("A", 999), ("B", 1)],
        &[("A", 33), ("B", 33), ("C", 33), ("D", 1)],
    ];
    for case in cases {
        let results: BTreeMap<ApplicationId, u64> =
            case.iter().map(|(id, votes)| (ApplicationId::from(*id), *votes)).collect();
        let group_of: BTreeMap<ApplicationId, String> =
            case.iter().map(|(id, _)| (ApplicationId::from(*id), format!("group-{}", id))).collect();
        let total: u64 = case.iter().map(|(_, votes)| votes).sum();

        let weights = export_weights(&results, &group_of, total).expect("weights");
        assert_eq!(weights.values().sum::<u64>(), WEIGHT_PRECISION_SCALE, "case {:?}", case);
    }
}

#[test]
fn test_zero_total_votes_is_an_error() {
    let results: BTreeMap<ApplicationId, u64> = [(ApplicationId::from("A"), 0)].into();
    let group_of: BTreeMap<ApplicationId, String> = [(ApplicationId::from("A"), "group-a".to_string())].into();
    assert!(export_weights(&results, &group_of, 0).is_err());
}
