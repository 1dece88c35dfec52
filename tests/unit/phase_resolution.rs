use crate::fixtures::*;
use rounds_core::domain::{RoundPhase, RoundSchedule};

fn schedule() -> RoundSchedule {
    RoundSchedule {
        application_start: APP_START,
        application_end: APP_END,
        voting_start: VOTING_START,
        voting_end: VOTING_END,
        results_start: RESULTS_START,
    }
}

#[test]
fn test_resolver_is_total_over_the_whole_timeline() {
    let s = schedule();
    assert_eq!(s.phase_at(0), RoundPhase::PendingIntake);
    assert_eq!(s.phase_at(APP_START), RoundPhase::Intake);
    assert_eq!(s.phase_at(IN_INTAKE), RoundPhase::Intake);
    assert_eq!(s.phase_at(APP_END), RoundPhase::PendingVoting);
    assert_eq!(s.phase_at(IN_PENDING_VOTING), RoundPhase::PendingVoting);
    assert_eq!(s.phase_at(VOTING_START), RoundPhase::Voting);
    assert_eq!(s.phase_at(IN_VOTING), RoundPhase::Voting);
    assert_eq!(s.phase_at(VOTING_END), RoundPhase::PendingResults);
    assert_eq!(s.phase_at(IN_PENDING_RESULTS), RoundPhase::PendingResults);
    assert_eq!(s.phase_at(RESULTS_START), RoundPhase::Results);
    assert_eq!(s.phase_at(u64::MAX), RoundPhase::Results);
}

#[test]
fn test_resolver_is_monotone_in_time() {
    let s = schedule();
    let mut previous = s.phase_at(0);
    for now in (0..6_000_000u64).step_by(100_000) {
        let phase = s.phase_at(now);
        assert!(phase >= previous, "phase regressed at now={}", now);
        previous = phase;
    }
}

#[test]
fn test_between_application_end_and_voting_start_is_pending_voting() {
    // Scenario: an instant strictly inside the gap between the intake and
    // voting windows must never resolve to either open phase.
    let phase = schedule().phase_at(IN_PENDING_VOTING);
    assert_eq!(phase, RoundPhase::PendingVoting);
    assert_eq!(phase.as_str(), "pending-voting");
}

#[test]
fn test_zero_width_windows_collapse() {
    let s = RoundSchedule {
        application_start: 100,
        application_end: 100,
        voting_start: 100,
        voting_end: 200,
        results_start: 200,
    };
    assert!(s.validate().is_ok());
    // Intake never opens; 100 lands directly in voting.
    assert_eq!(s.phase_at(100), RoundPhase::Voting);
    assert_eq!(s.phase_at(200), RoundPhase::Results);
}
