use crate::foundation::{RoundError, Timestamp};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The five ordered boundaries of a round.
///
/// Creation and update validate the non-decreasing order; `phase_at` assumes
/// a valid schedule and never re-checks it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundSchedule {
    pub application_start: Timestamp,
    pub application_end: Timestamp,
    pub voting_start: Timestamp,
    pub voting_end: Timestamp,
    pub results_start: Timestamp,
}

impl RoundSchedule {
    pub fn validate(&self) -> Result<(), RoundError> {
        let boundaries = [
            ("application_start", self.application_start),
            ("application_end", self.application_end),
            ("voting_start", self.voting_start),
            ("voting_end", self.voting_end),
            ("results_start", self.results_start),
        ];
        for pair in boundaries.windows(2) {
            let (earlier_name, earlier) = pair[0];
            let (later_name, later) = pair[1];
            if later < earlier {
                return Err(RoundError::ScheduleOutOfOrder {
                    earlier: earlier_name.to_string(),
                    later: later_name.to_string(),
                });
            }
        }
        Ok(())
    }

    /// Resolves the phase at `now`: the first boundary not yet passed wins.
    pub fn phase_at(&self, now: Timestamp) -> RoundPhase {
        if now < self.application_start {
            RoundPhase::PendingIntake
        } else if now < self.application_end {
            RoundPhase::Intake
        } else if now < self.voting_start {
            RoundPhase::PendingVoting
        } else if now < self.voting_end {
            RoundPhase::Voting
        } else if now < self.results_start {
            RoundPhase::PendingResults
        } else {
            RoundPhase::Results
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RoundPhase {
    PendingIntake,
    Intake,
    PendingVoting,
    Voting,
    PendingResults,
    Results,
}

impl RoundPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            RoundPhase::PendingIntake => "pending-intake",
            RoundPhase::Intake => "intake",
            RoundPhase::PendingVoting => "pending-voting",
            RoundPhase::Voting => "voting",
            RoundPhase::PendingResults => "pending-results",
            RoundPhase::Results => "results",
        }
    }
}

impl fmt::Display for RoundPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
