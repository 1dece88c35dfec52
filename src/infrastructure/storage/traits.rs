use crate::domain::{Application, ApplicationState, ApplicationVersion, Ballot, ResultRow, Round};
use crate::foundation::RoundError;
use crate::foundation::{ApplicationId, RoundId, UserId};

pub type Result<T> = std::result::Result<T, RoundError>;

/// Transactional round/application/ballot/result store.
///
/// Implementations must provide at least snapshot isolation and enforce two
/// uniqueness constraints themselves: one ballot per `(round, voter)` and
/// one result row per `(round, application)`. The ballot constraint is the
/// authority for "already submitted" — callers treat its violation as the
/// definitive signal, never their own read-then-check.
pub trait Storage: Send + Sync {
    fn insert_round(&self, round: Round) -> Result<()>;
    fn get_round(&self, round_id: &RoundId) -> Result<Option<Round>>;

    fn insert_application(&self, application: Application) -> Result<()>;
    fn get_application(&self, application_id: &ApplicationId) -> Result<Option<Application>>;
    fn list_applications(&self, round_id: &RoundId) -> Result<Vec<Application>>;

    /// Appends a new current version and resets the review state to
    /// `Pending` in one atomic step.
    fn append_version(&self, application_id: &ApplicationId, version: ApplicationVersion) -> Result<()>;

    fn set_application_state(&self, application_id: &ApplicationId, state: ApplicationState) -> Result<()>;

    /// Strict create; a `(round, voter)` conflict yields
    /// `BallotAlreadySubmitted`.
    fn insert_ballot(&self, ballot: Ballot) -> Result<()>;

    /// Full replacement of an existing ballot; `BallotNotFound` when no
    /// prior submission exists.
    fn replace_ballot(&self, ballot: Ballot) -> Result<()>;

    fn get_ballot(&self, round_id: &RoundId, voter_user_id: &UserId) -> Result<Option<Ballot>>;
    fn list_ballots(&self, round_id: &RoundId) -> Result<Vec<Ballot>>;

    /// Delete-all/insert-all of the round's result rows plus the
    /// `results_calculated` flag, atomically: concurrent readers never see
    /// the flag set without rows.
    fn replace_results(&self, round_id: &RoundId, rows: Vec<ResultRow>) -> Result<()>;

    fn list_results(&self, round_id: &RoundId) -> Result<Vec<ResultRow>>;

    /// One-way publish flag; requires results to have been calculated.
    fn set_results_published(&self, round_id: &RoundId) -> Result<()>;

    fn health_check(&self) -> Result<()> {
        Ok(())
    }
}
