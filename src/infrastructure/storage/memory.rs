use crate::domain::{Application, ApplicationState, ApplicationVersion, Ballot, ResultRow, Round};
use crate::foundation::RoundError;
use crate::foundation::{ApplicationId, RoundId, UserId};
use crate::infrastructure::storage::Storage;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

struct MemoryInner {
    rounds: HashMap<RoundId, Round>,
    applications: HashMap<ApplicationId, Application>,
    ballots: HashMap<(RoundId, UserId), Ballot>,
    results: HashMap<RoundId, Vec<ResultRow>>,
}

impl MemoryInner {
    fn new() -> Self {
        Self { rounds: HashMap::new(), applications: HashMap::new(), ballots: HashMap::new(), results: HashMap::new() }
    }
}

/// In-memory reference store. Uniqueness constraints are enforced under one
/// mutex, which serializes the check-then-insert the same way a relational
/// unique index would.
pub struct MemoryStorage {
    inner: Arc<Mutex<MemoryInner>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self { inner: Arc::new(Mutex::new(MemoryInner::new())) }
    }

    fn lock_inner(&self) -> Result<MutexGuard<'_, MemoryInner>, RoundError> {
        self.inner.lock().map_err(|_| RoundError::StorageError {
            operation: "memory storage lock".to_string(),
            details: "poisoned".to_string(),
        })
    }
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl Storage for MemoryStorage {
    fn insert_round(&self, round: Round) -> Result<(), RoundError> {
        let mut inner = self.lock_inner()?;
        inner.rounds.insert(round.id.clone(), round);
        Ok(())
    }

    fn get_round(&self, round_id: &RoundId) -> Result<Option<Round>, RoundError> {
        Ok(self.lock_inner()?.rounds.get(round_id).cloned())
    }

    fn insert_application(&self, application: Application) -> Result<(), RoundError> {
        let mut inner = self.lock_inner()?;
        inner.applications.insert(application.id.clone(), application);
        Ok(())
    }

    fn get_application(&self, application_id: &ApplicationId) -> Result<Option<Application>, RoundError> {
        Ok(self.lock_inner()?.applications.get(application_id).cloned())
    }

    fn list_applications(&self, round_id: &RoundId) -> Result<Vec<Application>, RoundError> {
        let inner = self.lock_inner()?;
        let mut applications: Vec<Application> =
            inner.applications.values().filter(|a| &a.round_id == round_id).cloned().collect();
        applications.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(applications)
    }

    fn append_version(&self, application_id: &ApplicationId, version: ApplicationVersion) -> Result<(), RoundError> {
        let mut inner = self.lock_inner()?;
        let application = inner
            .applications
            .get_mut(application_id)
            .ok_or_else(|| RoundError::ApplicationNotFound(application_id.to_string()))?;
        application.versions.push(version);
        application.state = ApplicationState::Pending;
        Ok(())
    }

    fn set_application_state(&self, application_id: &ApplicationId, state: ApplicationState) -> Result<(), RoundError> {
        let mut inner = self.lock_inner()?;
        let application = inner
            .applications
            .get_mut(application_id)
            .ok_or_else(|| RoundError::ApplicationNotFound(application_id.to_string()))?;
        application.state = state;
        Ok(())
    }

    fn insert_ballot(&self, ballot: Ballot) -> Result<(), RoundError> {
        let mut inner = self.lock_inner()?;
        let key = (ballot.round_id.clone(), ballot.voter_user_id.clone());
        if inner.ballots.contains_key(&key) {
            return Err(RoundError::BallotAlreadySubmitted {
                round_id: ballot.round_id.to_string(),
                voter_user_id: ballot.voter_user_id.to_string(),
            });
        }
        inner.ballots.insert(key, ballot);
        Ok(())
    }

    fn replace_ballot(&self, ballot: Ballot) -> Result<(), RoundError> {
        let mut inner = self.lock_inner()?;
        let key = (ballot.round_id.clone(), ballot.voter_user_id.clone());
        if !inner.ballots.contains_key(&key) {
            return Err(RoundError::BallotNotFound {
                round_id: ballot.round_id.to_string(),
                voter_user_id: ballot.voter_user_id.to_string(),
            });
        }
        inner.ballots.insert(key, ballot);
        Ok(())
    }

    fn get_ballot(&self, round_id: &RoundId, voter_user_id: &UserId) -> Result<Option<Ballot>, RoundError> {
        Ok(self.lock_inner()?.ballots.get(&(round_id.clone(), voter_user_id.clone())).cloned())
    }

    fn list_ballots(&self, round_id: &RoundId) -> Result<Vec<Ballot>, RoundError> {
        let inner = self.lock_inner()?;
        let mut ballots: Vec<Ballot> = inner.ballots.values().filter(|b| &b.round_id == round_id).cloned().collect();
        ballots.sort_by(|a, b| a.voter_user_id.cmp(&b.voter_user_id));
        Ok(ballots)
    }

    fn replace_results(&self, round_id: &RoundId, rows: Vec<ResultRow>) -> Result<(), RoundError> {
        let mut inner = self.lock_inner()?;
        let round = inner.rounds.get_mut(round_id).ok_or_else(|| RoundError::RoundNotFound(round_id.to_string()))?;
        // Delete-all, insert-all and the flag flip under one lock.
        round.results_calculated = true;
        inner.results.insert(round_id.clone(), rows);
        Ok(())
    }

    fn list_results(&self, round_id: &RoundId) -> Result<Vec<ResultRow>, RoundError> {
        Ok(self.lock_inner()?.results.get(round_id).cloned().unwrap_or_default())
    }

    fn set_results_published(&self, round_id: &RoundId) -> Result<(), RoundError> {
        let mut inner = self.lock_inner()?;
        let round = inner.rounds.get_mut(round_id).ok_or_else(|| RoundError::RoundNotFound(round_id.to_string()))?;
        if !round.results_calculated {
            return Err(RoundError::ResultsNotCalculated { round_id: round_id.to_string() });
        }
        round.results_published = true;
        Ok(())
    }
}
