use log::{debug, info, trace, warn};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, OnceLock};

use crate::domain::ApplicationState;
use crate::foundation::Timestamp;

/// Append-only record of every round mutation. Events are emitted after the
/// write succeeds, so the trail reflects committed state only.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AuditEvent {
    ApplicationSubmitted {
        round_id: String,
        application_id: String,
        submitter_user_id: String,
        attested: bool,
        timestamp_millis: Timestamp,
    },
    ApplicationUpdated {
        round_id: String,
        application_id: String,
        submitter_user_id: String,
        version_count: usize,
        timestamp_millis: Timestamp,
    },
    ApplicationReviewed {
        round_id: String,
        application_id: String,
        reviewer_user_id: String,
        state: ApplicationState,
        timestamp_millis: Timestamp,
    },
    DeferredProofResolved {
        round_id: String,
        application_id: String,
        attestation_uid: String,
        timestamp_millis: Timestamp,
    },
    BallotSubmitted {
        round_id: String,
        voter_user_id: String,
        allocation_count: usize,
        total_votes: u64,
        timestamp_millis: Timestamp,
    },
    BallotReplaced {
        round_id: String,
        voter_user_id: String,
        allocation_count: usize,
        total_votes: u64,
        timestamp_millis: Timestamp,
    },
    ResultsCalculated {
        round_id: String,
        method: String,
        row_count: usize,
        actor_user_id: String,
        timestamp_millis: Timestamp,
    },
    ResultsPublished {
        round_id: String,
        actor_user_id: String,
        timestamp_millis: Timestamp,
    },
}

pub trait AuditLogger: Send + Sync {
    fn log(&self, event: AuditEvent);
}

pub struct StructuredAuditLogger;

impl AuditLogger for StructuredAuditLogger {
    fn log(&self, event: AuditEvent) {
        let json = match serde_json::to_string(&event) {
            Ok(json) => json,
            Err(err) => {
                warn!("audit: failed to serialize audit event error={}", err);
                "{\"type\":\"serialize_failed\"}".to_string()
            }
        };
        debug!(target: "rounds::audit::json", "audit event audit_event={}", json);
        info!(target: "rounds::audit::human", "audit summary={}", human_summary(&event));
    }
}

pub struct FileAuditLogger {
    file: Arc<Mutex<std::fs::File>>,
}

impl FileAuditLogger {
    pub fn new(path: &std::path::Path) -> std::io::Result<Self> {
        let file = std::fs::OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self { file: Arc::new(Mutex::new(file)) })
    }
}

impl AuditLogger for FileAuditLogger {
    fn log(&self, event: AuditEvent) {
        use std::io::Write;

        let json = match serde_json::to_string(&event) {
            Ok(json) => json,
            Err(err) => {
                warn!("audit: failed to serialize audit event for file logger error={}", err);
                "{\"type\":\"serialize_failed\"}".to_string()
            }
        };
        match self.file.lock() {
            Ok(mut file) => {
                if let Err(err) = writeln!(file, "{}", json) {
                    warn!("audit: failed to write audit event to file error={}", err);
                    return;
                }
                if let Err(err) = file.flush() {
                    warn!("audit: failed to flush audit event to file error={}", err);
                }
            }
            Err(err) => {
                warn!("audit: failed to lock audit file mutex error={}", err);
            }
        }
    }
}

pub struct MultiAuditLogger {
    loggers: Vec<Box<dyn AuditLogger>>,
}

impl MultiAuditLogger {
    pub fn new() -> Self {
        Self { loggers: vec![] }
    }

    pub fn add_logger(&mut self, logger: Box<dyn AuditLogger>) {
        self.loggers.push(logger);
    }
}

impl Default for MultiAuditLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl AuditLogger for MultiAuditLogger {
    fn log(&self, event: AuditEvent) {
        for logger in &self.loggers {
            logger.log(event.clone());
        }
    }
}

static AUDIT_LOGGER: OnceLock<Box<dyn AuditLogger>> = OnceLock::new();

const SHORT_ID_DISPLAY_LENGTH: usize = 16;

pub fn init_audit_logger(logger: Box<dyn AuditLogger>) {
    if AUDIT_LOGGER.set(logger).is_err() {
        warn!("init_audit_logger called more than once; ignoring");
    }
}

pub fn audit(event: AuditEvent) {
    match AUDIT_LOGGER.get() {
        Some(logger) => logger.log(event),
        None => trace!("audit event dropped: no logger configured event={:?}", event),
    }
}

fn short_id(value: &str) -> String {
    let trimmed = value.trim_start_matches("0x").trim_start_matches("0X");
    if trimmed.len() <= SHORT_ID_DISPLAY_LENGTH {
        trimmed.to_string()
    } else {
        format!("{}..", &trimmed[..SHORT_ID_DISPLAY_LENGTH])
    }
}

fn human_summary(event: &AuditEvent) -> String {
    match event {
        AuditEvent::ApplicationSubmitted { round_id, application_id, submitter_user_id, attested, .. } => format!(
            "AUDIT: application submitted - round={} application={} submitter={} attested={}",
            round_id,
            short_id(application_id),
            submitter_user_id,
            attested
        ),
        AuditEvent::ApplicationUpdated { round_id, application_id, submitter_user_id, version_count, .. } => format!(
            "AUDIT: application updated - round={} application={} submitter={} versions={}",
            round_id,
            short_id(application_id),
            submitter_user_id,
            version_count
        ),
        AuditEvent::ApplicationReviewed { round_id, application_id, reviewer_user_id, state, .. } => format!(
            "AUDIT: application reviewed - round={} application={} reviewer={} state={:?}",
            round_id,
            short_id(application_id),
            reviewer_user_id,
            state
        ),
        AuditEvent::DeferredProofResolved { round_id, application_id, attestation_uid, .. } => format!(
            "AUDIT: deferred proof resolved - round={} application={} uid={}",
            round_id,
            short_id(application_id),
            short_id(attestation_uid)
        ),
        AuditEvent::BallotSubmitted { round_id, voter_user_id, allocation_count, total_votes, .. } => format!(
            "AUDIT: ballot submitted - round={} voter={} projects={} votes={}",
            round_id, voter_user_id, allocation_count, total_votes
        ),
        AuditEvent::BallotReplaced { round_id, voter_user_id, allocation_count, total_votes, .. } => format!(
            "AUDIT: ballot replaced - round={} voter={} projects={} votes={}",
            round_id, voter_user_id, allocation_count, total_votes
        ),
        AuditEvent::ResultsCalculated { round_id, method, row_count, actor_user_id, .. } => format!(
            "AUDIT: results calculated - round={} method={} rows={} by={}",
            round_id, method, row_count, actor_user_id
        ),
        AuditEvent::ResultsPublished { round_id, actor_user_id, .. } => {
            format!("AUDIT: results published - round={} by={}", round_id, actor_user_id)
        }
    }
}
