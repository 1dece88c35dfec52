use crate::foundation::RoundError;
use std::time::{SystemTime, UNIX_EPOCH};

pub fn current_timestamp_millis_env(env_var: Option<&str>) -> Result<u64, RoundError> {
    if let Some(var) = env_var {
        if let Ok(value) = std::env::var(var) {
            return value.parse::<u64>().map_err(|err| RoundError::Message(err.to_string()));
        }
    }
    let now = SystemTime::now().duration_since(UNIX_EPOCH).map_err(|err| RoundError::Message(err.to_string()))?;
    Ok(now.as_secs().saturating_mul(1_000).saturating_add(u64::from(now.subsec_millis())))
}

/// Returns the current wall-clock timestamp in milliseconds.
///
/// The core never calls this internally; phase-sensitive operations take
/// `now` as a parameter. This helper exists for the adapter layer above,
/// and respects `TEST_NOW_MILLIS_ENV_VAR` for test determinism.
pub fn now_millis() -> u64 {
    current_timestamp_millis_env(Some(crate::foundation::constants::TEST_NOW_MILLIS_ENV_VAR))
        .or_else(|_| current_timestamp_millis_env(None))
        .unwrap_or(0)
}
