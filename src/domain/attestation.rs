use crate::domain::form::RoundForm;
use crate::foundation::{AccountId, RoundError, RoundId};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Structured payload carried by an attestation record: a content-address
/// pointer to the declared application plus the round it targets.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AttestationData {
    pub content_hash: String,
    pub round_id: RoundId,
}

impl AttestationData {
    pub fn decode(bytes: &[u8]) -> Result<Self, RoundError> {
        serde_json::from_slice(bytes)
            .map_err(|err| RoundError::AttestationPayloadInvalid { details: format!("attestation data: {}", err) })
    }
}

/// The application payload the submitter declared on the ledger.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DeclaredApplication {
    pub project_name: String,
    pub account_id: AccountId,
    #[serde(default)]
    pub answers: BTreeMap<String, Value>,
}

impl DeclaredApplication {
    pub fn decode(bytes: &[u8]) -> Result<Self, RoundError> {
        serde_json::from_slice(bytes)
            .map_err(|err| RoundError::AttestationPayloadInvalid { details: format!("declared application: {}", err) })
    }
}

/// Field-by-field check of the submitted values against the declared payload.
///
/// Private fields must be absent from the declared (public) payload even if
/// the values would match; public fields must be present and deep-equal.
/// Submitted answers whose field no longer exists on the current form are
/// skipped, since the form may have been edited after attestation.
pub fn check_declared_payload(
    form: &RoundForm,
    submitted_project_name: &str,
    submitted_account_id: &AccountId,
    submitted_answers: &BTreeMap<String, Value>,
    declared: &DeclaredApplication,
) -> Result<(), RoundError> {
    if declared.project_name != submitted_project_name {
        return Err(RoundError::FieldMismatch { field_id: "project_name".to_string() });
    }
    if &declared.account_id != submitted_account_id {
        return Err(RoundError::FieldMismatch { field_id: "account_id".to_string() });
    }

    for (field_id, submitted_value) in submitted_answers {
        let field = match form.field(field_id) {
            Some(field) => field,
            None => continue,
        };
        let declared_value = declared.answers.get(field_id);
        if field.private {
            if declared_value.is_some() {
                return Err(RoundError::PrivateFieldLeaked { field_id: field_id.clone() });
            }
            continue;
        }
        match declared_value {
            Some(value) if value == submitted_value => {}
            _ => return Err(RoundError::FieldMismatch { field_id: field_id.clone() }),
        }
    }
    Ok(())
}
