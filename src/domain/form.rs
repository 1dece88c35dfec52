use crate::foundation::{RoundError, MAX_ANSWER_SIZE_BYTES};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Closed set of answer field kinds a round form may be built from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Text,
    Url,
    Email,
    List,
    Select,
    Markdown,
    Divider,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FormField {
    pub id: String,
    pub kind: FieldKind,
    pub label: String,
    /// Private answers are stored server-side only and must never appear in
    /// an attested (public) payload.
    #[serde(default)]
    pub private: bool,
    /// Allowed values for `Select` fields; ignored for every other kind.
    #[serde(default)]
    pub options: Vec<String>,
}

/// Ordered field list configured per round.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct RoundForm {
    pub fields: Vec<FormField>,
}

impl RoundForm {
    pub fn new(fields: Vec<FormField>) -> Self {
        Self { fields }
    }

    pub fn field(&self, id: &str) -> Option<&FormField> {
        self.fields.iter().find(|f| f.id == id)
    }
}

fn invalid(field: &FormField, details: impl Into<String>) -> RoundError {
    RoundError::InvalidAnswer { field_id: field.id.clone(), details: details.into() }
}

/// Validates one submitted answer against its field definition.
///
/// One arm per `FieldKind`; adding a variant fails to compile until every
/// validation path handles it.
pub fn validate_answer(field: &FormField, answer: &Value) -> Result<(), RoundError> {
    let serialized_len = serde_json::to_string(answer).map(|s| s.len()).unwrap_or(0);
    if serialized_len > MAX_ANSWER_SIZE_BYTES {
        return Err(invalid(field, format!("answer exceeds {} bytes", MAX_ANSWER_SIZE_BYTES)));
    }
    match field.kind {
        FieldKind::Text | FieldKind::Markdown => match answer {
            Value::String(_) => Ok(()),
            _ => Err(invalid(field, "expected a string")),
        },
        FieldKind::Url => match answer {
            Value::String(s) if s.starts_with("http://") || s.starts_with("https://") => Ok(()),
            Value::String(_) => Err(invalid(field, "expected an http(s) url")),
            _ => Err(invalid(field, "expected a string")),
        },
        FieldKind::Email => match answer {
            Value::String(s) if s.contains('@') && !s.starts_with('@') && !s.ends_with('@') => Ok(()),
            Value::String(_) => Err(invalid(field, "expected an email address")),
            _ => Err(invalid(field, "expected a string")),
        },
        FieldKind::List => match answer {
            Value::Array(items) if items.iter().all(Value::is_string) => Ok(()),
            Value::Array(_) => Err(invalid(field, "expected an array of strings")),
            _ => Err(invalid(field, "expected an array")),
        },
        FieldKind::Select => match answer {
            Value::String(s) if field.options.iter().any(|o| o == s) => Ok(()),
            Value::String(s) => Err(invalid(field, format!("{:?} is not an allowed option", s))),
            _ => Err(invalid(field, "expected a string")),
        },
        FieldKind::Divider => Err(invalid(field, "divider fields take no answer")),
    }
}
