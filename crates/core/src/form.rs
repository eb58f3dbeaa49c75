//! Persisted form records as they cross the HTTP boundary, plus the checks
//! the server applies to incoming payloads.

use serde::{Deserialize, Serialize};

use crate::canvas::Canvas;
use crate::error::CoreError;
use crate::field::FieldInstance;
use crate::types::{DbId, Timestamp};

/// Maximum length of a form name, in characters.
pub const MAX_FORM_NAME_LEN: usize = 255;

/// A saved form with its full field sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormRecord {
    pub id: DbId,
    #[serde(alias = "form_name")]
    pub name: String,
    #[serde(alias = "form_data")]
    pub fields: Vec<FieldInstance>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// One row of the form listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormSummary {
    pub id: DbId,
    #[serde(alias = "form_name")]
    pub name: String,
    pub field_count: i64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Request body for creating or replacing a form.
#[derive(Debug, Clone, Serialize)]
pub struct FormPayload<'a> {
    pub name: &'a str,
    pub fields: &'a [FieldInstance],
}

/// Check a form name: non-blank and at most [`MAX_FORM_NAME_LEN`] characters.
pub fn validate_form_name(name: &str) -> Result<(), CoreError> {
    if name.trim().is_empty() {
        return Err(CoreError::Validation(
            "Form name must not be empty".to_string(),
        ));
    }
    let len = name.chars().count();
    if len > MAX_FORM_NAME_LEN {
        return Err(CoreError::Validation(format!(
            "Form name is {len} characters, exceeding the maximum of {MAX_FORM_NAME_LEN}"
        )));
    }
    Ok(())
}

/// Decode and check a serialized field sequence.
///
/// The payload must be a JSON array of field instances that would form a
/// valid canvas: well-formed per type, with unique `instanceId`s.
pub fn validate_fields(fields: &serde_json::Value) -> Result<Vec<FieldInstance>, CoreError> {
    if !fields.is_array() {
        return Err(CoreError::Validation(
            "fields must be a JSON array".to_string(),
        ));
    }
    let decoded: Vec<FieldInstance> = serde_json::from_value(fields.clone())
        .map_err(|e| CoreError::Validation(format!("Invalid field definition: {e}")))?;
    Ok(Canvas::from_instances(decoded)?.serialize())
}
