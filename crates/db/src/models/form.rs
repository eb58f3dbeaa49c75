//! Form models and DTOs.
//!
//! Request bodies accept both the current attribute names (`name`, `fields`)
//! and the legacy ones (`form_name`, `form_data`).

use formsmith_core::error::CoreError;
use formsmith_core::field::FieldInstance;
use formsmith_core::form::{validate_fields, validate_form_name, FormRecord, FormSummary};
use formsmith_core::types::{DbId, Timestamp};
use serde::Deserialize;
use sqlx::types::Json;
use sqlx::FromRow;

// ---------------------------------------------------------------------------
// Entity structs (database rows)
// ---------------------------------------------------------------------------

/// A row from the `forms` table.
#[derive(Debug, Clone, FromRow)]
pub struct Form {
    pub id: DbId,
    pub name: String,
    pub fields: Json<Vec<FieldInstance>>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<Form> for FormRecord {
    fn from(row: Form) -> Self {
        Self {
            id: row.id,
            name: row.name,
            fields: row.fields.0,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// A `forms` row projected for listing.
#[derive(Debug, Clone, FromRow)]
pub struct FormListRow {
    pub id: DbId,
    pub name: String,
    pub field_count: i64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<FormListRow> for FormSummary {
    fn from(row: FormListRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            field_count: row.field_count,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

// ---------------------------------------------------------------------------
// DTOs (request payloads)
// ---------------------------------------------------------------------------

/// Body of a create request, before validation.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateForm {
    #[serde(default, alias = "form_name")]
    pub name: String,
    #[serde(default, alias = "form_data")]
    pub fields: serde_json::Value,
}

/// Body of an update request, before validation. Omitted attributes keep
/// their stored value.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateForm {
    #[serde(alias = "form_name")]
    pub name: Option<String>,
    #[serde(alias = "form_data")]
    pub fields: Option<serde_json::Value>,
}

/// A validated form ready to insert.
#[derive(Debug, Clone, PartialEq)]
pub struct NewForm {
    pub name: String,
    pub fields: Vec<FieldInstance>,
}

/// Validated partial update.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormChanges {
    pub name: Option<String>,
    pub fields: Option<Vec<FieldInstance>>,
}

impl CreateForm {
    pub fn validate(self) -> Result<NewForm, CoreError> {
        validate_form_name(&self.name)?;
        let fields = validate_fields(&self.fields)?;
        Ok(NewForm {
            name: self.name,
            fields,
        })
    }
}

impl UpdateForm {
    pub fn validate(self) -> Result<FormChanges, CoreError> {
        if let Some(name) = &self.name {
            validate_form_name(name)?;
        }
        let fields = self.fields.as_ref().map(validate_fields).transpose()?;
        Ok(FormChanges {
            name: self.name,
            fields,
        })
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use serde_json::json;

    use super::*;

    #[test]
    fn create_accepts_legacy_names() {
        let dto: CreateForm = serde_json::from_value(json!({
            "form_name": "Signup",
            "form_data": [{"instanceId": "field-4-1", "id": "field-4", "label": "Agree", "type": "checkbox"}],
        }))
        .unwrap();
        let form = dto.validate().unwrap();
        assert_eq!(form.name, "Signup");
        assert_eq!(form.fields.len(), 1);
    }

    #[test]
    fn create_without_fields_rejected() {
        let dto: CreateForm = serde_json::from_value(json!({"name": "Empty"})).unwrap();
        assert_matches!(dto.validate(), Err(CoreError::Validation(_)));
    }

    #[test]
    fn create_without_name_rejected() {
        let dto: CreateForm = serde_json::from_value(json!({"fields": []})).unwrap();
        assert_matches!(dto.validate(), Err(CoreError::Validation(_)));
    }

    #[test]
    fn empty_update_changes_nothing() {
        let dto: UpdateForm = serde_json::from_value(json!({})).unwrap();
        assert_eq!(dto.validate().unwrap(), FormChanges::default());
    }

    #[test]
    fn update_with_blank_name_rejected() {
        let dto: UpdateForm = serde_json::from_value(json!({"name": " "})).unwrap();
        assert_matches!(dto.validate(), Err(CoreError::Validation(_)));
    }

    #[test]
    fn update_with_duplicate_instance_ids_rejected() {
        let field = json!({"instanceId": "dup", "id": "field-1", "label": "A", "type": "text"});
        let dto: UpdateForm =
            serde_json::from_value(json!({"form_data": [field.clone(), field]})).unwrap();
        assert_matches!(dto.validate(), Err(CoreError::Validation(_)));
    }
}
