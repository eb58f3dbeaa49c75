use crate::field::FieldType;
use crate::types::DbId;

/// Domain errors shared by the storage and HTTP layers.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),
}

/// Errors raised by the form builder state machine.
///
/// None of these are fatal: the UI recovers by ignoring the gesture or by
/// showing a disabled editor.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BuilderError {
    /// A catalog entry violates the per-type attribute rules.
    #[error("Invalid template '{id}': {reason}")]
    InvalidTemplate { id: String, reason: String },

    /// An index fell outside the list it refers to.
    #[error("Index {index} is out of range for a list of length {len}")]
    IndexOutOfRange { index: usize, len: usize },

    /// No placed field carries the given instance id.
    #[error("Unknown field instance '{0}'")]
    UnknownInstance(String),

    /// An edit was attempted while nothing was selected.
    #[error("No field is selected")]
    NoSelection,

    /// A captured value does not have the shape the field type expects.
    #[error("Value does not fit {field_type} field '{instance_id}'")]
    InvalidValue {
        instance_id: String,
        field_type: FieldType,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_not_found() {
        let err = CoreError::NotFound {
            entity: "Form",
            id: 7,
        };
        assert_eq!(err.to_string(), "Entity not found: Form with id 7");
    }

    #[test]
    fn display_index_out_of_range() {
        let err = BuilderError::IndexOutOfRange { index: 4, len: 2 };
        assert_eq!(
            err.to_string(),
            "Index 4 is out of range for a list of length 2"
        );
    }

    #[test]
    fn display_invalid_template() {
        let err = BuilderError::InvalidTemplate {
            id: "field-3".into(),
            reason: "select fields need options".into(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid template 'field-3': select fields need options"
        );
    }
}
