//! The palette of field templates a form is composed from.

use serde::Serialize;

use crate::error::BuilderError;
use crate::field::{FieldTemplate, FieldType};

/// An ordered, validated, immutable list of field templates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldCatalog {
    templates: Vec<FieldTemplate>,
}

impl FieldCatalog {
    /// Build a catalog, checking every template and rejecting duplicate ids.
    pub fn new(templates: Vec<FieldTemplate>) -> Result<Self, BuilderError> {
        for (i, template) in templates.iter().enumerate() {
            template.validate()?;
            if templates[..i].iter().any(|t| t.id == template.id) {
                return Err(BuilderError::InvalidTemplate {
                    id: template.id.clone(),
                    reason: "duplicate template id".to_string(),
                });
            }
        }
        Ok(Self { templates })
    }

    /// Template at a palette position.
    pub fn get(&self, index: usize) -> Result<&FieldTemplate, BuilderError> {
        self.templates
            .get(index)
            .ok_or(BuilderError::IndexOutOfRange {
                index,
                len: self.templates.len(),
            })
    }

    pub fn find(&self, id: &str) -> Option<&FieldTemplate> {
        self.templates.iter().find(|t| t.id == id)
    }

    pub fn templates(&self) -> &[FieldTemplate] {
        &self.templates
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

impl Default for FieldCatalog {
    /// One template per field type.
    fn default() -> Self {
        Self {
            templates: default_templates(),
        }
    }
}

fn default_templates() -> Vec<FieldTemplate> {
    vec![
        FieldTemplate::new("field-1", "Text Input", FieldType::Text).with_placeholder("Enter text"),
        FieldTemplate::new("field-2", "Textarea", FieldType::Textarea)
            .with_placeholder("Enter your message"),
        FieldTemplate::new("field-3", "Select Dropdown", FieldType::Select)
            .with_options(["Option 1", "Option 2", "Option 3"]),
        FieldTemplate::new("field-4", "Checkbox", FieldType::Checkbox),
        FieldTemplate::new("field-5", "Radio Button", FieldType::Radio)
            .with_options(["Option A", "Option B"]),
        FieldTemplate::new("field-6", "Date Picker", FieldType::Date),
        FieldTemplate::new("field-7", "File Upload", FieldType::File),
    ]
}
