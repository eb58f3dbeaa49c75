//! Values typed into placed fields, recorded per change event and merged
//! into the field sequence at submit time.

use std::collections::HashMap;

use crate::error::BuilderError;
use crate::field::{FieldInstance, FieldValue};

/// Latest captured value per `instanceId`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CapturedValues {
    values: HashMap<String, FieldValue>,
}

impl CapturedValues {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the current value of `instance`, replacing any earlier one.
    pub fn record(&mut self, instance: &FieldInstance, value: FieldValue) -> Result<(), BuilderError> {
        if !instance.field_type().accepts(&value) {
            return Err(BuilderError::InvalidValue {
                instance_id: instance.instance_id.clone(),
                field_type: instance.field_type(),
            });
        }
        self.values.insert(instance.instance_id.clone(), value);
        Ok(())
    }

    pub fn get(&self, instance_id: &str) -> Option<&FieldValue> {
        self.values.get(instance_id)
    }

    /// Drop the value of a field that left the canvas.
    pub fn forget(&mut self, instance_id: &str) -> Option<FieldValue> {
        self.values.remove(instance_id)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Stamp captured values onto a field sequence.
    ///
    /// Fields with nothing captured keep whatever value they already carry.
    pub fn merge_into(&self, mut fields: Vec<FieldInstance>) -> Vec<FieldInstance> {
        for field in &mut fields {
            if let Some(value) = self.values.get(&field.instance_id) {
                field.value = Some(value.clone());
            }
        }
        fields
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;
    use crate::field::{FieldTemplate, FieldType};

    fn instance(id: &str, field_type: FieldType) -> FieldInstance {
        FieldInstance {
            instance_id: id.to_string(),
            field: FieldTemplate::new("tpl", "Label", field_type),
            value: None,
        }
    }

    #[test]
    fn later_value_replaces_earlier() {
        let name = instance("name-1", FieldType::Text);
        let mut values = CapturedValues::new();
        values.record(&name, FieldValue::Text("Ad".into())).unwrap();
        values.record(&name, FieldValue::Text("Ada".into())).unwrap();
        assert_eq!(values.get("name-1"), Some(&FieldValue::Text("Ada".into())));
        assert_eq!(values.len(), 1);
    }

    #[test]
    fn mismatched_value_rejected() {
        let agree = instance("agree-1", FieldType::Checkbox);
        let mut values = CapturedValues::new();
        assert_matches!(
            values.record(&agree, FieldValue::Text("yes".into())),
            Err(BuilderError::InvalidValue { field_type: FieldType::Checkbox, .. })
        );
        assert!(values.is_empty());
    }

    #[test]
    fn merge_fills_only_captured_fields() {
        let fields = vec![
            instance("a", FieldType::Text),
            instance("b", FieldType::Checkbox),
        ];
        let mut values = CapturedValues::new();
        values.record(&fields[1], FieldValue::Bool(true)).unwrap();

        let merged = values.merge_into(fields);
        assert_eq!(merged[0].value, None);
        assert_eq!(merged[1].value, Some(FieldValue::Bool(true)));
    }

    #[test]
    fn forget_drops_value() {
        let a = instance("a", FieldType::Date);
        let mut values = CapturedValues::new();
        values.record(&a, FieldValue::Text("2025-01-21".into())).unwrap();
        assert!(values.forget("a").is_some());
        assert!(values.get("a").is_none());
    }
}
