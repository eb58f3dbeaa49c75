//! The ordered sequence of fields placed into the form being built.
//!
//! Order is significant: it is both the rendered order and the submitted
//! order. Every placed field carries an `instanceId` that is unique within
//! the canvas and never handed out twice, even after removal.

use crate::error::{BuilderError, CoreError};
use crate::field::{FieldInstance, FieldTemplate, FieldUpdate};

/// Issues `"{templateId}-{millis}"` ids from a strictly increasing stamp.
#[derive(Debug, Clone, Default)]
struct InstanceIds {
    last_stamp: i64,
}

impl InstanceIds {
    /// Start above every stamp already present in `placed`.
    fn after(placed: &[FieldInstance]) -> Self {
        let last_stamp = placed
            .iter()
            .filter_map(|f| f.instance_id.rsplit_once('-'))
            .filter_map(|(_, stamp)| stamp.parse::<i64>().ok())
            .max()
            .unwrap_or(0);
        Self { last_stamp }
    }

    fn next(&mut self, template_id: &str, placed: &[FieldInstance]) -> String {
        let mut stamp = chrono::Utc::now()
            .timestamp_millis()
            .max(self.last_stamp + 1);
        loop {
            let id = format!("{template_id}-{stamp}");
            if !placed.iter().any(|f| f.instance_id == id) {
                self.last_stamp = stamp;
                return id;
            }
            stamp += 1;
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Canvas {
    fields: Vec<FieldInstance>,
    ids: InstanceIds,
}

impl Canvas {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a canvas from a stored field sequence.
    ///
    /// Every instance is validated and `instanceId`s must be unique.
    pub fn from_instances(fields: Vec<FieldInstance>) -> Result<Self, CoreError> {
        for (i, field) in fields.iter().enumerate() {
            field.validate()?;
            if fields[..i]
                .iter()
                .any(|f| f.instance_id == field.instance_id)
            {
                return Err(CoreError::Validation(format!(
                    "Duplicate field instanceId '{}'",
                    field.instance_id
                )));
            }
        }
        Ok(Self {
            ids: InstanceIds::after(&fields),
            fields,
        })
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn fields(&self) -> &[FieldInstance] {
        &self.fields
    }

    pub fn get(&self, index: usize) -> Option<&FieldInstance> {
        self.fields.get(index)
    }

    pub fn find(&self, instance_id: &str) -> Option<&FieldInstance> {
        self.fields.iter().find(|f| f.instance_id == instance_id)
    }

    pub fn position(&self, instance_id: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.instance_id == instance_id)
    }

    pub fn contains(&self, instance_id: &str) -> bool {
        self.position(instance_id).is_some()
    }

    /// Clone `template` into a new instance and insert it at `at_index`,
    /// clamped to `[0, len]`.
    pub fn insert_from_template(
        &mut self,
        template: &FieldTemplate,
        at_index: usize,
    ) -> Result<&FieldInstance, BuilderError> {
        template.validate()?;

        let instance = FieldInstance {
            instance_id: self.ids.next(&template.id, &self.fields),
            field: template.clone(),
            value: None,
        };
        let index = at_index.min(self.fields.len());
        self.fields.insert(index, instance);
        Ok(&self.fields[index])
    }

    /// Splice reorder: take the instance out of `from`, then insert it at
    /// `to` in the shortened sequence.
    pub fn move_within_canvas(&mut self, from: usize, to: usize) -> Result<(), BuilderError> {
        let len = self.fields.len();
        for index in [from, to] {
            if index >= len {
                return Err(BuilderError::IndexOutOfRange { index, len });
            }
        }
        if from == to {
            return Ok(());
        }

        let moved = self.fields.remove(from);
        self.fields.insert(to, moved);
        Ok(())
    }

    pub fn remove_at(&mut self, index: usize) -> Result<FieldInstance, BuilderError> {
        if index >= self.fields.len() {
            return Err(BuilderError::IndexOutOfRange {
                index,
                len: self.fields.len(),
            });
        }
        Ok(self.fields.remove(index))
    }

    /// Apply an attribute edit to the named instance.
    ///
    /// Returns `false` without changing anything when no instance matches or
    /// the attribute does not apply to the instance's type.
    pub fn update_field(&mut self, instance_id: &str, update: FieldUpdate) -> bool {
        match self.fields.iter_mut().find(|f| f.instance_id == instance_id) {
            Some(instance) => instance.field.apply(update),
            None => false,
        }
    }

    /// The current sequence as plain records, in canvas order.
    pub fn serialize(&self) -> Vec<FieldInstance> {
        self.fields.clone()
    }
}
