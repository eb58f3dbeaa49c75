//! The form being built: canvas, selection and captured values together.
//!
//! [`FormBuilder`] is the single owner of the canvas and of the selection,
//! which lets removals clear a dangling selection in the same step.

use crate::canvas::Canvas;
use crate::error::{BuilderError, CoreError};
use crate::field::{FieldAttr, FieldInstance, FieldTemplate, FieldUpdate, FieldValue};
use crate::values::CapturedValues;

#[derive(Debug, Clone, Default)]
pub struct FormBuilder {
    canvas: Canvas,
    /// `instanceId` of the field open in the editor. Lookup only.
    selection: Option<String>,
    values: CapturedValues,
}

impl FormBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reopen a saved form for editing.
    ///
    /// Values stored on the fields are carried over as captured values.
    pub fn from_fields(fields: Vec<FieldInstance>) -> Result<Self, CoreError> {
        let canvas = Canvas::from_instances(fields)?;
        let mut values = CapturedValues::new();
        for field in canvas.fields() {
            if let Some(value) = &field.value {
                values
                    .record(field, value.clone())
                    .map_err(|e| CoreError::Validation(e.to_string()))?;
            }
        }
        Ok(Self {
            canvas,
            selection: None,
            values,
        })
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn values(&self) -> &CapturedValues {
        &self.values
    }

    // -----------------------------------------------------------------------
    // Canvas operations
    // -----------------------------------------------------------------------

    pub fn insert_from_template(
        &mut self,
        template: &FieldTemplate,
        at_index: usize,
    ) -> Result<&FieldInstance, BuilderError> {
        self.canvas.insert_from_template(template, at_index)
    }

    pub fn move_within_canvas(&mut self, from: usize, to: usize) -> Result<(), BuilderError> {
        self.canvas.move_within_canvas(from, to)
    }

    /// Remove a placed field. Clears the selection if it pointed at the
    /// removed field and drops its captured value.
    pub fn remove_at(&mut self, index: usize) -> Result<FieldInstance, BuilderError> {
        let removed = self.canvas.remove_at(index)?;
        if self.selection.as_deref() == Some(removed.instance_id.as_str()) {
            self.selection = None;
        }
        self.values.forget(&removed.instance_id);
        Ok(removed)
    }

    pub fn update_field(&mut self, instance_id: &str, update: FieldUpdate) -> bool {
        self.canvas.update_field(instance_id, update)
    }

    // -----------------------------------------------------------------------
    // Selection & editing
    // -----------------------------------------------------------------------

    pub fn select(&mut self, instance_id: &str) -> Result<(), BuilderError> {
        if !self.canvas.contains(instance_id) {
            return Err(BuilderError::UnknownInstance(instance_id.to_string()));
        }
        self.selection = Some(instance_id.to_string());
        Ok(())
    }

    pub fn clear_selection(&mut self) {
        self.selection = None;
    }

    pub fn selected_id(&self) -> Option<&str> {
        self.selected().map(|f| f.instance_id.as_str())
    }

    /// The selected field, if the selection still points at a placed field.
    pub fn selected(&self) -> Option<&FieldInstance> {
        self.selection
            .as_deref()
            .and_then(|id| self.canvas.find(id))
    }

    /// Attributes the editor should expose for the current selection.
    pub fn editable_attrs(&self) -> Option<&'static [FieldAttr]> {
        self.selected().map(|f| f.field_type().editable_attrs())
    }

    /// Apply an edit to the selected field.
    ///
    /// Returns whether the attribute applied to the field's type; edits to
    /// attributes the type does not carry are ignored.
    pub fn edit_selected(&mut self, update: FieldUpdate) -> Result<bool, BuilderError> {
        let id = self
            .selected_id()
            .map(str::to_owned)
            .ok_or(BuilderError::NoSelection)?;
        let applied = self.canvas.update_field(&id, update);
        if applied {
            tracing::debug!(instance_id = %id, "Selected field edited");
        }
        Ok(applied)
    }

    // -----------------------------------------------------------------------
    // Values & output
    // -----------------------------------------------------------------------

    /// Record the current input of a placed field.
    pub fn record_value(&mut self, instance_id: &str, value: FieldValue) -> Result<(), BuilderError> {
        let instance = self
            .canvas
            .find(instance_id)
            .ok_or_else(|| BuilderError::UnknownInstance(instance_id.to_string()))?;
        self.values.record(instance, value)
    }

    /// The field sequence as it stands, without captured values.
    pub fn serialize(&self) -> Vec<FieldInstance> {
        self.canvas.serialize()
    }

    /// The field sequence with captured values stamped on, ready to save.
    pub fn submission(&self) -> Vec<FieldInstance> {
        self.values.merge_into(self.canvas.serialize())
    }
}
