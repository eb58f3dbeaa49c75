//! Drag-reorder controller.
//!
//! Translates one completed drag gesture into a canvas operation. Gesture
//! capture and visual feedback belong to the UI layer; this module only sees
//! the `(source, destination)` pair it reports on drop. Nothing is kept
//! between gestures.

use serde::{Deserialize, Serialize};

use crate::builder::FormBuilder;
use crate::catalog::FieldCatalog;
use crate::error::BuilderError;
use crate::field::FieldInstance;

/// The two lists a field can be dragged between.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListId {
    Palette,
    Canvas,
}

/// A position within one of the lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DragLocation {
    pub list: ListId,
    pub index: usize,
}

impl DragLocation {
    pub fn palette(index: usize) -> Self {
        Self {
            list: ListId::Palette,
            index,
        }
    }

    pub fn canvas(index: usize) -> Self {
        Self {
            list: ListId::Canvas,
            index,
        }
    }
}

/// A completed gesture. `destination` is `None` when the item was dropped
/// outside any list or the drag was cancelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DragGesture {
    pub source: DragLocation,
    pub destination: Option<DragLocation>,
}

/// What a gesture did to the canvas.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DragOutcome {
    /// A palette template was placed; carries the new `instanceId`.
    Inserted { instance_id: String, index: usize },
    Moved { from: usize, to: usize },
    /// A placed field was dragged back to the palette.
    Removed(FieldInstance),
    NoOp,
}

/// Apply one gesture to the builder.
///
/// | source  | destination | effect                                   |
/// |---------|-------------|------------------------------------------|
/// | palette | canvas      | insert a clone of the template           |
/// | canvas  | canvas      | splice reorder                           |
/// | canvas  | palette     | remove from the canvas                   |
/// | palette | palette     | nothing                                  |
/// | any     | none        | nothing                                  |
///
/// On error the canvas is left untouched.
pub fn apply_gesture(
    builder: &mut FormBuilder,
    catalog: &FieldCatalog,
    gesture: DragGesture,
) -> Result<DragOutcome, BuilderError> {
    let DragGesture {
        source,
        destination,
    } = gesture;

    let Some(destination) = destination else {
        tracing::debug!(?source, "Drag dropped outside any list");
        return Ok(DragOutcome::NoOp);
    };

    let outcome = match (source.list, destination.list) {
        (ListId::Palette, ListId::Canvas) => {
            let template = catalog.get(source.index)?;
            let index = destination.index.min(builder.canvas().len());
            let instance = builder.insert_from_template(template, index)?;
            DragOutcome::Inserted {
                instance_id: instance.instance_id.clone(),
                index,
            }
        }
        (ListId::Canvas, ListId::Canvas) => {
            builder.move_within_canvas(source.index, destination.index)?;
            if source.index == destination.index {
                DragOutcome::NoOp
            } else {
                DragOutcome::Moved {
                    from: source.index,
                    to: destination.index,
                }
            }
        }
        (ListId::Canvas, ListId::Palette) => DragOutcome::Removed(builder.remove_at(source.index)?),
        (ListId::Palette, ListId::Palette) => DragOutcome::NoOp,
    };

    tracing::debug!(?source, ?destination, ?outcome, "Drag gesture applied");
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;
    use crate::field::{FieldType, FieldUpdate};

    fn drag(source: DragLocation, destination: Option<DragLocation>) -> DragGesture {
        DragGesture {
            source,
            destination,
        }
    }

    fn types(builder: &FormBuilder) -> Vec<FieldType> {
        builder
            .canvas()
            .fields()
            .iter()
            .map(|f| f.field_type())
            .collect()
    }

    /// Canvas `[text, textarea]` built through gestures.
    fn two_field_builder(catalog: &FieldCatalog) -> FormBuilder {
        let mut builder = FormBuilder::new();
        apply_gesture(
            &mut builder,
            catalog,
            drag(DragLocation::palette(0), Some(DragLocation::canvas(0))),
        )
        .unwrap();
        apply_gesture(
            &mut builder,
            catalog,
            drag(DragLocation::palette(1), Some(DragLocation::canvas(1))),
        )
        .unwrap();
        builder
    }

    #[test]
    fn palette_to_canvas_inserts_at_destination() {
        let catalog = FieldCatalog::default();
        let mut builder = two_field_builder(&catalog);

        let outcome = apply_gesture(
            &mut builder,
            &catalog,
            drag(DragLocation::palette(3), Some(DragLocation::canvas(1))),
        )
        .unwrap();

        assert_matches!(outcome, DragOutcome::Inserted { index: 1, .. });
        assert_eq!(
            types(&builder),
            vec![FieldType::Text, FieldType::Checkbox, FieldType::Textarea]
        );
    }

    #[test]
    fn palette_index_outside_catalog_fails() {
        let catalog = FieldCatalog::default();
        let mut builder = FormBuilder::new();
        let result = apply_gesture(
            &mut builder,
            &catalog,
            drag(DragLocation::palette(42), Some(DragLocation::canvas(0))),
        );
        assert_matches!(result, Err(BuilderError::IndexOutOfRange { index: 42, .. }));
        assert!(builder.canvas().is_empty());
    }

    #[test]
    fn canvas_to_canvas_reorders() {
        let catalog = FieldCatalog::default();
        let mut builder = two_field_builder(&catalog);

        let outcome = apply_gesture(
            &mut builder,
            &catalog,
            drag(DragLocation::canvas(0), Some(DragLocation::canvas(1))),
        )
        .unwrap();

        assert_eq!(outcome, DragOutcome::Moved { from: 0, to: 1 });
        assert_eq!(types(&builder), vec![FieldType::Textarea, FieldType::Text]);
    }

    #[test]
    fn canvas_to_palette_removes_and_clears_selection() {
        let catalog = FieldCatalog::default();
        let mut builder = two_field_builder(&catalog);
        let first = builder.canvas().fields()[0].instance_id.clone();
        builder.select(&first).unwrap();

        let outcome = apply_gesture(
            &mut builder,
            &catalog,
            drag(DragLocation::canvas(0), Some(DragLocation::palette(4))),
        )
        .unwrap();

        assert_matches!(outcome, DragOutcome::Removed(f) if f.instance_id == first);
        assert_eq!(types(&builder), vec![FieldType::Textarea]);
        assert!(builder.selected_id().is_none());
        assert_eq!(catalog, FieldCatalog::default());
    }

    #[test]
    fn palette_to_palette_is_noop() {
        let catalog = FieldCatalog::default();
        let mut builder = two_field_builder(&catalog);
        let before = builder.serialize();

        let outcome = apply_gesture(
            &mut builder,
            &catalog,
            drag(DragLocation::palette(0), Some(DragLocation::palette(2))),
        )
        .unwrap();

        assert_eq!(outcome, DragOutcome::NoOp);
        assert_eq!(builder.serialize(), before);
    }

    #[test]
    fn drop_outside_any_list_changes_nothing() {
        let catalog = FieldCatalog::default();
        let mut builder = two_field_builder(&catalog);
        let before = builder.serialize();

        let outcome =
            apply_gesture(&mut builder, &catalog, drag(DragLocation::canvas(0), None)).unwrap();

        assert_eq!(outcome, DragOutcome::NoOp);
        assert_eq!(builder.serialize(), before);
    }

    #[test]
    fn out_of_range_canvas_move_leaves_canvas_intact() {
        let catalog = FieldCatalog::default();
        let mut builder = two_field_builder(&catalog);
        let before = builder.serialize();

        let result = apply_gesture(
            &mut builder,
            &catalog,
            drag(DragLocation::canvas(5), Some(DragLocation::canvas(0))),
        );

        assert_matches!(result, Err(BuilderError::IndexOutOfRange { .. }));
        assert_eq!(builder.serialize(), before);
    }

    #[test]
    fn drag_text_then_rename_serializes_single_field() {
        let catalog = FieldCatalog::default();
        let mut builder = FormBuilder::new();

        let outcome = apply_gesture(
            &mut builder,
            &catalog,
            drag(DragLocation::palette(0), Some(DragLocation::canvas(0))),
        )
        .unwrap();
        let DragOutcome::Inserted { instance_id, .. } = outcome else {
            panic!("expected an insert, got {outcome:?}");
        };
        assert_eq!(builder.canvas().len(), 1);

        builder.select(&instance_id).unwrap();
        builder
            .edit_selected(FieldUpdate::Label("Full Name".into()))
            .unwrap();

        let fields = builder.serialize();
        assert_eq!(fields.len(), 1);
        assert_eq!(fields[0].label(), "Full Name");
        assert_eq!(fields[0].field_type(), FieldType::Text);

        let json = serde_json::to_value(&fields).unwrap();
        assert_eq!(json[0]["label"], "Full Name");
        assert_eq!(json[0]["type"], "text");
    }
}
