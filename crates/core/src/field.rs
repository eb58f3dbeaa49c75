//! Field types, templates, placed instances and typed attribute edits.
//!
//! The per-type editing rules live in one table ([`FieldType::editable_attrs`])
//! so the editor, the canvas and the storage validation all agree on which
//! attributes a given field type carries.

use serde::{Deserialize, Serialize};

use crate::error::{BuilderError, CoreError};

// ---------------------------------------------------------------------------
// Field type
// ---------------------------------------------------------------------------

/// The kinds of field a form can contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Text,
    Textarea,
    Select,
    Checkbox,
    Radio,
    Date,
    File,
}

/// Attributes editable on free-text fields.
const TEXT_ATTRS: &[FieldAttr] = &[
    FieldAttr::Label,
    FieldAttr::Placeholder,
    FieldAttr::MaxLength,
    FieldAttr::MinLength,
    FieldAttr::Required,
];

/// Attributes editable on fields with a fixed option list.
const CHOICE_ATTRS: &[FieldAttr] = &[FieldAttr::Label, FieldAttr::Options, FieldAttr::Required];

/// Attributes editable on every other field type.
const BASIC_ATTRS: &[FieldAttr] = &[FieldAttr::Label, FieldAttr::Required];

impl FieldType {
    /// Every field type, in palette order.
    pub const ALL: [FieldType; 7] = [
        Self::Text,
        Self::Textarea,
        Self::Select,
        Self::Checkbox,
        Self::Radio,
        Self::Date,
        Self::File,
    ];

    /// Parse a type string as it appears on the wire.
    pub fn from_str_db(s: &str) -> Result<Self, CoreError> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| {
                CoreError::Validation(format!(
                    "Invalid field type '{s}'. Must be one of: text, textarea, select, \
                     checkbox, radio, date, file"
                ))
            })
    }

    /// Wire representation of the type.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Textarea => "textarea",
            Self::Select => "select",
            Self::Checkbox => "checkbox",
            Self::Radio => "radio",
            Self::Date => "date",
            Self::File => "file",
        }
    }

    /// Whether the type carries a placeholder and length bounds.
    pub fn is_free_text(self) -> bool {
        matches!(self, Self::Text | Self::Textarea)
    }

    /// Whether the type carries an option list.
    pub fn has_options(self) -> bool {
        matches!(self, Self::Select | Self::Radio)
    }

    /// The attributes an editor may expose for this type.
    pub fn editable_attrs(self) -> &'static [FieldAttr] {
        if self.is_free_text() {
            TEXT_ATTRS
        } else if self.has_options() {
            CHOICE_ATTRS
        } else {
            BASIC_ATTRS
        }
    }

    /// Whether the builder may edit `attr` on fields of this type.
    pub fn is_editable(self, attr: FieldAttr) -> bool {
        self.editable_attrs().contains(&attr)
    }

    /// Whether a captured value has the right shape for this type.
    ///
    /// Checkboxes capture a boolean; dates capture an ISO `YYYY-MM-DD`
    /// string; everything else captures free text (file inputs capture the
    /// chosen file name).
    pub fn accepts(self, value: &FieldValue) -> bool {
        match (self, value) {
            (Self::Checkbox, FieldValue::Bool(_)) => true,
            (Self::Checkbox, FieldValue::Text(_)) => false,
            (Self::Date, FieldValue::Text(s)) => {
                s.is_empty() || chrono::NaiveDate::parse_from_str(s, "%Y-%m-%d").is_ok()
            }
            (_, FieldValue::Text(_)) => true,
            (_, FieldValue::Bool(_)) => false,
        }
    }
}

impl std::fmt::Display for FieldType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Attributes
// ---------------------------------------------------------------------------

/// An editable attribute of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldAttr {
    Label,
    Placeholder,
    MaxLength,
    MinLength,
    Options,
    Required,
}

impl FieldAttr {
    /// The attribute key used by editors and on the wire.
    pub fn key(self) -> &'static str {
        match self {
            Self::Label => "label",
            Self::Placeholder => "placeholder",
            Self::MaxLength => "maxLength",
            Self::MinLength => "minLength",
            Self::Options => "options",
            Self::Required => "required",
        }
    }

    /// Parse a camelCase attribute key as sent by the editor.
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "label" => Some(Self::Label),
            "placeholder" => Some(Self::Placeholder),
            "maxLength" => Some(Self::MaxLength),
            "minLength" => Some(Self::MinLength),
            "options" => Some(Self::Options),
            "required" => Some(Self::Required),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Values
// ---------------------------------------------------------------------------

/// A value captured from a placed field at submit time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Bool(bool),
    Text(String),
}

// ---------------------------------------------------------------------------
// Templates
// ---------------------------------------------------------------------------

/// A palette entry. Placing it on the canvas clones it into a
/// [`FieldInstance`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldTemplate {
    pub id: String,
    pub label: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
}

impl FieldTemplate {
    /// A template with no type-specific attributes set.
    ///
    /// Select and radio templates start with an empty option list so the
    /// result is always well-formed.
    pub fn new(id: impl Into<String>, label: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            field_type,
            placeholder: None,
            required: false,
            max_length: None,
            min_length: None,
            options: field_type.has_options().then(Vec::new),
        }
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    pub fn with_options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options = Some(options.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_length_bounds(mut self, min: Option<u32>, max: Option<u32>) -> Self {
        self.min_length = min;
        self.max_length = max;
        self
    }

    /// Check a catalog entry: non-empty id and label plus the per-type
    /// attribute rules.
    pub fn validate(&self) -> Result<(), BuilderError> {
        let invalid = |reason: String| BuilderError::InvalidTemplate {
            id: self.id.clone(),
            reason,
        };

        if self.id.trim().is_empty() {
            return Err(invalid("template id must not be empty".to_string()));
        }
        if self.label.trim().is_empty() {
            return Err(invalid("label must not be empty".to_string()));
        }
        self.check_type_attributes().map_err(invalid)
    }

    /// Enforce which attributes may be present for the field's type.
    pub(crate) fn check_type_attributes(&self) -> Result<(), String> {
        let ty = self.field_type;

        if ty.has_options() && self.options.is_none() {
            return Err(format!("{ty} fields need an options list"));
        }
        if !ty.has_options() && self.options.is_some() {
            return Err(format!("{ty} fields cannot carry options"));
        }
        if !ty.is_free_text() {
            if self.placeholder.is_some() {
                return Err(format!("{ty} fields cannot carry a placeholder"));
            }
            if self.max_length.is_some() || self.min_length.is_some() {
                return Err(format!("{ty} fields cannot carry length bounds"));
            }
        }
        Ok(())
    }

    /// Apply a typed update. Returns `false` when the attribute does not
    /// apply to this field type, in which case nothing changes.
    pub fn apply(&mut self, update: FieldUpdate) -> bool {
        if !self.field_type.is_editable(update.attr()) {
            return false;
        }

        match update {
            FieldUpdate::Label(label) => self.label = label,
            FieldUpdate::Placeholder(placeholder) => self.placeholder = Some(placeholder),
            FieldUpdate::MaxLength(max) => self.max_length = max,
            FieldUpdate::MinLength(min) => self.min_length = min,
            FieldUpdate::Options(options) => self.options = Some(options),
            FieldUpdate::Required(requested) => {
                self.required = toggle_required(self.required, requested)
            }
        }
        true
    }
}

// ---------------------------------------------------------------------------
// Instances
// ---------------------------------------------------------------------------

/// A template placed on the canvas.
///
/// Serializes flat: the template attributes (with the template id as `id`)
/// followed by `instanceId` and an optional `value`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldInstance {
    pub instance_id: String,
    #[serde(flatten)]
    pub field: FieldTemplate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<FieldValue>,
}

impl FieldInstance {
    pub fn template_id(&self) -> &str {
        &self.field.id
    }

    pub fn field_type(&self) -> FieldType {
        self.field.field_type
    }

    pub fn label(&self) -> &str {
        &self.field.label
    }

    /// Check an instance read back from storage or the wire.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.instance_id.trim().is_empty() {
            return Err(CoreError::Validation(
                "Field instanceId must not be empty".to_string(),
            ));
        }
        self.field.check_type_attributes().map_err(|reason| {
            CoreError::Validation(format!("Field '{}': {reason}", self.instance_id))
        })?;
        if let Some(value) = &self.value {
            if !self.field.field_type.accepts(value) {
                return Err(CoreError::Validation(format!(
                    "Field '{}': value does not match field type {}",
                    self.instance_id, self.field.field_type
                )));
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Updates
// ---------------------------------------------------------------------------

/// A single attribute edit coming from the field editor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldUpdate {
    Label(String),
    Placeholder(String),
    MaxLength(Option<u32>),
    MinLength(Option<u32>),
    Options(Vec<String>),
    /// The carried value is ignored; see [`toggle_required`].
    Required(bool),
}

impl FieldUpdate {
    pub fn attr(&self) -> FieldAttr {
        match self {
            Self::Label(_) => FieldAttr::Label,
            Self::Placeholder(_) => FieldAttr::Placeholder,
            Self::MaxLength(_) => FieldAttr::MaxLength,
            Self::MinLength(_) => FieldAttr::MinLength,
            Self::Options(_) => FieldAttr::Options,
            Self::Required(_) => FieldAttr::Required,
        }
    }

    /// Build an update from the raw `(key, input text)` pair an editor
    /// control produces.
    ///
    /// Length bounds accept an empty string (clears the bound) or a
    /// non-negative integer. Options accept a comma-delimited string.
    pub fn parse(key: &str, raw: &str) -> Result<Self, CoreError> {
        let attr = FieldAttr::from_key(key)
            .ok_or_else(|| CoreError::Validation(format!("Unknown field attribute '{key}'")))?;

        Ok(match attr {
            FieldAttr::Label => Self::Label(raw.to_string()),
            FieldAttr::Placeholder => Self::Placeholder(raw.to_string()),
            FieldAttr::MaxLength => Self::MaxLength(parse_length(key, raw)?),
            FieldAttr::MinLength => Self::MinLength(parse_length(key, raw)?),
            FieldAttr::Options => Self::Options(parse_options(raw)),
            FieldAttr::Required => Self::Required(matches!(raw.trim(), "true" | "on" | "1")),
        })
    }
}

fn parse_length(key: &str, raw: &str) -> Result<Option<u32>, CoreError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    raw.parse::<u32>().map(Some).map_err(|_| {
        CoreError::Validation(format!(
            "{key} must be a non-negative integer, got '{raw}'"
        ))
    })
}

/// Split a comma-delimited option string.
///
/// Each entry is trimmed and order is kept. Empty entries survive, so a
/// trailing comma yields a trailing empty option.
pub fn parse_options(raw: &str) -> Vec<String> {
    raw.split(',').map(|opt| opt.trim().to_string()).collect()
}

/// New value of the `required` flag after an edit.
///
/// Any edit flips the flag; the requested value is not consulted.
pub fn toggle_required(current: bool, _requested: bool) -> bool {
    !current
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
