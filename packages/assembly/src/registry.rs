//! Ordered registry of addendum fields
//!
//! Registration order is the order fields appear in the addendum, so the
//! registry is a vector with name lookup rather than a hash map.
//!
//! # Example
//!
//! ```ignore
//! use assembly_engine::{FieldDisplay, FieldRegistry, OverflowOptions, ValueStore};
//!
//! let mut fields = FieldRegistry::new();
//! fields.register_field("statement_of_facts", 640)?;
//! fields.register_field("witnesses", 3)?;
//!
//! let values = ValueStore::new().with("witnesses", vec!["A", "B", "C", "D"]);
//! let overflowing = fields.overflowed_fields(&values, FieldDisplay::OverflowOnly, &OverflowOptions::default());
//! assert_eq!(overflowing[0].name(), "witnesses");
//! ```

use crate::error::Result;
use crate::field::{AddendumField, OverflowOptions};
use crate::resolver::ValueResolver;
use crate::types::Column;
use serde::{Deserialize, Serialize};

/// Which fields [`FieldRegistry::overflowed_fields`] reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldDisplay {
    /// Defined fields that actually overflow
    #[default]
    OverflowOnly,
    /// Every defined field
    All,
}

/// Declarative form of a field, as written in definitions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldEntry {
    pub field_name: String,
    pub overflow_trigger: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headers: Option<Vec<Column>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Marker for this field instead of the document's overflow message
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overflow_marker: Option<String>,
    #[serde(default)]
    pub preserve_line_breaks: bool,
}

impl FieldEntry {
    pub fn new(field_name: impl Into<String>, overflow_trigger: usize) -> Self {
        Self {
            field_name: field_name.into(),
            overflow_trigger,
            headers: None,
            label: None,
            overflow_marker: None,
            preserve_line_breaks: false,
        }
    }

    /// Build the field this entry describes.
    pub fn to_field(&self) -> Result<AddendumField> {
        let mut field = AddendumField::new(&self.field_name, self.overflow_trigger)?;
        if let Some(headers) = &self.headers {
            field = field.with_headers(headers.clone());
        }
        if let Some(label) = &self.label {
            field = field.with_label(label);
        }
        if let Some(marker) = &self.overflow_marker {
            field = field.with_overflow_marker(marker);
        }
        Ok(field.preserving_line_breaks(self.preserve_line_breaks))
    }
}

/// Fields of one document, in registration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldRegistry {
    fields: Vec<AddendumField>,
}

impl FieldRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Populate a registry from declarative entries.
    ///
    /// # Errors
    ///
    /// Fails on the first entry with a zero trigger.
    pub fn from_entries(entries: &[FieldEntry]) -> Result<Self> {
        let mut registry = Self::new();
        for entry in entries {
            registry.register(entry.to_field()?);
        }
        Ok(registry)
    }

    /// Register a field bound to `name`.
    ///
    /// Registering a name twice replaces the first field in place, keeping
    /// its position.
    pub fn register_field(&mut self, name: &str, overflow_trigger: usize) -> Result<()> {
        self.register(AddendumField::new(name, overflow_trigger)?);
        Ok(())
    }

    /// Register a pre-built field, replacing one with the same name in place.
    pub fn register(&mut self, field: AddendumField) {
        match self.fields.iter_mut().find(|f| f.name() == field.name()) {
            Some(existing) => *existing = field,
            None => self.fields.push(field),
        }
    }

    /// Get a field by name.
    pub fn get(&self, name: &str) -> Option<&AddendumField> {
        self.fields.iter().find(|f| f.name() == name)
    }

    /// Get a field by name, registering it with `overflow_trigger` if absent.
    ///
    /// An existing field keeps its own trigger.
    pub fn get_or_register(&mut self, name: &str, overflow_trigger: usize) -> Result<&AddendumField> {
        let index = match self.fields.iter().position(|f| f.name() == name) {
            Some(index) => index,
            None => {
                self.fields.push(AddendumField::new(name, overflow_trigger)?);
                self.fields.len() - 1
            }
        };
        Ok(&self.fields[index])
    }

    /// Whether a field with this name is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Fields in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &AddendumField> {
        self.fields.iter()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Defined fields, in registration order, filtered by `display`.
    ///
    /// With [`FieldDisplay::OverflowOnly`] only fields whose overflow is
    /// non-empty are returned. Each field is split with `options` overridden
    /// by its own print policy, see [`AddendumField::print_options`].
    pub fn overflowed_fields(
        &self,
        values: &dyn ValueResolver,
        display: FieldDisplay,
        options: &OverflowOptions,
    ) -> Vec<&AddendumField> {
        self.fields
            .iter()
            .filter(|field| match display {
                FieldDisplay::OverflowOnly => field
                    .split(values, &field.print_options(options))
                    .has_overflow(),
                FieldDisplay::All => field.is_defined(values),
            })
            .collect()
    }
}
