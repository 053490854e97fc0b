//! Documents with an optional overflow addendum
//!
//! A [`Document`] is one logical output form in its rendered variants
//! (final, preview, ...) plus, when the form can overflow, an addendum
//! artifact that is appended after the chosen variant whenever one of its
//! fields does not fit.

use crate::artifact::{output_file_name, Artifact, Renderer};
use crate::config;
use crate::error::{AssemblyError, Result};
use crate::field::{AddendumField, OverflowOptions};
use crate::registry::{FieldDisplay, FieldRegistry};
use crate::resolver::ValueResolver;
use crate::types::{Value, Variant};
use std::collections::BTreeMap;

/// One output form, its variants and its addendum.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    identifier: String,
    title: String,
    enabled: bool,
    has_addendum: bool,
    variants: BTreeMap<Variant, Artifact>,
    addendum: Option<Artifact>,
    fields: FieldRegistry,
    overflow_message: String,
    line_width: usize,
}

impl Document {
    /// Create an enabled document without variants, addendum or fields.
    pub fn new(identifier: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            title: title.into(),
            enabled: true,
            has_addendum: false,
            variants: BTreeMap::new(),
            addendum: None,
            fields: FieldRegistry::new(),
            overflow_message: config::DEFAULT_OVERFLOW_MESSAGE.to_string(),
            line_width: config::DEFAULT_LINE_WIDTH,
        }
    }

    /// Add or replace a rendered variant.
    pub fn with_variant(mut self, variant: impl Into<Variant>, artifact: impl Into<Artifact>) -> Self {
        self.variants.insert(variant.into(), artifact.into());
        self
    }

    /// Declare that this document can overflow into `addendum`.
    pub fn with_addendum(mut self, addendum: impl Into<Artifact>) -> Self {
        self.has_addendum = true;
        self.addendum = Some(addendum.into());
        self
    }

    /// Set whether the document may need an addendum at all.
    ///
    /// With `false`, field overflow is never consulted.
    pub fn with_has_addendum(mut self, has_addendum: bool) -> Self {
        self.has_addendum = has_addendum;
        self
    }

    /// Replace the field registry.
    pub fn with_fields(mut self, fields: FieldRegistry) -> Self {
        self.fields = fields;
        self
    }

    /// Set the default overflow marker for this document's fields.
    pub fn with_overflow_message(mut self, message: impl Into<String>) -> Self {
        self.overflow_message = message.into();
        self
    }

    /// Set the characters per line used for paragraph-preserving fields.
    pub fn with_line_width(mut self, line_width: usize) -> Self {
        self.line_width = line_width;
        self
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn has_addendum(&self) -> bool {
        self.has_addendum
    }

    pub fn addendum(&self) -> Option<&Artifact> {
        self.addendum.as_ref()
    }

    pub fn overflow_message(&self) -> &str {
        &self.overflow_message
    }

    /// Artifact for a variant, if declared.
    pub fn variant(&self, variant: &Variant) -> Option<&Artifact> {
        self.variants.get(variant)
    }

    /// Declared variants.
    pub fn variants(&self) -> impl Iterator<Item = &Variant> {
        self.variants.keys()
    }

    pub fn fields(&self) -> &FieldRegistry {
        &self.fields
    }

    pub fn fields_mut(&mut self) -> &mut FieldRegistry {
        &mut self.fields
    }

    /// Default options for the document's fields, before each field's own
    /// marker and line-break policy is applied.
    pub fn overflow_options(&self) -> OverflowOptions {
        OverflowOptions::new()
            .with_marker(self.overflow_message.clone())
            .with_line_width(self.line_width)
    }

    /// Fields whose content currently spills into the addendum.
    pub fn addendum_fields(&self, values: &dyn ValueResolver) -> Vec<&AddendumField> {
        self.fields
            .overflowed_fields(values, FieldDisplay::OverflowOnly, &self.overflow_options())
    }

    /// Whether any field currently overflows.
    pub fn has_overflow(&self, values: &dyn ValueResolver) -> bool {
        !self.addendum_fields(values).is_empty()
    }

    /// Whether the addendum has to be appended.
    pub fn needs_addendum(&self, values: &dyn ValueResolver) -> bool {
        self.has_addendum && self.has_overflow(values)
    }

    /// Artifacts to concatenate for `variant`: the variant, then the
    /// addendum when needed.
    ///
    /// # Errors
    ///
    /// - `VariantNotFound` if the variant is not declared
    /// - `MissingAddendum` if the addendum is needed but not configured
    pub fn render_set(&self, variant: &Variant, values: &dyn ValueResolver) -> Result<Vec<Artifact>> {
        let primary = self
            .variants
            .get(variant)
            .ok_or_else(|| AssemblyError::VariantNotFound {
                document: self.identifier.clone(),
                variant: variant.to_string(),
            })?;

        if !self.needs_addendum(values) {
            return Ok(vec![primary.clone()]);
        }

        let addendum = self
            .addendum
            .as_ref()
            .ok_or_else(|| AssemblyError::MissingAddendum(self.identifier.clone()))?;
        tracing::debug!(document = %self.identifier, variant = %variant, "Appending addendum");
        Ok(vec![primary.clone(), addendum.clone()])
    }

    /// Concatenate [`Document::render_set`] into one artifact named after the
    /// document.
    pub fn as_combined_artifact(
        &self,
        variant: &Variant,
        values: &dyn ValueResolver,
        renderer: &dyn Renderer,
    ) -> Result<Artifact> {
        let parts = self.render_set(variant, values)?;
        renderer.concatenate(&parts, &output_file_name(&self.identifier), &self.title)
    }

    fn field(&self, name: &str) -> Result<&AddendumField> {
        self.fields
            .get(name)
            .ok_or_else(|| AssemblyError::FieldNotFound(name.to_string()))
    }

    /// Form value of a field, printed with the field's own policy.
    ///
    /// The same options decide [`Document::needs_addendum`], so whatever is
    /// cut here always reaches the addendum.
    pub fn safe_field_value(&self, name: &str, values: &dyn ValueResolver) -> Result<Value> {
        let field = self.field(name)?;
        Ok(field.safe_value(values, &field.print_options(&self.overflow_options())))
    }

    /// Addendum value of a field, the counterpart of [`Document::safe_field_value`].
    pub fn overflow_field_value(&self, name: &str, values: &dyn ValueResolver) -> Result<Value> {
        let field = self.field(name)?;
        Ok(field.overflow_value(values, &field.print_options(&self.overflow_options())))
    }

    /// Markdown body of the addendum: one section per overflowing field.
    pub fn addendum_markdown(&self, values: &dyn ValueResolver) -> String {
        let defaults = self.overflow_options();
        self.addendum_fields(values)
            .into_iter()
            .map(|field| {
                format!(
                    "## {}\n\n{}",
                    field.label(),
                    field.overflow_as_markdown(values, &field.print_options(&defaults))
                )
            })
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}
