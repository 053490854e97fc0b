//! Addendum fields and overflow computation
//!
//! An [`AddendumField`] binds a form slot to an interview variable and knows
//! how many units (characters for text, elements for lists) fit in that slot.
//! Everything else is computed from the current value on each call:
//!
//! - [`AddendumField::safe_value`] - what prints on the form
//! - [`AddendumField::overflow_value`] - what moves to the addendum
//!
//! Both are projections of one [`Split`], so the boundary between them is
//! decided once and never drifts.
//!
//! # Text truncation
//!
//! 1. Short single-line text is kept as is.
//! 2. With `preserve_line_breaks` and room for more than one line, paragraphs
//!    are packed line by line; paragraphs wider than a line are hard-wrapped.
//! 3. Otherwise line breaks collapse to spaces and the text is cut so that
//!    text plus overflow marker fits the trigger.

use crate::config;
use crate::markdown;
use crate::resolver::{resolve_if_defined, ValueResolver};
use crate::types::{Column, Value, ValueShape};

/// Formatting policy for a safe/overflow computation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverflowOptions {
    /// Appended to the safe value when content was cut
    pub overflow_marker: String,
    /// Characters per printed line
    pub line_width: usize,
    /// Keep paragraphs on separate lines instead of collapsing them
    pub preserve_line_breaks: bool,
}

impl Default for OverflowOptions {
    fn default() -> Self {
        Self {
            overflow_marker: String::new(),
            line_width: config::DEFAULT_LINE_WIDTH,
            preserve_line_breaks: false,
        }
    }
}

impl OverflowOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the overflow marker.
    pub fn with_marker(mut self, marker: impl Into<String>) -> Self {
        self.overflow_marker = marker.into();
        self
    }

    /// Set the line width. Zero is treated as one.
    pub fn with_line_width(mut self, line_width: usize) -> Self {
        self.line_width = line_width;
        self
    }

    /// Enable or disable paragraph-preserving mode.
    pub fn preserving_line_breaks(mut self, preserve: bool) -> Self {
        self.preserve_line_breaks = preserve;
        self
    }

    fn effective_line_width(&self) -> usize {
        self.line_width.max(1)
    }
}

/// The result of dividing a value between form and addendum.
#[derive(Debug, Clone, PartialEq)]
pub struct Split {
    /// How the bound value was classified
    pub shape: ValueShape,
    /// Portion that prints on the form, marker included
    pub safe: Value,
    /// Portion deferred to the addendum
    pub overflow: Value,
    /// Whether anything was cut
    pub truncated: bool,
}

impl Split {
    fn whole(shape: ValueShape, value: Value) -> Self {
        Self {
            shape,
            safe: value,
            overflow: Value::empty(),
            truncated: false,
        }
    }

    /// Whether the addendum has to carry something for this field.
    pub fn has_overflow(&self) -> bool {
        !self.overflow.is_empty()
    }
}

/// A form field whose content may overflow into an addendum.
#[derive(Debug, Clone, PartialEq)]
pub struct AddendumField {
    name: String,
    overflow_trigger: usize,
    headers: Option<Vec<Column>>,
    label: Option<String>,
    overflow_marker: Option<String>,
    preserve_line_breaks: bool,
}

impl AddendumField {
    /// Create a field bound to `name` that holds `overflow_trigger` units.
    ///
    /// # Errors
    ///
    /// Returns `AssemblyError::InvalidTrigger` when `overflow_trigger` is zero.
    pub fn new(name: impl Into<String>, overflow_trigger: usize) -> crate::Result<Self> {
        let name = name.into();
        if overflow_trigger == 0 {
            return Err(crate::AssemblyError::InvalidTrigger(name));
        }
        Ok(Self {
            name,
            overflow_trigger,
            headers: None,
            label: None,
            overflow_marker: None,
            preserve_line_breaks: false,
        })
    }

    /// Set explicit table columns for list-of-record values.
    pub fn with_headers(mut self, headers: Vec<Column>) -> Self {
        self.headers = Some(headers);
        self
    }

    /// Set the heading used for this field in the addendum.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Set the marker printed after cut content, overriding the document's
    /// overflow message.
    pub fn with_overflow_marker(mut self, marker: impl Into<String>) -> Self {
        self.overflow_marker = Some(marker.into());
        self
    }

    /// Print this field with its paragraphs kept on separate lines.
    pub fn preserving_line_breaks(mut self, preserve: bool) -> Self {
        self.preserve_line_breaks = preserve;
        self
    }

    /// Name of the bound interview variable.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn overflow_trigger(&self) -> usize {
        self.overflow_trigger
    }

    pub fn headers(&self) -> Option<&[Column]> {
        self.headers.as_deref()
    }

    pub fn overflow_marker(&self) -> Option<&str> {
        self.overflow_marker.as_deref()
    }

    pub fn preserves_line_breaks(&self) -> bool {
        self.preserve_line_breaks
    }

    /// Options this field prints with: `defaults` with the field's own
    /// marker and line-break policy applied on top.
    pub fn print_options(&self, defaults: &OverflowOptions) -> OverflowOptions {
        let mut options = defaults
            .clone()
            .preserving_line_breaks(defaults.preserve_line_breaks || self.preserve_line_breaks);
        if let Some(marker) = &self.overflow_marker {
            options = options.with_marker(marker.clone());
        }
        options
    }

    /// Addendum heading, falling back to the variable name.
    pub fn label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.name)
    }

    /// Whether the bound variable currently has a value.
    pub fn is_defined(&self, values: &dyn ValueResolver) -> bool {
        resolve_if_defined(values, &self.name).is_some()
    }

    /// The bound value, or the empty-string sentinel when undefined.
    pub fn full_value(&self, values: &dyn ValueResolver) -> Value {
        resolve_if_defined(values, &self.name).unwrap_or_else(Value::empty)
    }

    /// Classify the bound value.
    pub fn shape(&self, values: &dyn ValueResolver) -> ValueShape {
        resolve_if_defined(values, &self.name)
            .map(|v| ValueShape::of(&v))
            .unwrap_or(ValueShape::Undefined)
    }

    /// Lines available when line breaks are preserved.
    pub fn estimated_line_count(&self, line_width: usize, marker_len: usize) -> usize {
        self.overflow_trigger.saturating_sub(marker_len) / line_width.max(1) + 1
    }

    /// Divide the current value between form and addendum.
    pub fn split(&self, values: &dyn ValueResolver, options: &OverflowOptions) -> Split {
        let Some(value) = resolve_if_defined(values, &self.name) else {
            return Split::whole(ValueShape::Undefined, Value::empty());
        };

        let split = match value {
            Value::String(text) => self.split_text(&text, options),
            Value::Array(mut items) => {
                let overflow = items.split_off(self.overflow_trigger.min(items.len()));
                Split {
                    shape: ValueShape::Sequence,
                    truncated: !overflow.is_empty(),
                    safe: Value::Array(items),
                    overflow: Value::Array(overflow),
                }
            }
            other => Split::whole(ValueShape::Unsupported, other),
        };

        if split.truncated {
            tracing::trace!(field = %self.name, shape = ?split.shape, "Field overflows");
        }
        split
    }

    /// Portion of the value that fits on the form.
    pub fn safe_value(&self, values: &dyn ValueResolver, options: &OverflowOptions) -> Value {
        self.split(values, options).safe
    }

    /// Portion of the value that has to go to the addendum.
    pub fn overflow_value(&self, values: &dyn ValueResolver, options: &OverflowOptions) -> Value {
        self.split(values, options).overflow
    }

    /// Table columns for list-of-record values.
    ///
    /// Configured headers win. Otherwise the keys of the first element are
    /// used when it is a record. `None` means no table can be drawn, which is
    /// not the same as an empty header list.
    pub fn columns(&self, values: &dyn ValueResolver) -> Option<Vec<Column>> {
        if let Some(headers) = &self.headers {
            return Some(headers.clone());
        }
        let value = resolve_if_defined(values, &self.name)?;
        let first = value.as_array()?.first()?.as_record()?;
        Some(first.keys().map(Column::inferred).collect())
    }

    /// Render the overflow for the addendum.
    ///
    /// Lists become a pipe table when columns are known and a bullet list
    /// otherwise; text overflow is returned as is.
    pub fn overflow_as_markdown(
        &self,
        values: &dyn ValueResolver,
        options: &OverflowOptions,
    ) -> String {
        match self.split(values, options).overflow {
            Value::Array(items) if items.is_empty() => String::new(),
            Value::Array(items) => match self.columns(values) {
                Some(columns) if !columns.is_empty() => markdown::pipe_table(&columns, &items),
                _ => markdown::bullet_list(&items),
            },
            Value::String(text) => text,
            _ => String::new(),
        }
    }

    fn split_text(&self, text: &str, options: &OverflowOptions) -> Split {
        if char_len(text) <= self.overflow_trigger && !has_line_break(text) {
            return Split::whole(ValueShape::Text, Value::String(text.to_string()));
        }

        let marker = options.overflow_marker.as_str();
        let marker_len = char_len(marker);
        let line_width = options.effective_line_width();
        let max_lines = self.estimated_line_count(line_width, marker_len);

        let (safe, overflow) = if options.preserve_line_breaks && max_lines > 1 {
            pack_paragraphs(text, line_width, max_lines)
        } else {
            let normalized = collapse_line_breaks(text, " ");
            let max_chars = self.overflow_trigger.saturating_sub(marker_len);
            let (head, tail) = split_at_chars(&normalized, max_chars);
            (head.to_string(), tail.trim_start().to_string())
        };

        if overflow.is_empty() {
            return Split::whole(ValueShape::Text, Value::String(safe));
        }
        Split {
            shape: ValueShape::Text,
            safe: Value::String(format!("{}{}", safe, marker)),
            overflow: Value::String(overflow),
            truncated: true,
        }
    }
}

/// Greedily fill `max_lines` lines with paragraphs, hard-wrapping wide ones
/// onto lines of their own.
///
/// Returns the packed text without its trailing line break, and whatever was
/// left over.
fn pack_paragraphs(text: &str, line_width: usize, max_lines: usize) -> (String, String) {
    let normalized = collapse_line_breaks(text, "\n");
    let mut packed = String::new();
    let mut lines = 0;
    // Byte offset into `normalized` of the first character not yet packed
    let mut consumed = 0;

    for paragraph in normalized.split('\n') {
        if lines >= max_lines {
            break;
        }
        if char_len(paragraph) <= line_width {
            packed.push_str(paragraph);
            packed.push('\n');
            lines += 1;
            consumed += paragraph.len() + 1;
            continue;
        }

        let mut rest = paragraph;
        while lines < max_lines && !rest.is_empty() {
            let (chunk, remainder) = split_at_chars(rest, line_width);
            packed.push_str(chunk);
            packed.push('\n');
            consumed += chunk.len();
            rest = remainder;
            lines += 1;
        }
        if !rest.is_empty() {
            break;
        }
        consumed += 1;
    }

    let remainder = normalized.get(consumed..).unwrap_or_default();
    (
        packed.trim_end().to_string(),
        remainder.trim_start().to_string(),
    )
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

fn has_line_break(s: &str) -> bool {
    s.contains(['\r', '\n'])
}

/// Split after `n` characters (not bytes).
fn split_at_chars(s: &str, n: usize) -> (&str, &str) {
    match s.char_indices().nth(n) {
        Some((idx, _)) => s.split_at(idx),
        None => (s, ""),
    }
}

/// Replace every run of `\r`/`\n` with `replacement` and drop trailing whitespace.
fn collapse_line_breaks(s: &str, replacement: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_break = false;
    for c in s.chars() {
        if c == '\r' || c == '\n' {
            if !in_break {
                out.push_str(replacement);
                in_break = true;
            }
        } else {
            out.push(c);
            in_break = false;
        }
    }
    out.truncate(out.trim_end().len());
    out
}
