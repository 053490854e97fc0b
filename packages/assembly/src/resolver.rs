//! Value resolution for bound field names
//!
//! Fields never own their values. They read them, on every access, from the
//! interview's variable store through [`ValueResolver`]. [`ValueStore`] is the
//! in-memory implementation used by the `assemble` binary and by tests.
//!
//! # Dot Notation
//!
//! Names may address nested values:
//! - `client.address.city` - navigate records
//! - `debts.0.creditor` - index into lists

use crate::config;
use crate::error::{AssemblyError, Result};
use crate::types::Value;
use serde::Deserialize;
use std::collections::HashMap;

/// Trait for the collaborator that owns interview variables.
pub trait ValueResolver {
    /// Check whether a name currently has a value.
    fn is_defined(&self, name: &str) -> bool;

    /// Resolve a name to its value.
    ///
    /// # Returns
    /// * `Ok(Value)` - The resolved value
    /// * `Err(AssemblyError::VariableNotFound)` - Name has no value
    fn resolve(&self, name: &str) -> Result<Value>;
}

/// Look up a name, folding every failure into `None`.
///
/// Overflow computation must never abort document generation, so a resolver
/// error is indistinguishable from "not set yet" past this point.
pub fn resolve_if_defined(values: &dyn ValueResolver, name: &str) -> Option<Value> {
    if !values.is_defined(name) {
        return None;
    }
    match values.resolve(name) {
        Ok(Value::Null) => None,
        Ok(value) => Some(value),
        Err(e) => {
            tracing::debug!(field = %name, error = %e, "Treating unresolvable value as undefined");
            None
        }
    }
}

/// In-memory variable store keyed by top-level name.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct ValueStore {
    values: HashMap<String, Value>,
}

impl ValueStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a top-level value.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(name.into(), value.into());
    }

    /// Builder form of [`ValueStore::set`].
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(name, value);
        self
    }

    /// Remove a top-level value, making the name undefined again.
    pub fn unset(&mut self, name: &str) -> Option<Value> {
        self.values.remove(name)
    }

    /// Number of top-level values.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    fn lookup(&self, name: &str) -> Result<Value> {
        match name.split_once('.') {
            Some((root, path)) => {
                let base = self
                    .values
                    .get(root)
                    .ok_or_else(|| AssemblyError::VariableNotFound(root.to_string()))?;
                get_property(base, path, 0)
            }
            None => self
                .values
                .get(name)
                .cloned()
                .ok_or_else(|| AssemblyError::VariableNotFound(name.to_string())),
        }
    }
}

impl ValueResolver for ValueStore {
    fn is_defined(&self, name: &str) -> bool {
        matches!(self.lookup(name), Ok(ref v) if !v.is_null())
    }

    fn resolve(&self, name: &str) -> Result<Value> {
        self.lookup(name)
    }
}

impl FromIterator<(String, Value)> for ValueStore {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

/// Walk a dotted property path into records and lists.
fn get_property(value: &Value, property_path: &str, depth: usize) -> Result<Value> {
    if depth >= config::MAX_PROPERTY_DEPTH {
        return Err(AssemblyError::VariableNotFound(format!(
            "property access depth exceeds maximum of {}",
            config::MAX_PROPERTY_DEPTH
        )));
    }

    if let Some((first, rest)) = property_path.split_once('.') {
        let intermediate = get_property(value, first, depth + 1)?;
        return get_property(&intermediate, rest, depth + 1);
    }

    match value {
        Value::Object(record) => record
            .get(property_path)
            .cloned()
            .ok_or_else(|| AssemblyError::VariableNotFound(format!(".{}", property_path))),
        Value::Array(items) => property_path
            .parse::<usize>()
            .ok()
            .and_then(|index| items.get(index).cloned())
            .ok_or_else(|| AssemblyError::VariableNotFound(format!("[{}]", property_path))),
        _ => Err(AssemblyError::VariableNotFound(format!(
            ".{}",
            property_path
        ))),
    }
}
