//! Declarative YAML definitions of documents and bundles
//!
//! Documents are declared once and referenced from bundles by identifier.
//! Bundles may reference other bundles; [`AssemblyDefinition::build`]
//! resolves the references into owned trees and registers every bundle
//! under its identifier.
//!
//! ```yaml
//! documents:
//!   - identifier: motion
//!     title: Motion to Stay
//!     variants: { final: motion.pdf, preview: motion-preview.pdf }
//!     addendum: addendum.pdf
//!     fields:
//!       - { field_name: statement, overflow_trigger: 640 }
//! bundles:
//!   - identifier: court_bundle
//!     title: Court filing
//!     members: [ { document: motion } ]
//! ```

use crate::bundle::{Bundle, BundleMember, BundleRegistry};
use crate::config;
use crate::document::Document;
use crate::error::{AssemblyError, Result};
use crate::registry::{FieldEntry, FieldRegistry};
use crate::types::Variant;
use serde::{Deserialize, Serialize};
use std::cell::Cell;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;

fn default_true() -> bool {
    true
}

/// A document as declared in YAML.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentDefinition {
    pub identifier: String,
    pub title: String,
    /// Defaults to whether an addendum is given
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_addendum: Option<bool>,
    #[serde(default)]
    pub variants: BTreeMap<Variant, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub addendum: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overflow_message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_width: Option<usize>,
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default)]
    pub fields: Vec<FieldEntry>,
}

impl DocumentDefinition {
    fn to_document(&self) -> Result<Document> {
        let mut doc = Document::new(&self.identifier, &self.title)
            .with_fields(FieldRegistry::from_entries(&self.fields)?)
            .with_enabled(self.enabled);

        for (variant, location) in &self.variants {
            doc = doc.with_variant(variant.clone(), location.as_str());
        }
        if let Some(addendum) = &self.addendum {
            doc = doc.with_addendum(addendum.as_str());
        }
        if let Some(has_addendum) = self.has_addendum {
            doc = doc.with_has_addendum(has_addendum);
        }
        if let Some(message) = &self.overflow_message {
            doc = doc.with_overflow_message(message);
        }
        if let Some(width) = self.line_width {
            doc = doc.with_line_width(width);
        }
        Ok(doc)
    }
}

/// Reference from a bundle to a declared document or bundle, written
/// `{ document: id }` or `{ bundle: id }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MemberRef {
    Document { document: String },
    Bundle { bundle: String },
}

/// A bundle as declared in YAML.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BundleDefinition {
    pub identifier: String,
    pub title: String,
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default)]
    pub members: Vec<MemberRef>,
}

/// All documents and bundles of one assembly.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AssemblyDefinition {
    #[serde(default)]
    pub documents: Vec<DocumentDefinition>,
    #[serde(default)]
    pub bundles: Vec<BundleDefinition>,
}

impl AssemblyDefinition {
    /// Load a definition from a YAML file.
    ///
    /// # Errors
    ///
    /// `LoadError` if the file cannot be read or exceeds
    /// [`config::MAX_YAML_SIZE`], `YamlError` if it does not parse.
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        tracing::debug!(path = %path.display(), "Loading assembly definition");

        let metadata = fs::metadata(path)
            .map_err(|_| AssemblyError::LoadError("Failed to read definition file".to_string()))?;
        if metadata.len() > config::MAX_YAML_SIZE as u64 {
            tracing::warn!(
                size = metadata.len(),
                max = config::MAX_YAML_SIZE,
                "YAML file exceeds size limit"
            );
            return Err(AssemblyError::LoadError(format!(
                "File exceeds maximum size limit ({} bytes)",
                config::MAX_YAML_SIZE
            )));
        }

        let content = fs::read_to_string(path)
            .map_err(|_| AssemblyError::LoadError("Failed to read definition file".to_string()))?;
        Self::from_yaml_str(&content)
    }

    /// Parse a definition from YAML.
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        if content.len() > config::MAX_YAML_SIZE {
            tracing::warn!(
                size = content.len(),
                max = config::MAX_YAML_SIZE,
                "YAML content exceeds size limit"
            );
            return Err(AssemblyError::LoadError(format!(
                "YAML content exceeds maximum size limit ({} bytes)",
                config::MAX_YAML_SIZE
            )));
        }

        let definition: Self = serde_yaml::from_str(content)?;
        tracing::debug!(
            documents = definition.documents.len(),
            bundles = definition.bundles.len(),
            "Parsed assembly definition"
        );
        Ok(definition)
    }

    /// Resolve references and register every bundle under its identifier.
    ///
    /// # Errors
    ///
    /// `InvalidDefinition` for duplicate identifiers, unknown references,
    /// bundles that contain themselves, nesting deeper than
    /// [`config::MAX_BUNDLE_DEPTH`], or more than [`config::MAX_BUNDLE_NODES`]
    /// expanded members. Field errors such as `InvalidTrigger` are returned
    /// as they are.
    pub fn build(&self) -> Result<BundleRegistry> {
        let mut documents = HashMap::new();
        for definition in &self.documents {
            let doc = definition.to_document()?;
            if documents.insert(definition.identifier.as_str(), doc).is_some() {
                return Err(AssemblyError::InvalidDefinition(format!(
                    "duplicate document '{}'",
                    definition.identifier
                )));
            }
        }

        let mut bundles = HashMap::new();
        for definition in &self.bundles {
            if bundles
                .insert(definition.identifier.as_str(), definition)
                .is_some()
            {
                return Err(AssemblyError::InvalidDefinition(format!(
                    "duplicate bundle '{}'",
                    definition.identifier
                )));
            }
        }

        let builder = TreeBuilder {
            documents: &documents,
            bundles: &bundles,
            nodes: Cell::new(0),
        };
        let mut registry = BundleRegistry::new();
        for definition in &self.bundles {
            let bundle = builder.build(definition, &mut Vec::new())?;
            registry.insert(definition.identifier.clone(), bundle);
        }

        tracing::debug!(
            bundles = registry.len(),
            nodes = builder.nodes.get(),
            "Built bundle registry"
        );
        Ok(registry)
    }
}

struct TreeBuilder<'a> {
    documents: &'a HashMap<&'a str, Document>,
    bundles: &'a HashMap<&'a str, &'a BundleDefinition>,
    /// Bundles and documents expanded so far, shared bundles counted once
    /// per reference
    nodes: Cell<usize>,
}

impl TreeBuilder<'_> {
    fn count_node(&self, identifier: &str) -> Result<()> {
        let nodes = self.nodes.get() + 1;
        if nodes > config::MAX_BUNDLE_NODES {
            return Err(AssemblyError::InvalidDefinition(format!(
                "expanding '{}' exceeds {} bundle members",
                identifier,
                config::MAX_BUNDLE_NODES
            )));
        }
        self.nodes.set(nodes);
        Ok(())
    }

    /// `path` holds the identifiers of the bundles currently being built.
    fn build(&self, definition: &BundleDefinition, path: &mut Vec<String>) -> Result<Bundle> {
        if path.contains(&definition.identifier) {
            return Err(AssemblyError::InvalidDefinition(format!(
                "bundle '{}' contains itself",
                definition.identifier
            )));
        }
        if path.len() >= config::MAX_BUNDLE_DEPTH {
            return Err(AssemblyError::InvalidDefinition(format!(
                "bundle '{}' is nested deeper than {} levels",
                definition.identifier,
                config::MAX_BUNDLE_DEPTH
            )));
        }

        self.count_node(&definition.identifier)?;

        path.push(definition.identifier.clone());
        let mut bundle = Bundle::new(&definition.identifier, &definition.title)
            .with_enabled(definition.enabled);

        for member in &definition.members {
            let member: BundleMember = match member {
                MemberRef::Document { document: id } => {
                    let doc = self.documents.get(id.as_str()).ok_or_else(|| {
                        AssemblyError::InvalidDefinition(format!(
                            "bundle '{}' references unknown document '{}'",
                            definition.identifier, id
                        ))
                    })?;
                    self.count_node(id)?;
                    doc.clone().into()
                }
                MemberRef::Bundle { bundle: id } => {
                    let nested = self.bundles.get(id.as_str()).copied().ok_or_else(|| {
                        AssemblyError::InvalidDefinition(format!(
                            "bundle '{}' references unknown bundle '{}'",
                            definition.identifier, id
                        ))
                    })?;
                    self.build(nested, path)?.into()
                }
            };
            bundle.push(member);
        }

        path.pop();
        Ok(bundle)
    }
}
