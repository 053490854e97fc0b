//! World struct for Cucumber BDD tests
//!
//! Contains the test state that persists across steps in a scenario.

use assembly_engine::{
    AddendumField, Artifact, AssemblyError, Bundle, Document, ManifestRenderer, OverflowOptions,
    Split, ValueStore,
};
use cucumber::World;
use std::collections::HashMap;
use std::fmt;

/// Test world that holds state across steps in a Cucumber scenario.
#[derive(World, Default)]
#[world(init = Self::new)]
pub struct AssemblyWorld {
    /// Field under test in overflow scenarios
    pub field: Option<AddendumField>,
    /// Documents by identifier
    pub documents: HashMap<String, Document>,
    /// Bundles by identifier
    pub bundles: HashMap<String, Bundle>,
    /// Answers for the current scenario
    pub values: ValueStore,
    /// Renderer that records concatenations
    pub renderer: ManifestRenderer,
    /// Last split (if a field was split)
    pub split: Option<Split>,
    /// Options used for the last split
    pub options: OverflowOptions,
    /// Last produced artifacts (if successful)
    pub artifacts: Vec<Artifact>,
    /// Last error (if assembly failed)
    pub error: Option<AssemblyError>,
}

impl fmt::Debug for AssemblyWorld {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AssemblyWorld")
            .field("field", &self.field)
            .field("documents", &self.documents.keys().collect::<Vec<_>>())
            .field("bundles", &self.bundles.keys().collect::<Vec<_>>())
            .field("values", &self.values)
            .field("split", &self.split)
            .field("artifacts", &self.artifacts)
            .field("error", &self.error.as_ref().map(|e| e.to_string()))
            .finish()
    }
}

impl AssemblyWorld {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store the outcome of an assembly step.
    pub fn record(&mut self, result: assembly_engine::Result<Vec<Artifact>>) {
        match result {
            Ok(artifacts) => {
                self.artifacts = artifacts;
                self.error = None;
            }
            Err(e) => {
                self.artifacts.clear();
                self.error = Some(e);
            }
        }
    }

    /// Bundle by identifier, panicking with a readable message if missing.
    pub fn bundle(&self, identifier: &str) -> &Bundle {
        self.bundles
            .get(identifier)
            .unwrap_or_else(|| panic!("Bundle '{}' was not set up", identifier))
    }

    /// Document by identifier, panicking with a readable message if missing.
    pub fn document(&self, identifier: &str) -> &Document {
        self.documents
            .get(identifier)
            .unwrap_or_else(|| panic!("Document '{}' was not set up", identifier))
    }

    /// Names of the last produced artifacts, in order.
    pub fn artifact_names(&self) -> Vec<&str> {
        self.artifacts.iter().map(|a| a.name.as_str()).collect()
    }

    /// Get error message if assembly failed
    pub fn error_message(&self) -> Option<String> {
        self.error.as_ref().map(|e| e.to_string())
    }
}
