//! Rendered artifacts and the rendering collaborator
//!
//! This crate never lays out pages. It hands ordered lists of [`Artifact`]s
//! to a [`Renderer`] that concatenates them and hands out download/view
//! references. [`ManifestRenderer`] is a deterministic implementation that
//! records which source files a combined artifact is made of, used by the
//! `assemble` binary and in tests.

use crate::config;
use crate::error::{AssemblyError, Result};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// A renderable unit produced by the surrounding framework.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artifact {
    /// File name presented to the user
    pub name: String,
    /// Document title, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Where the collaborator stored the file
    pub location: String,
    /// Source files a combined artifact was concatenated from, in order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parts: Vec<String>,
}

impl Artifact {
    /// Artifact for an already materialized file; its name is the last
    /// non-empty path segment of `location`.
    pub fn new(location: impl Into<String>) -> Self {
        let location = location.into();
        let name = location
            .rsplit(['/', '\\'])
            .find(|segment| !segment.is_empty())
            .unwrap_or(&location)
            .to_string();
        Self {
            name,
            title: None,
            location,
            parts: Vec::new(),
        }
    }

    /// Set the title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Source files this artifact stands for: its parts when combined,
    /// itself otherwise.
    pub fn sources(&self) -> Vec<&str> {
        if self.parts.is_empty() {
            vec![self.location.as_str()]
        } else {
            self.parts.iter().map(String::as_str).collect()
        }
    }
}

impl From<&str> for Artifact {
    fn from(location: &str) -> Self {
        Artifact::new(location)
    }
}

impl From<String> for Artifact {
    fn from(location: String) -> Self {
        Artifact::new(location)
    }
}

/// What a user can do with a delivered artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactAction {
    Download,
    View,
}

impl fmt::Display for ArtifactAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArtifactAction::Download => f.write_str("download"),
            ArtifactAction::View => f.write_str("view"),
        }
    }
}

/// The rendering/storage collaborator.
///
/// Calls are blocking. A failure is terminal for the request that caused it;
/// callers do not retry.
pub trait Renderer {
    /// Concatenate `parts`, in order, into one artifact.
    fn concatenate(&self, parts: &[Artifact], output_name: &str, title: &str) -> Result<Artifact>;

    /// Opaque URL-like reference for acting on an artifact.
    fn action_reference(&self, artifact: &Artifact, action: ArtifactAction) -> String;
}

/// Output file name for `identifier`, adding the PDF extension unless present.
pub fn output_file_name(identifier: &str) -> String {
    let suffix = format!(".{}", config::PDF_EXTENSION);
    if identifier.to_lowercase().ends_with(&suffix) {
        identifier.to_string()
    } else {
        format!("{}{}", identifier, suffix)
    }
}

/// Renderer that records concatenations instead of producing pages.
///
/// A combined artifact lives under `output_dir/<fingerprint>/<name>`, where
/// the fingerprint is a SHA-256 over its source locations. Identical inputs
/// therefore always give identical artifacts.
#[derive(Debug, Clone)]
pub struct ManifestRenderer {
    output_dir: String,
    base_url: String,
}

impl ManifestRenderer {
    pub fn new(output_dir: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            output_dir: output_dir.into(),
            base_url: base_url.into(),
        }
    }

    fn fingerprint(sources: &[&str]) -> String {
        let mut hasher = Sha256::new();
        for source in sources {
            hasher.update(source.as_bytes());
            hasher.update([0u8]);
        }
        let digest = hex::encode(hasher.finalize());
        digest[..12].to_string()
    }
}

impl Default for ManifestRenderer {
    fn default() -> Self {
        Self::new("output", "/files")
    }
}

impl Renderer for ManifestRenderer {
    fn concatenate(&self, parts: &[Artifact], output_name: &str, title: &str) -> Result<Artifact> {
        if parts.is_empty() {
            return Err(AssemblyError::RenderFailed(format!(
                "no parts to concatenate into '{}'",
                output_name
            )));
        }

        let sources: Vec<&str> = parts.iter().flat_map(Artifact::sources).collect();
        let fingerprint = Self::fingerprint(&sources);
        tracing::debug!(
            output = %output_name,
            parts = sources.len(),
            fingerprint = %fingerprint,
            "Concatenating artifacts"
        );

        Ok(Artifact {
            name: output_name.to_string(),
            title: Some(title.to_string()),
            location: format!("{}/{}/{}", self.output_dir, fingerprint, output_name),
            parts: sources.into_iter().map(str::to_string).collect(),
        })
    }

    fn action_reference(&self, artifact: &Artifact, action: ArtifactAction) -> String {
        format!(
            "{}/{}?action={}",
            self.base_url.trim_end_matches('/'),
            artifact.location.trim_start_matches('/'),
            action
        )
    }
}
