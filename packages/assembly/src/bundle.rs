//! Bundles of documents and the named bundle registry
//!
//! A [`Bundle`] is an ordered tree: each member is a [`Document`] or another
//! bundle, and each member can be switched off for the current run. The
//! tree is flattened depth-first, left to right, skipping disabled members,
//! and the result is handed to the renderer as one combined artifact or as
//! one artifact per top-level member.
//!
//! # Example
//!
//! ```ignore
//! use assembly_engine::{Bundle, Document, ManifestRenderer, ValueStore, Variant};
//!
//! let bundle = Bundle::new("court_bundle", "Court filing")
//!     .with_member(Document::new("cover", "Cover page").with_variant("final", "cover.pdf"))
//!     .with_member(Document::new("motion", "Motion").with_variant("final", "motion.pdf"));
//!
//! let combined = bundle.as_combined_artifact(&Variant::Final, &ValueStore::new(), &ManifestRenderer::default())?;
//! ```

use crate::artifact::{output_file_name, Artifact, ArtifactAction, Renderer};
use crate::document::Document;
use crate::error::{AssemblyError, Result};
use crate::markdown;
use crate::resolver::ValueResolver;
use crate::types::Variant;
use serde::Serialize;
use std::collections::HashMap;

/// A bundle member: a single document or a nested bundle.
#[derive(Debug, Clone, PartialEq)]
pub enum BundleMember {
    Document(Document),
    Bundle(Bundle),
}

impl BundleMember {
    pub fn identifier(&self) -> &str {
        match self {
            BundleMember::Document(doc) => doc.identifier(),
            BundleMember::Bundle(bundle) => bundle.identifier(),
        }
    }

    pub fn title(&self) -> &str {
        match self {
            BundleMember::Document(doc) => doc.title(),
            BundleMember::Bundle(bundle) => bundle.title(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        match self {
            BundleMember::Document(doc) => doc.is_enabled(),
            BundleMember::Bundle(bundle) => bundle.is_enabled(),
        }
    }

    fn set_enabled(&mut self, enabled: bool) {
        match self {
            BundleMember::Document(doc) => doc.set_enabled(enabled),
            BundleMember::Bundle(bundle) => bundle.set_enabled(enabled),
        }
    }
}

impl From<Document> for BundleMember {
    fn from(doc: Document) -> Self {
        BundleMember::Document(doc)
    }
}

impl From<Bundle> for BundleMember {
    fn from(bundle: Bundle) -> Self {
        BundleMember::Bundle(bundle)
    }
}

/// One row of a download listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListingRow {
    /// Document or bundle title
    pub label: String,
    /// Download reference from the renderer
    pub download: String,
    /// View reference from the renderer
    pub view: String,
}

/// An ordered, nestable collection of documents.
#[derive(Debug, Clone, PartialEq)]
pub struct Bundle {
    identifier: String,
    title: String,
    enabled: bool,
    members: Vec<BundleMember>,
}

impl Bundle {
    /// Create an enabled, empty bundle.
    pub fn new(identifier: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            title: title.into(),
            enabled: true,
            members: Vec::new(),
        }
    }

    /// Append a member.
    pub fn with_member(mut self, member: impl Into<BundleMember>) -> Self {
        self.members.push(member.into());
        self
    }

    /// Set whether this bundle is included when nested in another bundle.
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Append a member in place.
    pub fn push(&mut self, member: impl Into<BundleMember>) {
        self.members.push(member.into());
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

    pub fn members(&self) -> &[BundleMember] {
        &self.members
    }

    /// Enable or disable every member with `identifier`, at any depth.
    ///
    /// A document that appears in several places is switched everywhere.
    /// Returns how many members were found.
    pub fn set_member_enabled(&mut self, identifier: &str, enabled: bool) -> usize {
        let mut found = 0;
        for member in &mut self.members {
            if member.identifier() == identifier {
                member.set_enabled(enabled);
                found += 1;
            }
            if let BundleMember::Bundle(nested) = member {
                found += nested.set_member_enabled(identifier, enabled);
            }
        }
        found
    }

    /// First document with `identifier`, depth-first.
    pub fn document(&self, identifier: &str) -> Option<&Document> {
        self.members.iter().find_map(|member| match member {
            BundleMember::Document(doc) if doc.identifier() == identifier => Some(doc),
            BundleMember::Document(_) => None,
            BundleMember::Bundle(nested) => nested.document(identifier),
        })
    }

    /// Mutable form of [`Bundle::document`].
    pub fn document_mut(&mut self, identifier: &str) -> Option<&mut Document> {
        self.members.iter_mut().find_map(|member| match member {
            BundleMember::Document(doc) if doc.identifier() == identifier => Some(doc),
            BundleMember::Document(_) => None,
            BundleMember::Bundle(nested) => nested.document_mut(identifier),
        })
    }

    /// All enabled artifacts in concatenation order.
    ///
    /// Disabled documents and disabled nested bundles contribute nothing,
    /// whatever the state of their own members.
    pub fn flatten(&self, variant: &Variant, values: &dyn ValueResolver) -> Result<Vec<Artifact>> {
        let mut artifacts = Vec::new();
        self.flatten_into(variant, values, &mut artifacts)?;
        Ok(artifacts)
    }

    fn flatten_into(
        &self,
        variant: &Variant,
        values: &dyn ValueResolver,
        artifacts: &mut Vec<Artifact>,
    ) -> Result<()> {
        for member in &self.members {
            if !member.is_enabled() {
                tracing::trace!(
                    bundle = %self.identifier,
                    member = %member.identifier(),
                    "Skipping disabled member"
                );
                continue;
            }
            match member {
                BundleMember::Document(doc) => artifacts.extend(doc.render_set(variant, values)?),
                BundleMember::Bundle(nested) => nested.flatten_into(variant, values, artifacts)?,
            }
        }
        Ok(())
    }

    fn combine(&self, parts: Vec<Artifact>, renderer: &dyn Renderer) -> Result<Artifact> {
        if parts.is_empty() {
            return Err(AssemblyError::NothingToRender(self.identifier.clone()));
        }
        tracing::debug!(bundle = %self.identifier, parts = parts.len(), "Combining bundle");
        renderer.concatenate(&parts, &output_file_name(&self.identifier), &self.title)
    }

    /// The whole flattened bundle as one artifact.
    ///
    /// # Errors
    ///
    /// `NothingToRender` when every member is disabled.
    pub fn as_combined_artifact(
        &self,
        variant: &Variant,
        values: &dyn ValueResolver,
        renderer: &dyn Renderer,
    ) -> Result<Artifact> {
        let parts = self.flatten(variant, values)?;
        self.combine(parts, renderer)
    }

    /// One artifact per enabled top-level member.
    ///
    /// Documents come with their own addenda; nested bundles are combined as a
    /// whole. Nested bundles with nothing enabled are left out.
    pub fn as_artifact_list(
        &self,
        variant: &Variant,
        values: &dyn ValueResolver,
        renderer: &dyn Renderer,
    ) -> Result<Vec<Artifact>> {
        let mut artifacts = Vec::new();
        for member in self.members.iter().filter(|m| m.is_enabled()) {
            match member {
                BundleMember::Document(doc) => {
                    artifacts.push(doc.as_combined_artifact(variant, values, renderer)?)
                }
                BundleMember::Bundle(nested) => {
                    let parts = nested.flatten(variant, values)?;
                    if !parts.is_empty() {
                        artifacts.push(nested.combine(parts, renderer)?);
                    }
                }
            }
        }
        Ok(artifacts)
    }

    /// The preview variant as one artifact.
    pub fn preview_artifact(
        &self,
        values: &dyn ValueResolver,
        renderer: &dyn Renderer,
    ) -> Result<Artifact> {
        self.as_combined_artifact(&Variant::Preview, values, renderer)
    }

    /// Label plus download/view references for each artifact of
    /// [`Bundle::as_artifact_list`].
    pub fn download_listing(
        &self,
        variant: &Variant,
        values: &dyn ValueResolver,
        renderer: &dyn Renderer,
    ) -> Result<Vec<ListingRow>> {
        Ok(self
            .as_artifact_list(variant, values, renderer)?
            .iter()
            .map(|artifact| ListingRow {
                label: artifact.title.clone().unwrap_or_else(|| artifact.name.clone()),
                download: renderer.action_reference(artifact, ArtifactAction::Download),
                view: renderer.action_reference(artifact, ArtifactAction::View),
            })
            .collect())
    }

    /// [`Bundle::download_listing`] as a two-column markdown table.
    pub fn listing_markdown(
        &self,
        variant: &Variant,
        values: &dyn ValueResolver,
        renderer: &dyn Renderer,
    ) -> Result<String> {
        let rows: Vec<(String, String)> = self
            .download_listing(variant, values, renderer)?
            .into_iter()
            .map(|row| {
                (
                    row.label,
                    format!("[Download]({}) [View]({})", row.download, row.view),
                )
            })
            .collect();
        Ok(markdown::two_column_table(("Document", "Actions"), &rows))
    }

    /// Render the bundle tree for debugging.
    ///
    /// Produces output like:
    /// ```text
    /// court_bundle (bundle)
    /// +-- cover (document)
    /// +-- exhibits (bundle) [disabled]
    /// |   `-- exhibit_a (document)
    /// `-- motion (document) [addendum]
    /// ```
    pub fn outline(&self, values: &dyn ValueResolver) -> String {
        let mut lines = vec![format!(
            "{} (bundle){}",
            self.identifier,
            if self.enabled { "" } else { " [disabled]" }
        )];
        self.outline_members(values, "", &mut lines);
        lines.join("\n")
    }

    fn outline_members(&self, values: &dyn ValueResolver, indent: &str, lines: &mut Vec<String>) {
        let count = self.members.len();
        for (i, member) in self.members.iter().enumerate() {
            let is_last = i + 1 == count;
            let prefix = if is_last { "`-- " } else { "+-- " };
            let mut flags = Vec::new();
            if !member.is_enabled() {
                flags.push("disabled");
            }
            let kind = match member {
                BundleMember::Document(doc) => {
                    if doc.needs_addendum(values) {
                        flags.push("addendum");
                    }
                    "document"
                }
                BundleMember::Bundle(_) => "bundle",
            };
            let flags = if flags.is_empty() {
                String::new()
            } else {
                format!(" [{}]", flags.join(", "))
            };
            lines.push(format!(
                "{}{}{} ({}){}",
                indent,
                prefix,
                member.identifier(),
                kind,
                flags
            ));

            if let BundleMember::Bundle(nested) = member {
                let child_indent = format!("{}{}", indent, if is_last { "    " } else { "|   " });
                nested.outline_members(values, &child_indent, lines);
            }
        }
    }
}

/// Bundles by role, e.g. `court_bundle` and `user_bundle`.
#[derive(Debug, Clone, Default)]
pub struct BundleRegistry {
    bundles: HashMap<String, Bundle>,
}

impl BundleRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `bundle` under `role`, returning the bundle it replaced.
    pub fn insert(&mut self, role: impl Into<String>, bundle: Bundle) -> Option<Bundle> {
        self.bundles.insert(role.into(), bundle)
    }

    /// Builder form of [`BundleRegistry::insert`].
    pub fn with(mut self, role: impl Into<String>, bundle: Bundle) -> Self {
        self.insert(role, bundle);
        self
    }

    /// Get the bundle for a role.
    ///
    /// # Errors
    ///
    /// `UnknownBundle` if no bundle is registered under `role`.
    pub fn get(&self, role: &str) -> Result<&Bundle> {
        self.bundles
            .get(role)
            .ok_or_else(|| AssemblyError::UnknownBundle(role.to_string()))
    }

    /// Mutable form of [`BundleRegistry::get`].
    pub fn get_mut(&mut self, role: &str) -> Result<&mut Bundle> {
        self.bundles
            .get_mut(role)
            .ok_or_else(|| AssemblyError::UnknownBundle(role.to_string()))
    }

    pub fn contains(&self, role: &str) -> bool {
        self.bundles.contains_key(role)
    }

    /// Registered roles, sorted.
    pub fn roles(&self) -> Vec<&str> {
        let mut roles: Vec<&str> = self.bundles.keys().map(String::as_str).collect();
        roles.sort_unstable();
        roles
    }

    pub fn len(&self) -> usize {
        self.bundles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bundles.is_empty()
    }

    /// Enable or disable a document or nested bundle in every registered
    /// bundle. Returns how many members were switched.
    pub fn set_enabled(&mut self, identifier: &str, enabled: bool) -> usize {
        let found = self
            .bundles
            .values_mut()
            .map(|bundle| bundle.set_member_enabled(identifier, enabled))
            .sum();
        tracing::debug!(member = %identifier, enabled, found, "Switched bundle members");
        found
    }

    /// Preview of the bundle registered under `role`, as one artifact.
    pub fn preview_for(
        &self,
        role: &str,
        values: &dyn ValueResolver,
        renderer: &dyn Renderer,
    ) -> Result<Artifact> {
        self.get(role)?.preview_artifact(values, renderer)
    }

    /// Final artifacts of the bundle registered under `role`, one per
    /// top-level member, ready to attach to a message.
    pub fn attachment_list_for(
        &self,
        role: &str,
        values: &dyn ValueResolver,
        renderer: &dyn Renderer,
    ) -> Result<Vec<Artifact>> {
        self.get(role)?.as_artifact_list(&Variant::Final, values, renderer)
    }
}
