//! Assembly Engine
//!
//! Overflow addenda and document bundles for assembled forms.
//! This library provides functionality for:
//! - Splitting answers that do not fit their form field into a safe part and
//!   an overflow part, and rendering the overflow as addendum content
//! - Deciding per document whether an addendum page has to be appended
//! - Nesting documents into bundles, switching members off per run, and
//!   delivering a bundle as one combined artifact or a list of artifacts
//! - Loading documents and bundles from declarative YAML
//!
//! # Example
//!
//! ```ignore
//! use assembly_engine::{AssemblyDefinition, ManifestRenderer, ValueStore};
//!
//! let registry = AssemblyDefinition::from_yaml_file("assembly.yaml")?.build()?;
//! let values = ValueStore::new().with("statement", "A long statement of facts ...");
//!
//! let preview = registry.preview_for("court_bundle", &values, &ManifestRenderer::default())?;
//! println!("{}", preview.location);
//! ```

pub mod artifact;
pub mod bundle;
pub mod config;
pub mod definition;
pub mod document;
pub mod error;
pub mod field;
pub mod markdown;
pub mod registry;
pub mod resolver;
pub mod types;

// Re-export commonly used items
pub use artifact::{output_file_name, Artifact, ArtifactAction, ManifestRenderer, Renderer};
pub use bundle::{Bundle, BundleMember, BundleRegistry, ListingRow};
pub use definition::{AssemblyDefinition, BundleDefinition, DocumentDefinition, MemberRef};
pub use document::Document;
pub use error::{AssemblyError, Result};
pub use field::{AddendumField, OverflowOptions, Split};
pub use registry::{FieldDisplay, FieldEntry, FieldRegistry};
pub use resolver::{resolve_if_defined, ValueResolver, ValueStore};
pub use types::{Column, Record, Value, ValueShape, Variant};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
