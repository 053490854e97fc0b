//! Error types for document assembly
//!
//! Overflow computation never fails: undefined values and unsupported shapes
//! are reported through [`crate::types::ValueShape`] instead. The variants here
//! cover authoring mistakes (missing addendum, unknown bundle) and failures of
//! the collaborators this crate talks to (renderer, YAML loader).

use thiserror::Error;

/// Main error type for assembly operations
#[derive(Error, Debug)]
pub enum AssemblyError {
    /// Overflow trigger must be a positive number of units
    #[error("Invalid overflow trigger for field '{0}': must be greater than zero")]
    InvalidTrigger(String),

    /// Field is not registered on the document
    #[error("Field not found: {0}")]
    FieldNotFound(String),

    /// Document has no artifact for the requested variant
    #[error("Variant '{variant}' not found on document '{document}'")]
    VariantNotFound { document: String, variant: String },

    /// Document overflows but no addendum artifact was supplied
    #[error("Document '{0}' needs an addendum but none is configured")]
    MissingAddendum(String),

    /// Bundle role not present in the registry
    #[error("Unknown bundle: {0}")]
    UnknownBundle(String),

    /// Every member of the bundle is disabled
    #[error("Nothing to render for '{0}': all members are disabled")]
    NothingToRender(String),

    /// Declarative definition is inconsistent
    #[error("Invalid definition: {0}")]
    InvalidDefinition(String),

    /// The rendering collaborator failed
    #[error("Rendering failed: {0}")]
    RenderFailed(String),

    /// Variable lookup failed in the value store
    #[error("Variable not found: {0}")]
    VariableNotFound(String),

    /// Failed to load a definition file
    #[error("Failed to load definition: {0}")]
    LoadError(String),

    /// YAML parsing error
    #[error("YAML parse error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// IO error (file operations)
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl AssemblyError {
    /// Whether this error points at a mistake in the document/bundle setup
    /// rather than at a failing collaborator.
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            AssemblyError::InvalidTrigger(_)
                | AssemblyError::FieldNotFound(_)
                | AssemblyError::VariantNotFound { .. }
                | AssemblyError::MissingAddendum(_)
                | AssemblyError::UnknownBundle(_)
                | AssemblyError::NothingToRender(_)
                | AssemblyError::InvalidDefinition(_)
        )
    }
}

/// Result type alias for assembly operations
pub type Result<T> = std::result::Result<T, AssemblyError>;
