//! CLI binary for assembling a bundle via stdin.
//!
//! Usage:
//!   echo '{"definition_yaml": "...", "values": {...}, "role": "court_bundle", "action": "combined"}' \
//!     | cargo run --bin assemble
//!
//! Input (JSON on stdin):
//!   - definition_yaml: String, the assembly definition
//!   - values: Object, answers keyed by variable name
//!   - role: String, the bundle to assemble (e.g. "court_bundle")
//!   - action: "combined" | "list" | "listing" | "preview" | "outline"
//!   - variant: Optional<String>, defaults to "final"
//!   - disabled: Optional<Vec<String>>, documents or bundles to leave out
//!
//! Output (JSON on stdout):
//!   - artifact: the combined artifact (combined, preview)
//!   - artifacts: one artifact per top-level member (list)
//!   - listing: label plus download/view references (listing)
//!   - outline: ASCII tree of the bundle (outline)
//!   - error: Optional<String>, error message if assembly failed

use assembly_engine::{
    Artifact, AssemblyDefinition, ListingRow, ManifestRenderer, Result, ValueStore, Variant,
};
use std::io::Read;
use tracing_subscriber::EnvFilter;

#[derive(serde::Deserialize, Clone, Copy, Debug)]
#[serde(rename_all = "snake_case")]
enum Action {
    Combined,
    List,
    Listing,
    Preview,
    Outline,
}

#[derive(serde::Deserialize)]
struct AssembleRequest {
    definition_yaml: String,
    #[serde(default)]
    values: ValueStore,
    role: String,
    action: Action,
    #[serde(default)]
    variant: Variant,
    #[serde(default)]
    disabled: Vec<String>,
}

#[derive(serde::Serialize, Default)]
struct AssembleResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    artifact: Option<Artifact>,
    #[serde(skip_serializing_if = "Option::is_none")]
    artifacts: Option<Vec<Artifact>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    listing: Option<Vec<ListingRow>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    outline: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

fn error_response(msg: String) -> AssembleResponse {
    AssembleResponse {
        error: Some(msg),
        ..Default::default()
    }
}

fn run(request: &AssembleRequest) -> Result<AssembleResponse> {
    let mut registry = AssemblyDefinition::from_yaml_str(&request.definition_yaml)?.build()?;
    for identifier in &request.disabled {
        registry.set_enabled(identifier, false);
    }

    let renderer = ManifestRenderer::default();
    let bundle = registry.get(&request.role)?;
    let values = &request.values;
    tracing::debug!(role = %request.role, action = ?request.action, variant = %request.variant, "Assembling");

    let mut response = AssembleResponse::default();
    match request.action {
        Action::Combined => {
            response.artifact =
                Some(bundle.as_combined_artifact(&request.variant, values, &renderer)?)
        }
        Action::List => {
            response.artifacts = Some(bundle.as_artifact_list(&request.variant, values, &renderer)?)
        }
        Action::Listing => {
            response.listing = Some(bundle.download_listing(&request.variant, values, &renderer)?)
        }
        Action::Preview => response.artifact = Some(bundle.preview_artifact(values, &renderer)?),
        Action::Outline => response.outline = Some(bundle.outline(values)),
    }
    Ok(response)
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let mut input = String::new();
    if let Err(e) = std::io::stdin().read_to_string(&mut input) {
        let resp = error_response(format!("Failed to read stdin: {e}"));
        println!("{}", serde_json::to_string(&resp).unwrap_or_default());
        std::process::exit(1);
    }

    let request: AssembleRequest = match serde_json::from_str(&input) {
        Ok(r) => r,
        Err(e) => {
            let resp = error_response(format!("Failed to parse request JSON: {e}"));
            println!("{}", serde_json::to_string(&resp).unwrap_or_default());
            std::process::exit(1);
        }
    };

    match run(&request) {
        Ok(resp) => println!("{}", serde_json::to_string(&resp).unwrap_or_default()),
        Err(e) => {
            let resp = error_response(format!("{e}"));
            println!("{}", serde_json::to_string(&resp).unwrap_or_default());
            std::process::exit(1);
        }
    }
}
