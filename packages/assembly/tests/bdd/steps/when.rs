//! When step definitions
//!
//! Steps that split fields and assemble documents and bundles.

use assembly_engine::{OverflowOptions, Variant};
use cucumber::when;

use crate::world::AssemblyWorld;

// =============================================================================
// Field steps
// =============================================================================

fn split_field(world: &mut AssemblyWorld, options: OverflowOptions) {
    let field = world.field.as_ref().expect("No field set up");
    world.split = Some(field.split(&world.values, &options));
    world.options = options;
}

#[when(expr = "the field is split with the marker {string}")]
fn split_with_marker(world: &mut AssemblyWorld, marker: String) {
    split_field(world, OverflowOptions::new().with_marker(marker));
}

#[when(expr = "the field is split keeping line breaks on lines of {int} characters")]
fn split_preserving(world: &mut AssemblyWorld, width: usize) {
    split_field(
        world,
        OverflowOptions::new()
            .with_line_width(width)
            .preserving_line_breaks(true),
    );
}

// =============================================================================
// Document steps
// =============================================================================

#[when(expr = "the {string} render set of {string} is requested")]
fn request_render_set(world: &mut AssemblyWorld, variant: String, identifier: String) {
    let result = world
        .document(&identifier)
        .render_set(&Variant::from(variant), &world.values);
    world.record(result);
}

// =============================================================================
// Bundle steps
// =============================================================================

#[when(expr = "the bundle {string} is flattened")]
fn flatten_bundle(world: &mut AssemblyWorld, identifier: String) {
    let result = world
        .bundle(&identifier)
        .flatten(&Variant::Final, &world.values);
    world.record(result);
}

#[when(expr = "the bundle {string} is combined")]
fn combine_bundle(world: &mut AssemblyWorld, identifier: String) {
    let result = world
        .bundle(&identifier)
        .as_combined_artifact(&Variant::Final, &world.values, &world.renderer)
        .map(|artifact| vec![artifact]);
    world.record(result);
}

#[when(expr = "the bundle {string} is previewed")]
fn preview_bundle(world: &mut AssemblyWorld, identifier: String) {
    let result = world
        .bundle(&identifier)
        .preview_artifact(&world.values, &world.renderer)
        .map(|artifact| vec![artifact]);
    world.record(result);
}

#[when(expr = "the bundle {string} is delivered as a list")]
fn deliver_bundle_as_list(world: &mut AssemblyWorld, identifier: String) {
    let result = world
        .bundle(&identifier)
        .as_artifact_list(&Variant::Final, &world.values, &world.renderer);
    world.record(result);
}
