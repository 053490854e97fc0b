//! Then step definitions
//!
//! Steps that verify outcomes and assertions.

use assembly_engine::{Value, ValueShape};
use cucumber::{gherkin::Step, then};

use crate::helpers::value_conversion::parse_list;
use crate::world::AssemblyWorld;

fn list_value(items: &str) -> Value {
    Value::from(parse_list(items))
}

// =============================================================================
// Field steps
// =============================================================================

fn split(world: &AssemblyWorld) -> &assembly_engine::Split {
    world.split.as_ref().expect("No field was split")
}

#[then(expr = "the safe value is {string}")]
fn assert_safe_value(world: &mut AssemblyWorld, expected: String) {
    assert_eq!(split(world).safe, Value::from(expected));
}

#[then(expr = "the overflow value is {string}")]
fn assert_overflow_value(world: &mut AssemblyWorld, expected: String) {
    assert_eq!(split(world).overflow, Value::from(expected));
}

#[then(expr = "the safe value is the list {string}")]
fn assert_safe_list(world: &mut AssemblyWorld, expected: String) {
    assert_eq!(split(world).safe, list_value(&expected));
}

#[then(expr = "the overflow value is the list {string}")]
fn assert_overflow_list(world: &mut AssemblyWorld, expected: String) {
    assert_eq!(split(world).overflow, list_value(&expected));
}

#[then("the overflow value is empty")]
fn assert_overflow_empty(world: &mut AssemblyWorld) {
    let split = split(world);
    assert!(
        split.overflow.is_empty(),
        "Expected no overflow, got {:?}",
        split.overflow
    );
    assert!(!split.has_overflow());
}

#[then("the value is reported as undefined")]
fn assert_undefined(world: &mut AssemblyWorld) {
    assert_eq!(split(world).shape, ValueShape::Undefined);
}

#[then("the safe value is:")]
fn assert_safe_docstring(world: &mut AssemblyWorld, step: &Step) {
    let expected = step.docstring.as_ref().expect("Step requires a doc string");
    assert_eq!(split(world).safe, Value::from(expected.trim()));
}

#[then("the overflow markdown is:")]
fn assert_overflow_markdown(world: &mut AssemblyWorld, step: &Step) {
    let expected = step.docstring.as_ref().expect("Step requires a doc string");
    let field = world.field.as_ref().expect("No field set up");
    let markdown = field.overflow_as_markdown(&world.values, &world.options);
    pretty_assertions::assert_eq!(markdown.trim(), expected.trim());
}

// =============================================================================
// Assembly steps
// =============================================================================

#[then(expr = "the artifacts are {string}")]
fn assert_artifacts(world: &mut AssemblyWorld, expected: String) {
    assert!(
        world.error.is_none(),
        "Expected successful assembly, got error: {:?}",
        world.error_message()
    );
    assert_eq!(world.artifact_names(), parse_list(&expected));
}

#[then(expr = "the artifact {string} consists of {string}")]
fn assert_combined(world: &mut AssemblyWorld, name: String, parts: String) {
    assert!(
        world.error.is_none(),
        "Expected successful assembly, got error: {:?}",
        world.error_message()
    );
    assert_eq!(world.artifacts.len(), 1, "Expected one combined artifact");
    let artifact = &world.artifacts[0];
    assert_eq!(artifact.name, name);
    assert_eq!(artifact.parts, parse_list(&parts));
}

#[then(expr = "assembly fails with an error mentioning {string}")]
fn assert_error(world: &mut AssemblyWorld, fragment: String) {
    let error = world.error.as_ref().expect("Expected assembly to fail");
    assert!(error.is_configuration_error(), "Unexpected error kind: {}", error);
    assert!(
        error.to_string().contains(&fragment),
        "Expected error mentioning '{}', got '{}'",
        fragment,
        error
    );
}
