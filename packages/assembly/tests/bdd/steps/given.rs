//! Given step definitions
//!
//! Steps that set up fields, documents, bundles and answers.

use assembly_engine::{AddendumField, Bundle, BundleMember, Document, FieldRegistry, Value};
use cucumber::{gherkin::Step, given};

use crate::helpers::value_conversion::{parse_list, parse_table_to_records};
use crate::world::AssemblyWorld;

// =============================================================================
// Field steps
// =============================================================================

#[given(expr = "a field {string} with an overflow trigger of {int}")]
fn set_field(world: &mut AssemblyWorld, name: String, trigger: usize) {
    world.field = Some(AddendumField::new(name, trigger).expect("valid trigger"));
}

#[given(expr = "the answer {string} is {string}")]
fn set_text_answer(world: &mut AssemblyWorld, name: String, text: String) {
    world.values.set(name, text);
}

#[given(expr = "the answer {string} is the list {string}")]
fn set_list_answer(world: &mut AssemblyWorld, name: String, items: String) {
    world.values.set(name, parse_list(&items));
}

#[given(expr = "the answer {string} has the records:")]
fn set_record_answer(world: &mut AssemblyWorld, name: String, step: &Step) {
    let table = step.table.as_ref().expect("Step requires a data table");
    world.values.set(name, Value::Array(parse_table_to_records(table)));
}

#[given(expr = "the answer {string} is:")]
fn set_docstring_answer(world: &mut AssemblyWorld, name: String, step: &Step) {
    let text = step.docstring.as_ref().expect("Step requires a doc string");
    world.values.set(name, text.trim().to_string());
}

// =============================================================================
// Document steps
// =============================================================================

fn document(identifier: &str) -> Document {
    Document::new(identifier, identifier.to_uppercase())
        .with_variant("final", format!("{}.pdf", identifier))
        .with_variant("preview", format!("{}-preview.pdf", identifier))
}

fn limited_fields(field: &str, limit: usize) -> FieldRegistry {
    let mut fields = FieldRegistry::new();
    fields.register_field(field, limit).expect("valid trigger");
    fields
}

#[given(expr = "the documents {string}")]
fn set_documents(world: &mut AssemblyWorld, identifiers: String) {
    for identifier in parse_list(&identifiers) {
        world.documents.insert(identifier.clone(), document(&identifier));
    }
}

#[given(
    expr = "a document {string} with an addendum and the field {string} limited to {int} characters"
)]
fn set_document_with_addendum(
    world: &mut AssemblyWorld,
    identifier: String,
    field: String,
    limit: usize,
) {
    let doc = document(&identifier)
        .with_fields(limited_fields(&field, limit))
        .with_overflow_message("...")
        .with_addendum("addendum.pdf");
    world.documents.insert(identifier, doc);
}

#[given(
    expr = "a document {string} without an addendum and the field {string} limited to {int} characters"
)]
fn set_document_without_addendum(
    world: &mut AssemblyWorld,
    identifier: String,
    field: String,
    limit: usize,
) {
    let doc = document(&identifier)
        .with_fields(limited_fields(&field, limit))
        .with_overflow_message("...");
    world.documents.insert(identifier, doc);
}

#[given(
    expr = "a document {string} that needs an addendum but has none, with the field {string} limited to {int} characters"
)]
fn set_document_missing_addendum(
    world: &mut AssemblyWorld,
    identifier: String,
    field: String,
    limit: usize,
) {
    let doc = document(&identifier)
        .with_fields(limited_fields(&field, limit))
        .with_has_addendum(true);
    world.documents.insert(identifier, doc);
}

// =============================================================================
// Bundle steps
// =============================================================================

#[given(expr = "a bundle {string} of {string}")]
fn set_bundle(world: &mut AssemblyWorld, identifier: String, members: String) {
    let mut bundle = Bundle::new(identifier.clone(), format!("Bundle {}", identifier));
    for member in parse_list(&members) {
        let member: BundleMember = if let Some(doc) = world.documents.get(&member) {
            doc.clone().into()
        } else if let Some(nested) = world.bundles.get(&member) {
            nested.clone().into()
        } else {
            panic!("Unknown bundle member '{}'", member);
        };
        bundle.push(member);
    }
    world.bundles.insert(identifier, bundle);
}

#[given(expr = "{string} is disabled")]
fn disable_member(world: &mut AssemblyWorld, identifier: String) {
    let found: usize = world
        .bundles
        .values_mut()
        .map(|bundle| bundle.set_member_enabled(&identifier, false))
        .sum();
    assert!(found > 0, "'{}' is not a member of any bundle", identifier);
}
