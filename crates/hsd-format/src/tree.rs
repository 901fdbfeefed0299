//! Rendering of element trees.

use hsd_tree::Element;
use tracing::debug;

use crate::options::FormatOptions;
use crate::writer::HsdWriter;

/// Render `element`, including its own tag.
pub fn format_element(element: &Element, options: &FormatOptions) -> String {
    let mut writer = HsdWriter::with_options(options.clone());
    write_element(&mut writer, element);
    writer.finish()
}

/// Render the content of a document root.
///
/// The root itself (the synthetic `hsd` element of a parsed tree) is not
/// written, only its children. Text directly under the root has no place in
/// a document and is dropped.
pub fn format_document(root: &Element, options: &FormatOptions) -> String {
    let mut writer = HsdWriter::with_options(options.clone());
    for child in &root.children {
        write_element(&mut writer, child);
    }
    let mut out = writer.finish();
    if !out.is_empty() {
        out.push('\n');
    }
    out
}

pub(crate) fn write_element(writer: &mut HsdWriter, element: &Element) {
    let equals_form = element.has_equals_form && fits_equals_form(element);
    if element.has_equals_form && !equals_form {
        debug!(name = %element.name, "writing equals-form element as a block");
    }
    writer.open_tag(&element.name, &element.attributes, equals_form);
    // Children first: text before a child tag would be read back as part of
    // the child's name.
    for child in &element.children {
        write_element(writer, child);
    }
    if let Some(text) = &element.text {
        writer.text(text);
    }
    writer.close_tag(&element.name);
}

/// Whether `name = ...` would read back as the same element.
///
/// That holds for a single-line value, and for exactly one child block
/// (`name = Inner { ... }`).
fn fits_equals_form(element: &Element) -> bool {
    match (element.text.as_deref(), element.children.as_slice()) {
        (None, []) => true,
        (Some(text), []) => !text.contains('\n') || is_single_quoted_run(text),
        (None, [child]) => !child.has_equals_form || !fits_equals_form(child),
        _ => false,
    }
}

fn is_single_quoted_run(text: &str) -> bool {
    let mut chars = text.chars();
    match (chars.next(), chars.next_back()) {
        (Some(open @ ('"' | '\'')), Some(close)) => {
            open == close && !text[1..text.len() - 1].contains(open)
        }
        _ => false,
    }
}
