//! Formatter for HSD documents.
//!
//! Output can be produced straight from the parser's event stream
//! ([`format_source`], [`HsdWriter`]) or from an element tree
//! ([`format_document`], [`format_element`]).

mod options;
mod tree;
mod writer;

pub use options::FormatOptions;
pub use tree::{format_document, format_element};
pub use writer::HsdWriter;

use hsd_parse::{IncludeError, IncludeResolver, Parser};
use hsd_tree::ParseError;


/// Error during formatting.
#[derive(Debug)]
pub enum FormatError {
    /// The document is structurally broken.
    Structural(ParseError),
    /// An include directive could not be resolved.
    Include(IncludeError),
}

impl std::fmt::Display for FormatError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FormatError::Structural(err) => write!(f, "{}", err),
            FormatError::Include(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for FormatError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FormatError::Structural(err) => Some(err),
            FormatError::Include(err) => Some(err),
        }
    }
}

impl From<IncludeError> for FormatError {
    fn from(err: IncludeError) -> Self {
        FormatError::Include(err)
    }
}

/// Reformat an HSD document.
///
/// Includes are resolved relative to the working directory, and their
/// content ends up in the output.
pub fn format_source(source: &str, options: &FormatOptions) -> Result<String, FormatError> {
    let mut parser = Parser::new();
    if let Some(name) = &options.default_attribute {
        parser = parser.with_default_attribute(name.as_str());
    }
    format_source_with(&parser, source, options)
}

/// Reformat an HSD document with a configured parser.
pub fn format_source_with<R: IncludeResolver>(
    parser: &Parser<R>,
    source: &str,
    options: &FormatOptions,
) -> Result<String, FormatError> {
    let mut writer = HsdWriter::with_options(options.clone());
    parser.feed(source, &mut writer)?;
    if let Some((code, lines)) = writer.error() {
        return Err(FormatError::Structural(ParseError::new(code, lines)));
    }
    let mut out = writer.finish();
    if !out.is_empty() {
        out.push('\n');
    }
    Ok(out)
}
