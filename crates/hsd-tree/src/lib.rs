//! Element tree for HSD documents.
//!
//! This crate builds an [`Element`] tree from the event stream of
//! [`hsd_parse`], and renders structural errors as readable diagnostics.

mod builder;
mod diagnostic;
mod value;

pub use builder::{BuildError, DEFAULT_ROOT, TreeBuilder};
pub use diagnostic::ParseError;
pub use hsd_parse::{Attribute, Attributes, ErrorCode, LineRange};
pub use value::Element;

use hsd_parse::{IncludeResolver, Parser};

#[cfg(test)]
mod tests;

/// Parse an HSD document into a tree.
///
/// Includes are resolved relative to the working directory.
pub fn parse(source: &str) -> Result<Element, BuildError> {
    parse_with(&Parser::new(), source)
}

/// Parse an HSD document into a tree with a configured parser.
pub fn parse_with<R: IncludeResolver>(parser: &Parser<R>, source: &str) -> Result<Element, BuildError> {
    let mut builder = TreeBuilder::new();
    parser.feed(source, &mut builder)?;
    builder.finish()
}
