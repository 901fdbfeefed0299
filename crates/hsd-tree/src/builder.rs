//! Tree builder from parse events.

use hsd_parse::{Event, IncludeError, ParseCallback};
use tracing::{trace, warn};

use crate::diagnostic::ParseError;
use crate::value::Element;

/// Name of the synthetic element all top-level tags are nested under.
pub const DEFAULT_ROOT: &str = "hsd";

/// Error during tree building.
#[derive(Debug)]
pub enum BuildError {
    /// The document is structurally broken.
    Structural(Vec<ParseError>),
    /// An include directive could not be resolved.
    Include(IncludeError),
    /// Open and close events did not pair up.
    Unbalanced,
}

impl std::fmt::Display for BuildError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BuildError::Structural(errors) => match errors.as_slice() {
                [single] => write!(f, "{}", single),
                _ => write!(f, "{} structural errors", errors.len()),
            },
            BuildError::Include(err) => write!(f, "{}", err),
            BuildError::Unbalanced => write!(f, "unbalanced open and close events"),
        }
    }
}

impl std::error::Error for BuildError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BuildError::Include(err) => Some(err),
            _ => None,
        }
    }
}

impl From<IncludeError> for BuildError {
    fn from(err: IncludeError) -> Self {
        BuildError::Include(err)
    }
}

/// Builder that constructs an element tree from parse events.
///
/// The bottom of the stack is the synthetic root; every `Open` pushes an
/// element and every `Close` pops it into its parent.
pub struct TreeBuilder {
    stack: Vec<Element>,
    errors: Vec<ParseError>,
    unbalanced: bool,
}

impl TreeBuilder {
    /// Create a builder with the default root name.
    pub fn new() -> Self {
        Self::with_root(DEFAULT_ROOT)
    }

    /// Create a builder whose synthetic root is called `name`.
    pub fn with_root(name: impl Into<String>) -> Self {
        Self {
            stack: vec![Element::new(name)],
            errors: Vec::new(),
            unbalanced: false,
        }
    }

    /// Structural errors seen so far.
    pub fn errors(&self) -> &[ParseError] {
        &self.errors
    }

    /// Finish building and return the root element.
    pub fn finish(mut self) -> Result<Element, BuildError> {
        if !self.errors.is_empty() {
            return Err(BuildError::Structural(self.errors));
        }
        if self.unbalanced || self.stack.len() != 1 {
            return Err(BuildError::Unbalanced);
        }
        self.stack.pop().ok_or(BuildError::Unbalanced)
    }
}

impl Default for TreeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ParseCallback for TreeBuilder {
    fn event(&mut self, event: Event) -> bool {
        match event {
            Event::Open {
                name,
                attributes,
                flags,
            } => {
                trace!(%name, depth = self.stack.len(), "element start");
                self.stack.push(Element {
                    name,
                    attributes,
                    has_equals_form: flags.has_equals_form,
                    start_line: flags.start_line,
                    text: None,
                    children: Vec::new(),
                });
            }

            Event::Close { name } => {
                // The root never closes.
                if self.stack.len() < 2 {
                    warn!(%name, "close without matching open");
                    self.unbalanced = true;
                    return true;
                }
                let Some(element) = self.stack.pop() else {
                    return true;
                };
                if element.name != name {
                    warn!(expected = %element.name, found = %name, "mismatched close");
                    self.unbalanced = true;
                }
                trace!(name = %element.name, "element end");
                if let Some(parent) = self.stack.last_mut() {
                    parent.children.push(element);
                }
            }

            Event::Text { content } => {
                if let Some(current) = self.stack.last_mut() {
                    current.push_text(&content);
                }
            }

            Event::Error { code, lines } => {
                self.errors.push(ParseError::new(code, lines));
            }
        }
        true
    }
}
