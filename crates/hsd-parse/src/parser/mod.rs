//! Push-based event parser for HSD.

use tracing::debug;

use crate::{Event, FileResolver, IncludeError, IncludeResolver, ParseCallback};

mod context;
use context::{Abort, Context};


/// Attribute name used for a bare value in `[...]`.
pub const DEFAULT_ATTRIBUTE: &str = "default";

/// How deep `<!` includes may nest before parsing is aborted.
pub const DEFAULT_MAX_INCLUDE_DEPTH: usize = 32;

/// How a successful [`Parser::feed`] ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// The whole input, includes and end-of-input check were processed.
    Finished,
    /// The callback asked to stop.
    Stopped,
}

/// Event-based parser for HSD documents.
///
/// The parser itself only holds configuration; every call to
/// [`feed`](Parser::feed) scans its input with fresh state, so one parser can
/// be reused for many documents.
#[derive(Debug, Clone)]
pub struct Parser<R = FileResolver> {
    default_attribute: String,
    resolver: R,
    max_include_depth: usize,
}

impl Parser<FileResolver> {
    /// Create a parser that resolves includes relative to the working directory.
    pub fn new() -> Self {
        Self {
            default_attribute: DEFAULT_ATTRIBUTE.to_string(),
            resolver: FileResolver::cwd(),
            max_include_depth: DEFAULT_MAX_INCLUDE_DEPTH,
        }
    }
}

impl Default for Parser<FileResolver> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: IncludeResolver> Parser<R> {
    /// Use `name` for bare values in attribute lists (`[Kelvin]`).
    pub fn with_default_attribute(mut self, name: impl Into<String>) -> Self {
        self.default_attribute = name.into();
        self
    }

    /// Limit how deep `<!` includes may nest.
    pub fn with_max_include_depth(mut self, depth: usize) -> Self {
        self.max_include_depth = depth;
        self
    }

    /// Resolve includes with `resolver`.
    pub fn with_resolver<S: IncludeResolver>(self, resolver: S) -> Parser<S> {
        Parser {
            default_attribute: self.default_attribute,
            resolver,
            max_include_depth: self.max_include_depth,
        }
    }

    /// Attribute name used for bare values.
    pub fn default_attribute(&self) -> &str {
        &self.default_attribute
    }

    /// The include resolver.
    pub fn resolver(&self) -> &R {
        &self.resolver
    }

    /// Maximum nesting of `<!` includes.
    pub fn max_include_depth(&self) -> usize {
        self.max_include_depth
    }

    /// Parse `input` and emit events to `callback`.
    ///
    /// Structural problems are reported as a single [`Event::Error`] after the
    /// input is exhausted; they do not make this call fail. Failing to
    /// resolve an include does, immediately, from any nesting depth.
    pub fn feed<C: ParseCallback + ?Sized>(
        &self,
        input: &str,
        callback: &mut C,
    ) -> Result<Completion, IncludeError> {
        debug!(len = input.len(), "feeding document");
        match Context::new(self, 0).run(input, callback) {
            Ok(()) => Ok(Completion::Finished),
            Err(Abort::Stopped) => {
                debug!("parsing stopped by callback");
                Ok(Completion::Stopped)
            }
            Err(Abort::Include(err)) => Err(err),
        }
    }

    /// Convenience: parse and collect all events.
    pub fn parse_to_vec(&self, input: &str) -> Result<Vec<Event>, IncludeError> {
        let mut events = Vec::new();
        self.feed(input, &mut events)?;
        Ok(events)
    }
}
