//! Event types for the HSD event-based parser.

use crate::{Attributes, LineRange};

/// Events emitted by the parser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// A tag was opened.
    Open {
        /// Tag name, trimmed.
        name: String,
        /// Attributes given in `[...]` before the tag was opened.
        attributes: Attributes,
        /// How the tag was opened.
        flags: OpenFlags,
    },
    /// The innermost open tag was closed.
    Close {
        /// Name of the closed tag.
        name: String,
    },
    /// Text content of the innermost open tag.
    ///
    /// Trimmed at both ends; quoted text keeps its quote characters.
    Text {
        /// The text.
        content: String,
    },
    /// The document is structurally broken.
    ///
    /// Emitted at most once per document, after the input is exhausted.
    Error {
        /// What went wrong.
        code: ErrorCode,
        /// Lines the problem spans.
        lines: LineRange,
    },
}

impl Event {
    /// Shorthand for an `Open` event without attributes.
    pub fn open(name: impl Into<String>, flags: OpenFlags) -> Self {
        Event::Open {
            name: name.into(),
            attributes: Attributes::new(),
            flags,
        }
    }

    /// Shorthand for a `Close` event.
    pub fn close(name: impl Into<String>) -> Self {
        Event::Close { name: name.into() }
    }

    /// Shorthand for a `Text` event.
    pub fn text(content: impl Into<String>) -> Self {
        Event::Text {
            content: content.into(),
        }
    }
}

/// How a tag was opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "facet", derive(facet::Facet))]
pub struct OpenFlags {
    /// Opened with the `name = value` shorthand.
    pub has_equals_form: bool,
    /// Opened as the block of a `name = Other {` form: the `}` closing this
    /// tag also closes its parent.
    pub cascade_close: bool,
    /// Line (zero-based) where the tag was opened.
    pub start_line: usize,
}

impl OpenFlags {
    /// Flags of a block tag `name {` opened on `line`.
    pub fn block(line: usize) -> Self {
        Self {
            start_line: line,
            ..Self::default()
        }
    }

    /// Flags of a `name =` tag opened on `line`.
    pub fn equals(line: usize) -> Self {
        Self {
            has_equals_form: true,
            start_line: line,
            ..Self::default()
        }
    }

    /// Flags of the inner block of `name = Other {` opened on `line`.
    pub fn cascade(line: usize) -> Self {
        Self {
            cascade_close: true,
            start_line: line,
            ..Self::default()
        }
    }
}

/// Structural error codes, checked in this order of priority at end of input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "facet", derive(facet::Facet))]
#[repr(u8)]
pub enum ErrorCode {
    /// A tag was never closed.
    Tag,
    /// A quoted run was never closed.
    Quotation,
    /// Braces or brackets do not balance.
    Bracket,
    /// A tag name is malformed, or something was closed that was never open.
    Syntax,
}

impl ErrorCode {
    /// Numeric code, compatible with existing HSD tooling.
    pub fn code(&self) -> u8 {
        match self {
            ErrorCode::Syntax => 1,
            ErrorCode::Tag => 2,
            ErrorCode::Quotation => 3,
            ErrorCode::Bracket => 4,
        }
    }

    /// Short human-readable description.
    pub fn describe(&self) -> &'static str {
        match self {
            ErrorCode::Tag => "unclosed tag",
            ErrorCode::Quotation => "unclosed quotation",
            ErrorCode::Bracket => "unbalanced brackets",
            ErrorCode::Syntax => "syntax error",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            ErrorCode::Tag => "TAG_ERROR",
            ErrorCode::Quotation => "QUOTATION_ERROR",
            ErrorCode::Bracket => "BRACKET_ERROR",
            ErrorCode::Syntax => "SYNTAX_ERROR",
        })
    }
}
