//! Formatting options for HSD output.

use hsd_parse::DEFAULT_ATTRIBUTE;

/// Options for HSD formatting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatOptions {
    /// Indentation string (default: two spaces)
    pub indent: String,

    /// Write `# name` after closing braces of multi-line blocks (default: false)
    pub close_comments: bool,

    /// Attribute written as a bare `[value]` when it is the only one
    /// (default: `default`). `None` always writes `[name=value]`.
    pub default_attribute: Option<String>,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            indent: "  ".to_string(),
            close_comments: false,
            default_attribute: Some(DEFAULT_ATTRIBUTE.to_string()),
        }
    }
}

impl FormatOptions {
    /// Create new default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a custom indentation string.
    pub fn indent(mut self, indent: impl Into<String>) -> Self {
        self.indent = indent.into();
        self
    }

    /// Annotate closing braces with the name of the closed tag.
    pub fn close_comments(mut self, enabled: bool) -> Self {
        self.close_comments = enabled;
        self
    }

    /// Abbreviate a lone attribute with this name.
    pub fn default_attribute(mut self, name: impl Into<String>) -> Self {
        self.default_attribute = Some(name.into());
        self
    }

    /// Always write attribute names.
    pub fn explicit_attributes(mut self) -> Self {
        self.default_attribute = None;
        self
    }
}
