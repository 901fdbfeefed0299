//! Event-driven HSD output writer.
//!
//! [`HsdWriter`] renders the event stream of the parser (or of a tree walk)
//! as it arrives, so a document can be reformatted without building a tree.
//! Only equals-form tags are held back until they close, since whether
//! `name = ...` reads back depends on everything inside them.

use hsd_parse::{Attributes, ErrorCode, Event, LineRange, ParseCallback};
use hsd_tree::Element;
use tracing::trace;

use crate::options::FormatOptions;
use crate::tree::write_element;

/// What the writer emitted most recently.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Last {
    Nothing,
    Open,
    Close,
    Text,
}

/// Writes HSD text from parse events.
///
/// Blocks are written as `name [attrs] {` with their content indented,
/// equals-form tags as `name = value`. Text is written verbatim on its own
/// line inside blocks, without indentation, so multi-line data keeps its
/// layout. An equals-form tag whose content would not read back as a single
/// value is written as a block instead.
pub struct HsdWriter {
    out: String,
    options: FormatOptions,
    first_tag: bool,
    indent: String,
    /// Indentation to restore when the tag at each level closes.
    saved_indents: Vec<String>,
    /// Whether each open tag (and the root at the bottom) uses equals form.
    equals: Vec<bool>,
    last: Last,
    before_last: Last,
    /// Equals-form subtree collected from events, outermost first.
    pending: Vec<Element>,
    error: Option<(ErrorCode, LineRange)>,
}

impl HsdWriter {
    /// Create a new writer with default options.
    pub fn new() -> Self {
        Self::with_options(FormatOptions::default())
    }

    /// Create a new writer with the given options.
    pub fn with_options(options: FormatOptions) -> Self {
        Self {
            out: String::new(),
            options,
            first_tag: true,
            indent: String::new(),
            saved_indents: Vec::new(),
            equals: vec![false],
            last: Last::Nothing,
            before_last: Last::Nothing,
            pending: Vec::new(),
            error: None,
        }
    }

    /// The structural error that stopped the writer, if any.
    pub fn error(&self) -> Option<(ErrorCode, LineRange)> {
        self.error
    }

    /// Consume the writer and return the output written so far.
    pub fn finish(self) -> String {
        self.out
    }

    /// Start a tag.
    pub fn open_tag(&mut self, name: &str, attributes: &Attributes, equals_form: bool) {
        let parent_equals = self.in_equals();
        if self.first_tag {
            self.first_tag = false;
            self.out.push_str(&self.indent);
        } else if !parent_equals {
            self.out.push('\n');
            self.out.push_str(&self.indent);
        }
        self.out.push_str(name);
        self.write_attributes(attributes);
        self.out.push_str(if equals_form { " = " } else { " {" });

        self.equals.push(equals_form);
        self.saved_indents.push(self.indent.clone());
        if !equals_form {
            self.indent.push_str(&self.options.indent);
        }
        self.advance(Last::Open);
    }

    /// Close the innermost tag.
    pub fn close_tag(&mut self, name: &str) {
        if let Some(indent) = self.saved_indents.pop() {
            self.indent = indent;
        }
        if !self.in_equals() {
            if self.last == Last::Open {
                self.out.push('}');
            } else {
                self.out.push('\n');
                self.out.push_str(&self.indent);
                self.out.push('}');
                if self.options.close_comments {
                    self.out.push_str(" # ");
                    self.out.push_str(name);
                }
            }
        } else if self.options.close_comments
            && self.last == Last::Close
            && self.before_last != Last::Open
        {
            // Extends the comment of the block this tag wraps.
            self.out.push_str(", ");
            self.out.push_str(name);
        }
        if self.equals.len() > 1 {
            self.equals.pop();
        }
        self.advance(Last::Close);
    }

    /// Add text to the innermost tag.
    pub fn text(&mut self, text: &str) {
        if !self.in_equals() {
            self.out.push('\n');
        }
        self.out.push_str(text);
        self.advance(Last::Text);
    }

    fn write_attributes(&mut self, attributes: &Attributes) {
        if attributes.is_empty() {
            return;
        }
        let lone_default = self
            .options
            .default_attribute
            .as_deref()
            .and_then(|name| attributes.only(name));
        self.out.push_str(" [");
        match lone_default {
            Some(value) => self.out.push_str(value),
            None => {
                for (i, attribute) in attributes.iter().enumerate() {
                    if i > 0 {
                        self.out.push_str(", ");
                    }
                    self.out.push_str(&attribute.name);
                    self.out.push('=');
                    self.out.push_str(&attribute.value);
                }
            }
        }
        self.out.push(']');
    }

    fn in_equals(&self) -> bool {
        self.equals.last().copied().unwrap_or(false)
    }

    fn advance(&mut self, last: Last) {
        self.before_last = self.last;
        self.last = last;
    }
}

impl Default for HsdWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl ParseCallback for HsdWriter {
    fn event(&mut self, event: Event) -> bool {
        match event {
            Event::Open {
                name,
                attributes,
                flags,
            } => {
                if flags.has_equals_form || !self.pending.is_empty() {
                    let mut element = Element::new(name);
                    element.attributes = attributes;
                    element.has_equals_form = flags.has_equals_form;
                    element.start_line = flags.start_line;
                    self.pending.push(element);
                } else {
                    self.open_tag(&name, &attributes, false);
                }
            }
            Event::Close { name } => match self.pending.pop() {
                Some(element) => match self.pending.last_mut() {
                    Some(parent) => parent.children.push(element),
                    None => write_element(self, &element),
                },
                None => self.close_tag(&name),
            },
            Event::Text { content } => match self.pending.last_mut() {
                Some(element) => element.push_text(&content),
                None => self.text(&content),
            },
            Event::Error { code, lines } => {
                // Output of a broken document would not mean the same thing.
                trace!(%code, %lines, "stopping at structural error");
                self.error = Some((code, lines));
                return false;
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use facet_testhelpers::test;
    use hsd_parse::OpenFlags;

    fn write(events: Vec<Event>, options: FormatOptions) -> String {
        let mut writer = HsdWriter::with_options(options);
        for event in events {
            assert!(writer.event(event));
        }
        writer.finish()
    }

    fn open(name: &str) -> Event {
        Event::open(name, OpenFlags::block(0))
    }

    fn open_eq(name: &str) -> Event {
        Event::open(name, OpenFlags::equals(0))
    }

    fn open_attrs(name: &str, attributes: &[(&str, &str)], flags: OpenFlags) -> Event {
        Event::Open {
            name: name.to_string(),
            attributes: attributes.iter().copied().collect(),
            flags,
        }
    }

    #[test]
    fn test_empty_block() {
        let out = write(vec![open("test"), Event::close("test")], FormatOptions::new());
        assert_eq!(out, "test {}");
    }

    #[test]
    fn test_block_with_text() {
        let out = write(
            vec![open("test"), Event::text("12"), Event::close("test")],
            FormatOptions::new(),
        );
        assert_eq!(out, "test {\n12\n}");
    }

    #[test]
    fn test_equals_form() {
        let out = write(
            vec![open_eq("test"), Event::text("12"), Event::close("test")],
            FormatOptions::new(),
        );
        assert_eq!(out, "test = 12");
    }

    #[test]
    fn test_equals_form_wrapping_block() {
        let out = write(
            vec![
                open_eq("Geometry"),
                Event::open("GenFormat", OpenFlags::cascade(0)),
                Event::text("2  S\n  Ga As"),
                Event::close("GenFormat"),
                Event::close("Geometry"),
            ],
            FormatOptions::new(),
        );
        assert_eq!(out, "Geometry = GenFormat {\n2  S\n  Ga As\n}");
    }

    #[test]
    fn test_equals_form_with_several_tags_becomes_block() {
        let out = write(
            vec![
                open_eq("Mixer"),
                open_eq("a"),
                Event::text("1"),
                Event::close("a"),
                open_eq("b"),
                Event::text("2"),
                Event::close("b"),
                Event::close("Mixer"),
                open_eq("Next"),
                Event::text("3"),
                Event::close("Next"),
            ],
            FormatOptions::new(),
        );
        assert_eq!(out, "Mixer {\n  a = 1\n  b = 2\n}\nNext = 3");
    }

    #[test]
    fn test_equals_form_with_multiline_text_becomes_block() {
        let out = write(
            vec![
                open("Outer"),
                open_eq("Data"),
                Event::text("1 2\n3 4"),
                Event::close("Data"),
                Event::close("Outer"),
            ],
            FormatOptions::new(),
        );
        assert_eq!(out, "Outer {\n  Data {\n1 2\n3 4\n  }\n}");
    }

    #[test]
    fn test_default_attribute_is_abbreviated() {
        let events = vec![
            open_attrs("test", &[("option", "value")], OpenFlags::block(0)),
            Event::close("test"),
            open_attrs("temperature", &[("default", "kelvin")], OpenFlags::equals(1)),
            Event::text("300"),
            Event::close("temperature"),
        ];
        let out = write(events, FormatOptions::new());
        assert_eq!(out, "test [option=value] {}\ntemperature [kelvin] = 300");
    }

    #[test]
    fn test_custom_default_attribute() {
        let events = vec![
            open_attrs("test", &[("unit", "value")], OpenFlags::block(0)),
            Event::text("12"),
            Event::close("test"),
        ];
        let out = write(events, FormatOptions::new().default_attribute("unit"));
        assert_eq!(out, "test [value] {\n12\n}");
    }

    #[test]
    fn test_several_attributes() {
        let events = vec![
            open_attrs(
                "test",
                &[("unit", "Kelvin"), ("dimension", "3")],
                OpenFlags::block(0),
            ),
            Event::close("test"),
        ];
        let out = write(events, FormatOptions::new().default_attribute("unit"));
        assert_eq!(out, "test [unit=Kelvin, dimension=3] {}");
    }

    #[test]
    fn test_explicit_attributes() {
        let events = vec![
            open_attrs("t", &[("default", "K")], OpenFlags::equals(0)),
            Event::text("1"),
            Event::close("t"),
        ];
        let out = write(events, FormatOptions::new().explicit_attributes());
        assert_eq!(out, "t [default=K] = 1");
    }

    #[test]
    fn test_nested_indentation() {
        let events = vec![
            open("a"),
            open("b"),
            open_eq("c"),
            Event::text("1"),
            Event::close("c"),
            Event::close("b"),
            open("d"),
            Event::close("d"),
            Event::close("a"),
        ];
        let out = write(events, FormatOptions::new().indent("    "));
        insta::assert_snapshot!(out, @r"
        a {
            b {
                c = 1
            }
            d {}
        }
        ");
    }

    #[test]
    fn test_close_comments() {
        let events = vec![
            open_eq("Geometry"),
            Event::open("GenFormat", OpenFlags::cascade(0)),
            Event::text("2 S"),
            Event::close("GenFormat"),
            Event::close("Geometry"),
            open("Options"),
            open("Empty"),
            Event::close("Empty"),
            Event::close("Options"),
        ];
        let out = write(events, FormatOptions::new().close_comments(true));
        insta::assert_snapshot!(out, @r"
        Geometry = GenFormat {
        2 S
        } # GenFormat, Geometry
        Options {
          Empty {}
        } # Options
        ");
    }

    #[test]
    fn test_error_stops_writer() {
        let mut writer = HsdWriter::new();
        assert!(writer.event(open("a")));
        assert!(!writer.event(Event::Error {
            code: ErrorCode::Tag,
            lines: LineRange::new(0, 1),
        }));
        assert_eq!(writer.error(), Some((ErrorCode::Tag, LineRange::new(0, 1))));
    }
}
