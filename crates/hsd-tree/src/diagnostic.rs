//! Diagnostic rendering for structural errors.

use ariadne::{Color, Config, IndexType, Label, Report, ReportKind, Source};
use hsd_parse::{ErrorCode, LineRange};

/// A structural error reported by the parser, with the lines it spans.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "facet", derive(facet::Facet))]
pub struct ParseError {
    /// What went wrong.
    pub code: ErrorCode,
    /// Lines the problem spans.
    pub lines: LineRange,
}

impl ParseError {
    /// Create a new parse error.
    pub fn new(code: ErrorCode, lines: LineRange) -> Self {
        Self { code, lines }
    }

    /// Render this error with ariadne.
    ///
    /// Returns a string containing the formatted error message with source context.
    pub fn render(&self, filename: &str, source: &str) -> String {
        let mut output = Vec::new();
        self.write_report(filename, source, &mut output);
        String::from_utf8(output).unwrap_or_else(|_| format!("{}", self))
    }

    /// Write the error report to a writer.
    pub fn write_report<W: std::io::Write>(&self, filename: &str, source: &str, writer: W) {
        let report = self.build_report(filename, source);
        let _ = report
            .finish()
            .write((filename, Source::from(source)), writer);
    }

    fn build_report<'a>(
        &self,
        filename: &'a str,
        source: &str,
    ) -> ariadne::ReportBuilder<'static, (&'a str, std::ops::Range<usize>)> {
        let range = self.lines.byte_range(source);
        let (label, help) = match self.code {
            ErrorCode::Tag => ("tag opened here is never closed", "add a closing '}'"),
            ErrorCode::Quotation => (
                "quotation starts here",
                "close the quotation with the same quote character",
            ),
            ErrorCode::Bracket => (
                "brackets are unbalanced from here",
                "every '{' needs a '}' and every '[' needs a ']'",
            ),
            ErrorCode::Syntax => (
                "malformed here",
                "tag names are a single word; '}' and ']' need an opening partner",
            ),
        };

        Report::build(ReportKind::Error, (filename, range.clone()))
            .with_config(Config::default().with_index_type(IndexType::Byte))
            .with_code(self.code.code())
            .with_message(self.code.describe())
            .with_label(
                Label::new((filename, range))
                    .with_message(label)
                    .with_color(Color::Red),
            )
            .with_help(help)
    }
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({}) at {}", self.code.describe(), self.code, self.lines)
    }
}

impl std::error::Error for ParseError {}
