//! Per-document scanning state.

use std::mem;

use hsd_scanner::{LineRange, ScanMode, split};
use tracing::{debug, trace, warn};

use super::Parser;
use crate::include::resource_name;
use crate::{Attributes, ErrorCode, Event, IncludeError, IncludeResolver, OpenFlags, ParseCallback, parse_options};

/// Why scanning ended early.
pub(super) enum Abort {
    /// The callback returned `false`.
    Stopped,
    /// An include could not be resolved.
    Include(IncludeError),
}

impl From<IncludeError> for Abort {
    fn from(err: IncludeError) -> Self {
        Abort::Include(err)
    }
}

type Step = Result<(), Abort>;

/// An open tag.
#[derive(Debug)]
struct Frame {
    name: String,
    start_line: usize,
    /// Opened by `name = Other {`: closing it closes the frame below too.
    cascade_close: bool,
}

/// An unterminated quoted run.
#[derive(Debug)]
struct QuoteState {
    quote: char,
    /// Everything since the opening quote, quote included.
    text: String,
    start_line: usize,
    /// Whether the quote sits inside `[...]`.
    in_options: bool,
}

/// An unterminated attribute list.
#[derive(Debug)]
struct OptionState {
    /// Pending text from before the `[`, restored at `]`.
    saved: String,
    saved_quoted: bool,
    /// Raw text since the `[`.
    body: String,
    start_line: usize,
}

/// State of one document being scanned.
///
/// Every top-level feed and every `<!` include gets its own context; only the
/// callback is shared.
pub(super) struct Context<'p, R> {
    parser: &'p Parser<R>,
    /// Include nesting depth of this document.
    depth: usize,

    frames: Vec<Frame>,
    bracket_depth: isize,
    /// Line of the most recent `{`, or of the first `}` without a partner.
    bracket_line: usize,
    /// After `name =`, until the value is closed.
    awaiting_value: bool,

    /// Text not yet turned into a tag name or a text event.
    buffer: String,
    /// Whether `buffer` starts with a quoted run.
    quoted: bool,
    quote: Option<QuoteState>,
    options: Option<OptionState>,
    pending_attributes: Attributes,

    line: usize,
    /// First line where a syntax problem was seen.
    syntax_error: Option<usize>,
}

impl<'p, R: IncludeResolver> Context<'p, R> {
    pub(super) fn new(parser: &'p Parser<R>, depth: usize) -> Self {
        Self {
            parser,
            depth,
            frames: Vec::new(),
            bracket_depth: 0,
            bracket_line: 0,
            awaiting_value: false,
            buffer: String::new(),
            quoted: false,
            quote: None,
            options: None,
            pending_attributes: Attributes::new(),
            line: 0,
            syntax_error: None,
        }
    }

    /// Scan the whole input, then report structural errors.
    pub(super) fn run<C: ParseCallback + ?Sized>(&mut self, input: &str, callback: &mut C) -> Step {
        for line in input.split_inclusive('\n') {
            self.scan_line(line, callback)?;
            self.line += 1;
        }
        self.finish(callback)
    }

    /// Characters the scanner stops at right now.
    fn mode(&self) -> ScanMode {
        match (&self.quote, &self.options) {
            (Some(quote), _) => ScanMode::Quote(quote.quote),
            (None, Some(_)) => ScanMode::Options,
            (None, None) => ScanMode::TopLevel,
        }
    }

    fn scan_line<C: ParseCallback + ?Sized>(&mut self, line: &str, callback: &mut C) -> Step {
        let mut rest = line;
        loop {
            let mode = self.mode();
            let parts = split(rest, mode);
            let Some(c) = parts.found else {
                return self.end_of_line(parts.before, callback);
            };
            let before = parts.before;
            rest = parts.after;
            trace!(line = self.line, ?mode, found = ?c, before, "significant character");

            match mode {
                ScanMode::Quote(_) => self.close_quote(before, c),
                ScanMode::Options => self.option_char(before, c),
                ScanMode::TopLevel => match c {
                    '=' => {
                        // `name = {` is an ordinary block.
                        if rest.trim_start().starts_with('{') {
                            self.buffer.push_str(before);
                        } else {
                            self.open(before, OpenFlags::equals(self.line), callback)?;
                            self.awaiting_value = true;
                        }
                    }
                    '{' => {
                        let flags = if self.awaiting_value {
                            OpenFlags::cascade(self.line)
                        } else {
                            OpenFlags::block(self.line)
                        };
                        self.awaiting_value = false;
                        self.open(before, flags, callback)?;
                        self.bracket_depth += 1;
                        self.bracket_line = self.line;
                    }
                    '}' => {
                        self.flush(before, callback)?;
                        self.close(callback)?;
                        if self.bracket_depth == 0 {
                            self.bracket_line = self.line;
                        }
                        self.bracket_depth -= 1;
                    }
                    ';' => {
                        self.awaiting_value = false;
                        self.flush(before, callback)?;
                        self.close(callback)?;
                    }
                    '#' => {
                        // The comment runs to the end of the line; its line
                        // break still separates text.
                        self.buffer.push_str(before);
                        rest = line_break(rest);
                    }
                    '[' => {
                        let mut saved = mem::take(&mut self.buffer);
                        saved.push_str(before);
                        self.options = Some(OptionState {
                            saved,
                            saved_quoted: mem::take(&mut self.quoted),
                            body: String::new(),
                            start_line: self.line,
                        });
                    }
                    '\'' | '"' => {
                        self.buffer.push_str(before);
                        self.open_quote(c, false);
                    }
                    '<' if rest.starts_with('<') => {
                        self.buffer.push_str(before);
                        let text = self.resolve(&rest[1..])?;
                        self.buffer.push_str(&text);
                        return self.end_of_line("", callback);
                    }
                    '<' if rest.starts_with('!') => {
                        self.buffer.push_str(before);
                        self.include_document(&rest[1..], callback)?;
                        return self.end_of_line("", callback);
                    }
                    _ => {
                        // A lone `<`, or `]` without `[`.
                        if c == ']' {
                            self.flag_syntax("`]` without matching `[`");
                        }
                        self.buffer.push_str(before);
                        self.buffer.push(c);
                    }
                },
            }
        }
    }

    /// Handle the unstructured rest of a line.
    fn end_of_line<C: ParseCallback + ?Sized>(&mut self, before: &str, callback: &mut C) -> Step {
        if let Some(quote) = &mut self.quote {
            quote.text.push_str(before);
        } else if let Some(options) = &mut self.options {
            options.body.push_str(before);
        } else if self.awaiting_value {
            // `name = value` ends with its line.
            self.awaiting_value = false;
            self.flush(before, callback)?;
            self.close(callback)?;
        } else if self.bracket_depth > 0 {
            self.buffer.push_str(before);
        }
        Ok(())
    }

    fn option_char(&mut self, before: &str, c: char) {
        let Some(options) = &mut self.options else {
            return;
        };
        options.body.push_str(before);
        match c {
            ']' => {
                if let Some(options) = self.options.take() {
                    self.pending_attributes =
                        parse_options(&options.body, &self.parser.default_attribute);
                    self.buffer = options.saved;
                    self.quoted = options.saved_quoted;
                }
            }
            '\'' | '"' => self.open_quote(c, true),
            _ => options.body.push(c),
        }
    }

    fn open_quote(&mut self, quote: char, in_options: bool) {
        self.quote = Some(QuoteState {
            quote,
            text: quote.to_string(),
            start_line: self.line,
            in_options,
        });
    }

    fn close_quote(&mut self, before: &str, c: char) {
        let Some(mut quote) = self.quote.take() else {
            return;
        };
        quote.text.push_str(before);
        quote.text.push(c);
        if quote.in_options {
            if let Some(options) = &mut self.options {
                options.body.push_str(&quote.text);
            }
            return;
        }
        // Quoted text wins over plain text buffered before it.
        if !self.quoted {
            self.buffer.clear();
            self.quoted = true;
        }
        self.buffer.push_str(&quote.text);
    }

    /// Open a tag named by the buffered text plus `before`.
    fn open<C: ParseCallback + ?Sized>(&mut self, before: &str, flags: OpenFlags, callback: &mut C) -> Step {
        self.buffer.push_str(before);
        let name = self.take_buffer().trim().to_string();
        if name.split_whitespace().nth(1).is_some() {
            self.flag_syntax("tag name contains whitespace");
        }
        let attributes = mem::take(&mut self.pending_attributes);
        debug!(%name, ?flags, "open");
        self.emit(
            callback,
            Event::Open {
                name: name.clone(),
                attributes,
                flags,
            },
        )?;
        self.frames.push(Frame {
            name,
            start_line: flags.start_line,
            cascade_close: flags.cascade_close,
        });
        Ok(())
    }

    /// Close the innermost tag, and its parent if it was a cascade frame.
    fn close<C: ParseCallback + ?Sized>(&mut self, callback: &mut C) -> Step {
        self.take_buffer();
        loop {
            let Some(frame) = self.frames.pop() else {
                self.flag_syntax("closing a tag that was never opened");
                return Ok(());
            };
            debug!(name = %frame.name, "close");
            self.emit(callback, Event::Close { name: frame.name })?;
            if !frame.cascade_close {
                return Ok(());
            }
        }
    }

    /// Emit the buffered text plus `before` as a text event, if not blank.
    fn flush<C: ParseCallback + ?Sized>(&mut self, before: &str, callback: &mut C) -> Step {
        self.buffer.push_str(before);
        let text = self.take_buffer();
        let content = text.trim();
        if content.is_empty() {
            return Ok(());
        }
        self.emit(
            callback,
            Event::Text {
                content: content.to_string(),
            },
        )
    }

    fn take_buffer(&mut self) -> String {
        self.quoted = false;
        mem::take(&mut self.buffer)
    }

    /// `<<name`: the raw text of a resource.
    fn resolve(&self, command: &str) -> Result<String, IncludeError> {
        let name = resource_name(command);
        debug!(name, "raw include");
        self.parser.resolver.resolve(name)
    }

    /// `<!name`: parse a resource as HSD into the same callback.
    fn include_document<C: ParseCallback + ?Sized>(&mut self, command: &str, callback: &mut C) -> Step {
        let name = resource_name(command);
        if self.depth >= self.parser.max_include_depth {
            return Err(IncludeError::TooDeep {
                name: name.to_string(),
                limit: self.parser.max_include_depth,
            }
            .into());
        }
        let text = self.parser.resolver.resolve(name)?;
        debug!(name, depth = self.depth + 1, "document include");
        Context::new(self.parser, self.depth + 1).run(&text, callback)
    }

    fn flag_syntax(&mut self, reason: &str) {
        warn!(line = self.line, reason, "syntax problem");
        self.syntax_error.get_or_insert(self.line);
    }

    /// End-of-input check: report the first structural problem, if any.
    fn finish<C: ParseCallback + ?Sized>(&mut self, callback: &mut C) -> Step {
        let end = self.line;
        let error = if let Some(frame) = self.frames.last() {
            Some((ErrorCode::Tag, frame.start_line))
        } else if let Some(quote) = &self.quote {
            Some((ErrorCode::Quotation, quote.start_line))
        } else if let Some(options) = &self.options {
            Some((ErrorCode::Bracket, options.start_line))
        } else if self.bracket_depth != 0 {
            Some((ErrorCode::Bracket, self.bracket_line))
        } else {
            self.syntax_error.map(|line| (ErrorCode::Syntax, line))
        };

        let Some((code, start)) = error else {
            return Ok(());
        };
        let lines = match code {
            ErrorCode::Syntax => LineRange::line(start),
            _ => LineRange::new(start, end),
        };
        warn!(%code, %lines, "structural error");
        self.emit(callback, Event::Error { code, lines })
    }

    fn emit<C: ParseCallback + ?Sized>(&self, callback: &mut C, event: Event) -> Step {
        if callback.event(event) {
            Ok(())
        } else {
            Err(Abort::Stopped)
        }
    }
}

/// The line break ending `rest`, if any.
fn line_break(rest: &str) -> &str {
    if rest.ends_with("\r\n") {
        "\r\n"
    } else if rest.ends_with('\n') {
        "\n"
    } else {
        ""
    }
}
