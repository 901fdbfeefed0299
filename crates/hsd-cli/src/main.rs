//! HSD CLI tool
//!
//! Disambiguation heuristic:
//!   If arg contains '.' or '/' → file mode
//!   If arg is '-' → stdin (file mode)
//!   Otherwise → subcommand mode
//!
//! Examples:
//!   hsd dftb_in.hsd               - format to stdout (has '.')
//!   hsd -                         - format stdin
//!   hsd events dftb_in.hsd        - print parser events
//!   hsd tree dftb_in.hsd          - print element tree
//!   hsd check dftb_in.hsd         - exit code only

use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use facet::Facet;
use figue as args;
use hsd_format::{FormatError, FormatOptions, format_source_with};
use hsd_parse::{Event, FileResolver, IncludeError, ParseCallback, Parser};
use hsd_tree::{BuildError, Element, ParseError, TreeBuilder};
use tracing::debug;
use tracing_subscriber::EnvFilter;

// ============================================================================
// Exit codes
// ============================================================================

const EXIT_SUCCESS: i32 = 0;
const EXIT_SYNTAX_ERROR: i32 = 1;
const EXIT_IO_ERROR: i32 = 3;

// ============================================================================
// CLI argument structures
// ============================================================================

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Environment variable holding the log filter.
const LOG_ENV: &str = "HSD_LOG";

/// File mode arguments: `hsd <file> [options]`
#[derive(Facet, Debug, Default)]
struct FileArgs {
    /// Input file path (or "-" for stdin)
    #[facet(args::positional)]
    input: String,

    /// Output to file
    #[facet(args::named, args::short = 'o', default)]
    output: Option<String>,

    /// Modify input file in place
    #[facet(args::named, default)]
    in_place: bool,

    /// Annotate closing braces with the tag name
    #[facet(args::named, default)]
    close_comments: bool,

    /// Attribute name for bare values in `[...]`
    #[facet(args::named, default)]
    default_attribute: Option<String>,
}

/// Top-level CLI with optional subcommand
#[derive(Facet, Debug)]
struct Args {
    /// Show version
    #[facet(args::named, args::short = 'V', default)]
    version: bool,

    /// Subcommand to run
    #[facet(args::subcommand, default)]
    command: Option<Command>,
}

/// Available subcommands
#[derive(Facet, Debug)]
#[repr(u8)]
enum Command {
    /// Print the parser's event stream
    Events {
        /// One JSON object per line
        #[facet(args::named, default)]
        json: bool,

        /// Attribute name for bare values in `[...]`
        #[facet(args::named, default)]
        default_attribute: Option<String>,

        /// Input file
        #[facet(args::positional)]
        file: String,
    },

    /// Print the element tree
    Tree {
        /// Attribute name for bare values in `[...]`
        #[facet(args::named, default)]
        default_attribute: Option<String>,

        /// Input file
        #[facet(args::positional)]
        file: String,
    },

    /// Check a document for structural errors
    Check {
        /// Input file
        #[facet(args::positional)]
        file: String,
    },
}

// ============================================================================
// Main entry point
// ============================================================================

/// Determines if an argument should be treated as a file path.
///
/// Returns true if the argument:
/// - Contains '.' (e.g., dftb_in.hsd)
/// - Contains '/' (e.g., ./input, ../path, /absolute/path)
/// - Is exactly '-' (stdin)
fn is_file_arg(arg: &str) -> bool {
    arg == "-" || arg.contains('.') || arg.contains('/')
}

fn main() {
    init_logging();
    let raw_args: Vec<String> = std::env::args().skip(1).collect();

    if raw_args.is_empty() {
        print_help();
        std::process::exit(EXIT_SUCCESS);
    }

    if raw_args[0] == "--version" || raw_args[0] == "-V" {
        println!("hsd {VERSION}");
        std::process::exit(EXIT_SUCCESS);
    }

    if raw_args[0] == "--help" || raw_args[0] == "-h" {
        print_help();
        std::process::exit(EXIT_SUCCESS);
    }

    let result = if is_file_arg(&raw_args[0]) {
        run_file_mode(&raw_args)
    } else {
        run_subcommand_mode(&raw_args)
    };

    match result {
        Ok(()) => std::process::exit(EXIT_SUCCESS),
        Err(e) => {
            match &e {
                CliError::Structural {
                    errors,
                    source,
                    filename,
                } => {
                    for error in errors {
                        error.write_report(filename, source, io::stderr());
                    }
                }
                _ => {
                    eprintln!("error: {e}");
                }
            }
            std::process::exit(e.exit_code());
        }
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("error"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn print_help() {
    eprintln!("hsd {VERSION} - command-line tool for HSD input files\n");
    eprintln!("USAGE:");
    eprintln!("    hsd <file> [options]            Format an HSD file");
    eprintln!("    hsd <command> [args]            Run a subcommand\n");
    eprintln!("    Files are detected by '.' or '/' in the name, or '-' for stdin.");
    eprintln!("    Bare words (e.g., 'events', 'tree') are subcommands.\n");
    eprintln!("FILE MODE OPTIONS:");
    eprintln!("    -o, --output <FILE>             Output to file");
    eprintln!("        --in-place                  Modify input file in place");
    eprintln!("        --close-comments            Write '# name' after closing braces");
    eprintln!("        --default-attribute <NAME>  Attribute name for bare values\n");
    eprintln!("SUBCOMMANDS:");
    eprintln!("    events <file> [--json]          Print parser events");
    eprintln!("    tree <file>                     Print element tree");
    eprintln!("    check <file>                    Check for structural errors\n");
    eprintln!("ENVIRONMENT:");
    eprintln!("    {LOG_ENV}                         Log filter (e.g. 'debug', 'hsd_parse=trace')\n");
    eprintln!("EXAMPLES:");
    eprintln!("    hsd dftb_in.hsd                 Format and print to stdout");
    eprintln!("    hsd dftb_in.hsd --in-place      Format file in place");
    eprintln!("    hsd events dftb_in.hsd --json   Dump events as JSON lines");
}

fn run_file_mode(args: &[String]) -> Result<(), CliError> {
    let args_strs: Vec<&str> = args.iter().map(|s| s.as_str()).collect();
    let opts: FileArgs =
        figue::from_slice(&args_strs).map_err(|e| CliError::Usage(e.to_string()))?;

    if opts.in_place && opts.input == "-" {
        return Err(CliError::Usage(
            "--in-place cannot be used with stdin".into(),
        ));
    }

    if let Some(ref output) = opts.output
        && opts.input != "-"
        && output != "-"
        && is_same_file(&opts.input, output)
    {
        return Err(CliError::Usage(
            "input and output are the same file\nhint: use --in-place to modify in place".into(),
        ));
    }

    let source = read_input(Some(&opts.input))?;
    let filename = display_name(&opts.input);
    let parser = parser_for(&opts.input, opts.default_attribute.as_deref());

    let mut format_opts = FormatOptions::default().close_comments(opts.close_comments);
    if let Some(name) = &opts.default_attribute {
        format_opts = format_opts.default_attribute(name.as_str());
    }

    let output = format_source_with(&parser, &source, &format_opts).map_err(|e| match e {
        FormatError::Structural(error) => CliError::Structural {
            errors: vec![error],
            source: source.clone(),
            filename: filename.clone(),
        },
        FormatError::Include(err) => CliError::Include(err),
    })?;

    if opts.in_place {
        std::fs::write(&opts.input, &output)?;
    } else if let Some(ref out_path) = opts.output {
        write_output(out_path, &output)?;
    } else {
        print!("{output}");
    }

    Ok(())
}

fn run_subcommand_mode(args: &[String]) -> Result<(), CliError> {
    let args_strs: Vec<&str> = args.iter().map(|s| s.as_str()).collect();
    let parsed: Args = figue::from_slice(&args_strs).map_err(|e| CliError::Usage(e.to_string()))?;

    if parsed.version {
        println!("hsd {VERSION}");
        return Ok(());
    }

    match parsed.command {
        Some(Command::Events {
            json,
            default_attribute,
            file,
        }) => run_events(&file, json, default_attribute.as_deref()),
        Some(Command::Tree {
            default_attribute,
            file,
        }) => run_tree(&file, default_attribute.as_deref()),
        Some(Command::Check { file }) => run_check(&file),
        None => {
            print_help();
            Ok(())
        }
    }
}

// ============================================================================
// Error handling
// ============================================================================

#[derive(Debug)]
enum CliError {
    Io(io::Error),
    Include(IncludeError),
    Structural {
        errors: Vec<ParseError>,
        source: String,
        filename: String,
    },
    Usage(String),
}

impl CliError {
    fn exit_code(&self) -> i32 {
        match self {
            CliError::Io(_) => EXIT_IO_ERROR,
            CliError::Include(_) => EXIT_IO_ERROR,
            CliError::Structural { .. } => EXIT_SYNTAX_ERROR,
            CliError::Usage(_) => EXIT_SYNTAX_ERROR,
        }
    }

    fn from_build(error: BuildError, source: &str, filename: &str) -> Self {
        match error {
            BuildError::Structural(errors) => CliError::Structural {
                errors,
                source: source.to_string(),
                filename: filename.to_string(),
            },
            BuildError::Include(err) => CliError::Include(err),
            BuildError::Unbalanced => CliError::Usage(BuildError::Unbalanced.to_string()),
        }
    }
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Io(e) => write!(f, "{e}"),
            CliError::Include(e) => write!(f, "{e}"),
            CliError::Structural { errors, filename, .. } => match errors.as_slice() {
                [single] => write!(f, "{filename}: {single}"),
                _ => write!(f, "{filename}: {} structural errors", errors.len()),
            },
            CliError::Usage(e) => write!(f, "{e}"),
        }
    }
}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        CliError::Io(e)
    }
}

impl From<IncludeError> for CliError {
    fn from(e: IncludeError) -> Self {
        CliError::Include(e)
    }
}

// ============================================================================
// Subcommands
// ============================================================================

fn run_events(file: &str, json: bool, default_attribute: Option<&str>) -> Result<(), CliError> {
    let source = read_input(Some(file))?;
    let parser = parser_for(file, default_attribute);

    let stdout = io::stdout();
    let mut printer = EventPrinter {
        out: stdout.lock(),
        json,
        errors: Vec::new(),
        failure: None,
    };
    parser.feed(&source, &mut printer)?;
    if let Some(err) = printer.failure {
        return Err(CliError::Io(err));
    }
    if !printer.errors.is_empty() {
        return Err(CliError::Structural {
            errors: printer.errors,
            source,
            filename: display_name(file),
        });
    }
    Ok(())
}

fn run_tree(file: &str, default_attribute: Option<&str>) -> Result<(), CliError> {
    let source = read_input(Some(file))?;
    let filename = display_name(file);
    let parser = parser_for(file, default_attribute);

    let mut builder = TreeBuilder::new();
    parser.feed(&source, &mut builder)?;
    let root = builder
        .finish()
        .map_err(|e| CliError::from_build(e, &source, &filename))?;
    print_tree(&root, 0);
    Ok(())
}

fn run_check(file: &str) -> Result<(), CliError> {
    let source = read_input(Some(file))?;
    let filename = display_name(file);
    let parser = parser_for(file, None);
    hsd_tree::parse_with(&parser, &source).map_err(|e| CliError::from_build(e, &source, &filename))?;
    debug!(%filename, "no structural errors");
    Ok(())
}

/// Prints every event as it arrives.
struct EventPrinter<W: Write> {
    out: W,
    json: bool,
    errors: Vec<ParseError>,
    failure: Option<io::Error>,
}

impl<W: Write> ParseCallback for EventPrinter<W> {
    fn event(&mut self, event: Event) -> bool {
        if let Event::Error { code, lines } = &event {
            self.errors.push(ParseError::new(*code, *lines));
        }
        let line = if self.json {
            event_to_json(&event).to_string()
        } else {
            describe_event(&event)
        };
        match writeln!(self.out, "{line}") {
            Ok(()) => true,
            Err(err) => {
                // A closed pipe ends the dump early.
                self.failure = Some(err);
                false
            }
        }
    }
}

fn event_to_json(event: &Event) -> serde_json::Value {
    use serde_json::json;

    match event {
        Event::Open {
            name,
            attributes,
            flags,
        } => {
            let attributes: Vec<_> = attributes
                .iter()
                .map(|a| json!({ "name": a.name, "value": a.value }))
                .collect();
            json!({
                "event": "open",
                "name": name,
                "attributes": attributes,
                "equals": flags.has_equals_form,
                "cascade": flags.cascade_close,
                "line": flags.start_line,
            })
        }
        Event::Close { name } => json!({ "event": "close", "name": name }),
        Event::Text { content } => json!({ "event": "text", "content": content }),
        Event::Error { code, lines } => json!({
            "event": "error",
            "code": code.code(),
            "kind": code.to_string(),
            "start": lines.start,
            "end": lines.end,
        }),
    }
}

fn describe_event(event: &Event) -> String {
    match event {
        Event::Open {
            name,
            attributes,
            flags,
        } => {
            let mut line = format!("open {name}");
            for attribute in attributes {
                line.push_str(&format!(" {}={:?}", attribute.name, attribute.value));
            }
            if flags.has_equals_form {
                line.push_str(" (equals)");
            }
            if flags.cascade_close {
                line.push_str(" (cascade)");
            }
            line.push_str(&format!(" @{}", flags.start_line + 1));
            line
        }
        Event::Close { name } => format!("close {name}"),
        Event::Text { content } => format!("text {content:?}"),
        Event::Error { code, lines } => format!("error {code} {lines}"),
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// Parser resolving includes next to the input file.
fn parser_for(input: &str, default_attribute: Option<&str>) -> Parser<FileResolver> {
    let parser = Parser::new().with_resolver(FileResolver::new(include_root(input)));
    match default_attribute {
        Some(name) => parser.with_default_attribute(name),
        None => parser,
    }
}

fn include_root(input: &str) -> PathBuf {
    if input == "-" {
        return PathBuf::from(".");
    }
    match Path::new(input).parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

fn display_name(input: &str) -> String {
    if input == "-" {
        "<stdin>".to_string()
    } else {
        input.to_string()
    }
}

fn read_input(file: Option<&str>) -> Result<String, io::Error> {
    match file {
        Some("-") | None => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
        Some(path) => std::fs::read_to_string(path),
    }
}

fn write_output(path: &str, content: &str) -> Result<(), io::Error> {
    if path == "-" {
        print!("{content}");
        Ok(())
    } else {
        std::fs::write(path, content)
    }
}

fn is_same_file(a: &str, b: &str) -> bool {
    match (std::fs::canonicalize(a), std::fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}

// ============================================================================
// Tree printing (debug)
// ============================================================================

fn print_tree(element: &Element, indent: usize) {
    let pad = "  ".repeat(indent);

    let mut header = format!("{pad}{}", element.name);
    if !element.attributes.is_empty() {
        let attributes: Vec<_> = element
            .attributes
            .iter()
            .map(|a| format!("{}={}", a.name, a.value))
            .collect();
        header.push_str(&format!(" [{}]", attributes.join(", ")));
    }
    if element.has_equals_form {
        header.push_str(" =");
    }
    println!("{header}");

    for child in &element.children {
        print_tree(child, indent + 1);
    }
    if let Some(text) = element.text() {
        for line in text.lines() {
            println!("{pad}  | {line}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use facet_testhelpers::test;
    use hsd_parse::{Attributes, ErrorCode, LineRange, OpenFlags};

    #[test]
    fn test_file_arg_detection() {
        assert!(is_file_arg("dftb_in.hsd"));
        assert!(is_file_arg("./input"));
        assert!(is_file_arg("-"));
        assert!(!is_file_arg("events"));
        assert!(!is_file_arg("tree"));
    }

    #[test]
    fn test_include_root() {
        assert_eq!(include_root("-"), PathBuf::from("."));
        assert_eq!(include_root("dftb_in.hsd"), PathBuf::from("."));
        assert_eq!(include_root("runs/a/dftb_in.hsd"), PathBuf::from("runs/a"));
    }

    #[test]
    fn test_open_event_json() {
        let event = Event::Open {
            name: "Temperature".to_string(),
            attributes: Attributes::from([("unit", "Kelvin")]),
            flags: OpenFlags::equals(3),
        };
        assert_eq!(
            event_to_json(&event),
            serde_json::json!({
                "event": "open",
                "name": "Temperature",
                "attributes": [{ "name": "unit", "value": "Kelvin" }],
                "equals": true,
                "cascade": false,
                "line": 3,
            })
        );
    }

    #[test]
    fn test_error_event_json() {
        let event = Event::Error {
            code: ErrorCode::Bracket,
            lines: LineRange::new(2, 5),
        };
        let json = event_to_json(&event);
        assert_eq!(json["code"], 4);
        assert_eq!(json["kind"], "BRACKET_ERROR");
        assert_eq!(json["start"], 2);
        assert_eq!(json["end"], 5);
    }

    #[test]
    fn test_describe_event() {
        let event = Event::Open {
            name: "Filling".to_string(),
            attributes: Attributes::new(),
            flags: OpenFlags::equals(0),
        };
        assert_eq!(describe_event(&event), "open Filling (equals) @1");
        assert_eq!(describe_event(&Event::text("2 S")), "text \"2 S\"");
        assert_eq!(
            describe_event(&Event::Error {
                code: ErrorCode::Tag,
                lines: LineRange::new(0, 1),
            }),
            "error TAG_ERROR line 1"
        );
    }

    #[test]
    fn test_event_printer_collects_errors() {
        let mut printer = EventPrinter {
            out: Vec::new(),
            json: false,
            errors: Vec::new(),
            failure: None,
        };
        let parser = Parser::new().with_resolver(FileResolver::cwd());
        parser.feed("a {\n", &mut printer).unwrap();
        let printed = String::from_utf8(printer.out).unwrap();
        assert_eq!(printed, "open a @1\nerror TAG_ERROR line 1\n");
        assert_eq!(
            printer.errors,
            vec![ParseError::new(ErrorCode::Tag, LineRange::new(0, 1))]
        );
    }

    #[test]
    fn test_exit_codes() {
        let usage = CliError::Usage("bad".into());
        assert_eq!(usage.exit_code(), EXIT_SYNTAX_ERROR);
        let include = CliError::Include(IncludeError::NotFound {
            name: "x".into(),
        });
        assert_eq!(include.exit_code(), EXIT_IO_ERROR);
    }
}
