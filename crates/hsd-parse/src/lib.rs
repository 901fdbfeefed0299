//! Event-based parser for HSD (Human-friendly Structured Data).
//!
//! The parser scans its input line by line and reports what it sees through
//! four events: a tag opens, a tag closes, text was found, or the document
//! is structurally broken. Consumers implement [`ParseCallback`].

pub use hsd_scanner::{LineRange, ScanMode, Split};

mod attributes;
pub use attributes::{Attribute, Attributes};

mod callback;
pub use callback::ParseCallback;

mod event;
pub use event::{ErrorCode, Event, OpenFlags};

mod include;
pub use include::{FileResolver, IncludeError, IncludeResolver, MemoryResolver, NoIncludes};

mod options;
pub use options::parse_options;

mod parser;
pub use parser::{Completion, DEFAULT_ATTRIBUTE, DEFAULT_MAX_INCLUDE_DEPTH, Parser};
