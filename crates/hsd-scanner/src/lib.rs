//! Character scanner for HSD.
//!
//! HSD is scanned line by line: each line is repeatedly split at the first
//! character that matters in the current [`ScanMode`].

mod lines;
pub use lines::LineRange;

mod mode;
pub use mode::ScanMode;

mod split;
pub use split::{Split, is_escaped, split};
