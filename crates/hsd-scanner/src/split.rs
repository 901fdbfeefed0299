//! Splitting text at the first significant character.

use crate::ScanMode;
use tracing::trace;

/// Result of [`split`]: the first significant character and the text around it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Split<'a> {
    /// The significant character found, or `None` if the text had none.
    pub found: Option<char>,
    /// Text before the character (the whole text if nothing was found).
    ///
    /// Escaped significant characters are kept here verbatim, backslash
    /// included.
    pub before: &'a str,
    /// Text after the character (empty if nothing was found).
    pub after: &'a str,
}

/// Split `text` at the first unescaped character significant in `mode`.
///
/// A significant character preceded by an odd number of backslashes is
/// literal: it stays in `before` together with its backslash and scanning
/// continues past it.
pub fn split(text: &str, mode: ScanMode) -> Split<'_> {
    let mut backslashes = 0usize;
    for (index, c) in text.char_indices() {
        if mode.is_significant(c) && backslashes % 2 == 0 {
            let split = Split {
                found: Some(c),
                before: &text[..index],
                after: &text[index + c.len_utf8()..],
            };
            trace!(?mode, found = ?c, before = split.before, "split");
            return split;
        }
        if c == '\\' {
            backslashes += 1;
        } else {
            backslashes = 0;
        }
    }
    Split {
        found: None,
        before: text,
        after: "",
    }
}

/// Whether a character following `before` would be escaped.
pub fn is_escaped(before: &str) -> bool {
    before.chars().rev().take_while(|&c| c == '\\').count() % 2 == 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use facet_testhelpers::test;

    #[test]
    fn test_split_at_first_significant() {
        let split = split("name = value", ScanMode::TopLevel);
        assert_eq!(split.found, Some('='));
        assert_eq!(split.before, "name ");
        assert_eq!(split.after, " value");
    }

    #[test]
    fn test_nothing_found() {
        let split = split("plain text\n", ScanMode::TopLevel);
        assert_eq!(split.found, None);
        assert_eq!(split.before, "plain text\n");
        assert_eq!(split.after, "");
    }

    #[test]
    fn test_escaped_character_is_literal() {
        let split = split(r"a \{ b } c", ScanMode::TopLevel);
        assert_eq!(split.found, Some('}'));
        assert_eq!(split.before, r"a \{ b ");
        assert_eq!(split.after, " c");
    }

    #[test]
    fn test_double_backslash_does_not_escape() {
        let split = split(r"a \\{ b", ScanMode::TopLevel);
        assert_eq!(split.found, Some('{'));
        assert_eq!(split.before, r"a \\");
    }

    #[test]
    fn test_triple_backslash_escapes() {
        let split = split(r"a \\\{ b", ScanMode::TopLevel);
        assert_eq!(split.found, None);
    }

    #[test]
    fn test_quote_mode_only_stops_at_quote() {
        let split = split("a {b} = 'c' \" d", ScanMode::Quote('"'));
        assert_eq!(split.found, Some('"'));
        assert_eq!(split.before, "a {b} = 'c' ");
        assert_eq!(split.after, " d");
    }

    #[test]
    fn test_escaped_quote_inside_quote() {
        let split = split(r#"say \"hi\" now" rest"#, ScanMode::Quote('"'));
        assert_eq!(split.before, r#"say \"hi\" now"#);
        assert_eq!(split.after, " rest");
    }

    #[test]
    fn test_multibyte_text() {
        let split = split("größe = 3", ScanMode::TopLevel);
        assert_eq!(split.before, "größe ");
        assert_eq!(split.after, " 3");
    }

    #[test]
    fn test_is_escaped() {
        assert!(is_escaped(r"abc\"));
        assert!(!is_escaped(r"abc\\"));
        assert!(is_escaped(r"abc\\\"));
        assert!(!is_escaped("abc"));
    }
}
