//! Scanning modes and their significant characters.

/// Characters with structural meaning outside quotes and attribute lists.
const TOP_LEVEL: &[char] = &['=', '{', '}', ';', '#', '[', ']', '\'', '"', '<'];

/// Characters with structural meaning inside `[...]`.
const OPTIONS: &[char] = &[']', '=', ',', '\'', '"'];

/// The sub-mode that decides which characters the scanner stops at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "facet", derive(facet::Facet))]
#[repr(u8)]
pub enum ScanMode {
    /// Between statements and inside `{ ... }` blocks.
    TopLevel,
    /// Inside an attribute list `[ ... ]`.
    Options,
    /// Inside a quoted run; only the matching quote is significant.
    Quote(char),
}

impl ScanMode {
    /// Whether `c` is significant in this mode.
    #[inline]
    pub fn is_significant(&self, c: char) -> bool {
        match self {
            ScanMode::TopLevel => TOP_LEVEL.contains(&c),
            ScanMode::Options => OPTIONS.contains(&c),
            ScanMode::Quote(quote) => c == *quote,
        }
    }

    /// Mode entered when `c` opens a quoted run, if it does.
    #[inline]
    pub fn quote_for(c: char) -> Option<ScanMode> {
        matches!(c, '\'' | '"').then_some(ScanMode::Quote(c))
    }

    /// Whether this mode is a quoted run.
    #[inline]
    pub fn is_quote(&self) -> bool {
        matches!(self, ScanMode::Quote(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use facet_testhelpers::test;

    #[test]
    fn test_top_level_set() {
        for c in "={};#[]'\"<".chars() {
            assert!(ScanMode::TopLevel.is_significant(c), "{c:?}");
        }
        assert!(!ScanMode::TopLevel.is_significant(','));
        assert!(!ScanMode::TopLevel.is_significant('a'));
    }

    #[test]
    fn test_options_set() {
        for c in "]=,'\"".chars() {
            assert!(ScanMode::Options.is_significant(c), "{c:?}");
        }
        assert!(!ScanMode::Options.is_significant('{'));
        assert!(!ScanMode::Options.is_significant('#'));
    }

    #[test]
    fn test_quote_only_matches_itself() {
        let mode = ScanMode::Quote('"');
        assert!(mode.is_significant('"'));
        assert!(!mode.is_significant('\''));
        assert!(!mode.is_significant('}'));
        assert_eq!(ScanMode::quote_for('\''), Some(ScanMode::Quote('\'')));
        assert_eq!(ScanMode::quote_for('x'), None);
    }
}
