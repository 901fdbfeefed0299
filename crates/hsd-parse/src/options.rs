//! Parsing of attribute lists (`[unit=Kelvin, dim=3]`).

use hsd_scanner::{ScanMode, split};
use tracing::trace;

use crate::Attributes;

/// Parse the text between `[` and `]` into attributes.
///
/// Entries are separated by `,`. An entry is either `key=value` or a bare
/// `value`, which is stored under `default_attribute`. Keys and values are
/// trimmed; quoted runs are kept verbatim and may contain `,` and `=`. An
/// entry with neither key nor value (`[]`, a trailing comma) is skipped.
pub fn parse_options(body: &str, default_attribute: &str) -> Attributes {
    let mut attributes = Attributes::new();
    let mut key: Option<String> = None;
    let mut value = String::new();
    let mut mode = ScanMode::Options;
    let mut rest = body;

    loop {
        let parts = split(rest, mode);
        rest = parts.after;
        match (mode, parts.found) {
            (_, None) => {
                value.push_str(parts.before);
                break;
            }
            (ScanMode::Quote(quote), Some(_)) => {
                value.push_str(parts.before);
                value.push(quote);
                mode = ScanMode::Options;
            }
            (_, Some('=')) if key.is_none() => {
                value.push_str(parts.before);
                key = Some(value.trim().to_string());
                value.clear();
            }
            (_, Some(',')) => {
                value.push_str(parts.before);
                commit(&mut attributes, key.take(), &value, default_attribute);
                value.clear();
            }
            (_, Some(c)) => {
                // Quotes open a protected run; anything else (a second `=`,
                // an escaped `]`) is part of the value.
                value.push_str(parts.before);
                value.push(c);
                if let Some(quoted) = ScanMode::quote_for(c) {
                    mode = quoted;
                }
            }
        }
    }
    commit(&mut attributes, key, &value, default_attribute);
    attributes
}

fn commit(attributes: &mut Attributes, key: Option<String>, value: &str, default_attribute: &str) {
    let value = value.trim();
    let name = match key {
        Some(key) => key,
        None if value.is_empty() => return,
        None => default_attribute.to_string(),
    };
    trace!(%name, value, "attribute");
    attributes.insert(name, value);
}
