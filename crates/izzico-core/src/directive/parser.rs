//! Inline directive extraction.
//!
//! Assistant replies are plain prose that may embed markers such as
//! `[navigate:/dashboard/owner/leases:View your leases]`. This module splits a
//! reply into display text and an ordered list of directives. It is pure: no
//! I/O, no state, and it never fails. Anything that does not look like a
//! well-formed marker stays in the text untouched.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;

use super::model::{ActionDirective, ParsedReply, action_types};

/// `[type:segment(:segment)*]` on a single line, without nested brackets.
static MARKER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\[([A-Za-z][A-Za-z0-9_-]*):([^\[\]\r\n]*)\]").expect("marker pattern is valid")
});

/// Payload field names for the leading segments of a marker, per type.
///
/// Types without an entry take a single `value` field, so an unknown type is
/// still extracted and the executor can report it as unsupported.
fn field_schema(action_type: &str) -> &'static [&'static str] {
    match action_type {
        action_types::NAVIGATE => &["path"],
        action_types::SET_FILTERS => &["filters"],
        action_types::OPEN_MODAL => &["modal"],
        action_types::HIGHLIGHT_ELEMENT => &["selector"],
        action_types::SCROLL_TO_SECTION => &["section"],
        action_types::START_TOUR => &["tour"],
        action_types::COPY_TO_CLIPBOARD => &["text"],
        action_types::TOGGLE_PREFERENCE => &["preference"],
        _ => &["value"],
    }
}

/// A marker that passed syntax validation, before sequencing.
struct RawDirective {
    action_type: String,
    payload: BTreeMap<String, String>,
    description: Option<String>,
}

/// Parses a raw assistant reply.
///
/// The returned `clean_text` is a fixed point: parsing it again yields no
/// directives. Removing a marker can splice surrounding text into a new
/// marker, so extraction repeats until a pass finds nothing; directives found
/// by later passes are numbered after earlier ones.
pub fn parse(raw_text: &str) -> ParsedReply {
    let mut clean_text = raw_text.to_string();
    let mut directives: Vec<ActionDirective> = Vec::new();

    loop {
        let (next, found) = strip_markers(&clean_text);
        if found.is_empty() {
            break;
        }
        for raw in found {
            directives.push(ActionDirective {
                sequence: directives.len(),
                action_type: raw.action_type,
                payload: raw.payload,
                description: raw.description,
            });
        }
        clean_text = next;
    }

    ParsedReply {
        clean_text,
        directives,
    }
}

/// One extraction pass. Returns the input unchanged when nothing is found.
fn strip_markers(text: &str) -> (String, Vec<RawDirective>) {
    let mut out = String::with_capacity(text.len());
    let mut found = Vec::new();
    let mut last = 0;

    for caps in MARKER_RE.captures_iter(text) {
        let (Some(whole), Some(kind), Some(body)) = (caps.get(0), caps.get(1), caps.get(2)) else {
            continue;
        };
        let Some(directive) = build_directive(kind.as_str(), body.as_str()) else {
            continue;
        };

        out.push_str(&text[last..whole.start()]);
        let kept = out.trim_end_matches([' ', '\t']).len();
        out.truncate(kept);

        let rest = &text[whole.end()..];
        let after = rest.trim_start_matches([' ', '\t']);
        last = text.len() - after.len();

        if needs_separator(&out, after) {
            out.push(' ');
        }
        found.push(directive);
    }

    if found.is_empty() {
        return (text.to_string(), found);
    }

    out.push_str(&text[last..]);
    (out.trim().to_string(), found)
}

/// Whether a space must replace a stripped marker between `before` and `after`.
fn needs_separator(before: &str, after: &str) -> bool {
    let Some(next) = after.chars().next() else {
        return false;
    };
    if before.is_empty() || before.ends_with(['\n', '\r']) {
        return false;
    }
    !matches!(next, '\n' | '\r' | '.' | ',' | ';' | ':' | '!' | '?' | ')')
}

fn build_directive(action_type: &str, body: &str) -> Option<RawDirective> {
    let segments: Vec<&str> = body.split(':').map(str::trim).collect();
    let fields = field_schema(action_type);

    if segments.len() < fields.len() {
        return None;
    }
    if segments[..fields.len()].iter().any(|s| s.is_empty()) {
        return None;
    }

    let payload = fields
        .iter()
        .zip(&segments)
        .map(|(name, value)| (name.to_string(), value.to_string()))
        .collect();

    let description = segments[fields.len()..].join(":").trim().to_string();

    Some(RawDirective {
        action_type: action_type.to_string(),
        payload,
        description: (!description.is_empty()).then_some(description),
    })
}
