//! HTML-like markup classifier (HTML and Vue single-file components).

use crate::checker::category::{Categories, Category, ATTRIBUTE, CODE, COMMENT, STRING, TAG};
use crate::host::StyledSpan;
use std::ops::Range;

/// Classify tags, attributes, attribute values, comments and embedded code.
/// Text content between tags is left unclassified.
pub fn classify(text: &str) -> Vec<StyledSpan> {
    let bytes = text.as_bytes();
    let mut spans = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        let rest = &bytes[i..];

        if rest.starts_with(b"<!--") {
            let end = find(bytes, i + 4, b"-->").map_or(bytes.len(), |p| p + 3);
            push(&mut spans, i..end, COMMENT);
            i = end;
        } else if rest.starts_with(b"{{") {
            let end = find(bytes, i + 2, b"}}").map_or(bytes.len(), |p| p + 2);
            push(&mut spans, i..end, CODE);
            i = end;
        } else if bytes[i] == b'<'
            && rest
                .get(1)
                .is_some_and(|&c| c.is_ascii_alphabetic() || c == b'/')
        {
            let (end, raw_text) = tag(bytes, i, &mut spans);
            i = end;
            if let Some(name) = raw_text {
                let close = format!("</{}", name);
                let content_end =
                    find_ignore_case(bytes, i, close.as_bytes()).unwrap_or(bytes.len());
                if content_end > i {
                    push(&mut spans, i..content_end, CODE);
                }
                i = content_end;
            }
        } else {
            i += 1;
        }
    }

    spans
}

/// Scan one tag starting at `start`. Returns the position after it, plus the
/// tag name when its content is raw text (`script`, `style`).
fn tag(bytes: &[u8], start: usize, spans: &mut Vec<StyledSpan>) -> (usize, Option<&'static str>) {
    let mut i = start + 1;
    let closing = bytes.get(i) == Some(&b'/');
    if closing {
        i += 1;
    }

    let name_start = i;
    while i < bytes.len() && is_name_byte(bytes[i]) {
        i += 1;
    }
    push(spans, name_start..i, TAG);
    let name = &bytes[name_start..i];

    while i < bytes.len() && bytes[i] != b'>' {
        match bytes[i] {
            b'"' | b'\'' => {
                let quote = bytes[i];
                let end = bytes[i + 1..]
                    .iter()
                    .position(|&c| c == quote)
                    .map_or(bytes.len(), |p| i + 1 + p + 1);
                push(spans, i..end, STRING);
                i = end;
            }
            c if is_name_byte(c) || c == b'@' || c == b'#' => {
                let attr_start = i;
                while i < bytes.len() && (is_name_byte(bytes[i]) || b"@#.".contains(&bytes[i])) {
                    i += 1;
                }
                push(spans, attr_start..i, ATTRIBUTE);
            }
            _ => i += 1,
        }
    }
    let end = (i + 1).min(bytes.len());

    let raw_text = if closing {
        None
    } else if name.eq_ignore_ascii_case(b"script") {
        Some("script")
    } else if name.eq_ignore_ascii_case(b"style") {
        Some("style")
    } else {
        None
    };
    (end, raw_text)
}

fn push(spans: &mut Vec<StyledSpan>, range: Range<usize>, category: Category) {
    if !range.is_empty() {
        spans.push(StyledSpan::new(range, Categories::One(category)));
    }
}

fn is_name_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'-' || b == b'_' || b == b':'
}

fn find(bytes: &[u8], from: usize, needle: &[u8]) -> Option<usize> {
    bytes
        .get(from..)?
        .windows(needle.len())
        .position(|w| w == needle)
        .map(|p| from + p)
}

fn find_ignore_case(bytes: &[u8], from: usize, needle: &[u8]) -> Option<usize> {
    bytes
        .get(from..)?
        .windows(needle.len())
        .position(|w| w.eq_ignore_ascii_case(needle))
        .map(|p| from + p)
}
