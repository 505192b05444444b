//! Building filter text from values.
//!
//! - `encode_*`: RFC 2254 escaping of assertion values
//! - `format_attributes`: a conjunction asserting every value of a set
//! - `format_template`: `{i}` placeholder substitution with escaping

use hiermem_core::{AttrValue, Attributes, DirError, DirResult};

/// Escape a text value for use inside a filter.
///
/// `*`, `(`, `)`, `\` and NUL become `\2a`, `\28`, `\29`, `\5c`, `\00`.
pub fn encode_str(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '*' => out.push_str("\\2a"),
            '(' => out.push_str("\\28"),
            ')' => out.push_str("\\29"),
            '\\' => out.push_str("\\5c"),
            '\0' => out.push_str("\\00"),
            _ => out.push(c),
        }
    }
    out
}

/// Render every byte as a `\xx` lowercase hex pair.
pub fn encode_bytes(value: &[u8]) -> String {
    let mut out = String::with_capacity(value.len() * 3);
    for b in value {
        out.push('\\');
        out.push(hex_digit(b >> 4));
        out.push(hex_digit(b & 0x0f));
    }
    out
}

/// Escape an attribute value according to its kind.
pub fn encode_value(value: &AttrValue) -> String {
    match value {
        AttrValue::Text(s) => encode_str(s),
        AttrValue::Bytes(b) => encode_bytes(b),
    }
}

fn hex_digit(nibble: u8) -> char {
    char::from_digit(u32::from(nibble), 16).unwrap_or('0')
}

/// Build a filter that every value of `attrs` satisfies.
///
/// Produces `(&(id=val)(id=val)...)`, with `(id=*)` for presence-only
/// attributes. An empty set yields `(&)`, which is vacuously true.
pub fn format_attributes(attrs: &Attributes) -> String {
    let mut out = String::from("(&");
    for attr in attrs {
        if attr.is_empty() {
            out.push('(');
            out.push_str(attr.id());
            out.push_str("=*)");
            continue;
        }
        for value in attr.values() {
            out.push('(');
            out.push_str(attr.id());
            out.push('=');
            out.push_str(&encode_value(value));
            out.push(')');
        }
    }
    out.push(')');
    out
}

/// Substitute `{i}` placeholders in `template` with the escaped `args[i]`.
///
/// `\{` stands for a literal `{`. A missing `}`, a non-integer index or an
/// index past the end of `args` is an InvalidFilter error positioned at the
/// character offset of the placeholder.
pub fn format_template(template: &str, args: &[AttrValue]) -> DirResult<String> {
    let mut out = String::with_capacity(template.len());
    let mut start = 0;

    while let Some(open) = template[start..].find('{').map(|i| start + i) {
        if template[start..open].ends_with('\\') {
            out.push_str(&template[start..open - 1]);
            out.push('{');
            start = open + 1;
            continue;
        }

        let at = char_offset(template, open);
        let close = template[open + 1..]
            .find('}')
            .map(|i| open + 1 + i)
            .ok_or_else(|| DirError::invalid_filter(at, template, "unbalanced '{'"))?;

        let index_text = &template[open + 1..close];
        let index: usize = index_text.trim().parse().map_err(|_| {
            DirError::invalid_filter(
                at + 1,
                template,
                format!("integer expected inside {{}}, found {index_text:?}"),
            )
        })?;
        let arg = args.get(index).ok_or_else(|| {
            DirError::invalid_filter(
                at + 1,
                template,
                format!("index {index} exceeds argument list of {}", args.len()),
            )
        })?;

        out.push_str(&template[start..open]);
        out.push_str(&encode_value(arg));
        start = close + 1;
    }
    out.push_str(&template[start..]);

    Ok(out)
}

fn char_offset(text: &str, byte: usize) -> usize {
    text[..byte].chars().count()
}
