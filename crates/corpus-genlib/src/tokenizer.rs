//! Tokenizer for the `{{.field}}` placeholder micro-syntax.
//!
//! A template is literal text interleaved with placeholders of exactly one
//! shape, `{{.<fieldName>}}`. Nothing else is interpreted here; templates
//! meant for the general-purpose engine never pass through this module.

use std::collections::HashMap;

/// Result of scanning a template.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ParsedTemplate {
    /// Every placeholder occurrence in template order; duplicates allowed
    /// when a field is referenced more than once.
    pub ordered_fields: Vec<String>,
    /// Literal bytes immediately preceding each field's placeholder. For a
    /// field referenced twice the last occurrence wins; replay is driven by
    /// `ordered_fields`, not this map.
    pub prefix_by_field: HashMap<String, Vec<u8>>,
    /// Literal bytes after the last placeholder, or the whole template when
    /// it has no placeholder.
    pub trailing: Vec<u8>,
}

/// Split a template into alternating literal and placeholder tokens.
///
/// Single left-to-right pass: literal bytes accumulate into a pending
/// prefix, and a valid placeholder flushes the accumulator as that field's
/// prefix. A `{` that does not open a valid placeholder is ordinary literal
/// text, so a literal run is never split across two map entries. The final
/// accumulator becomes the trailing literal.
pub fn parse(template: &[u8]) -> ParsedTemplate {
    let mut parsed = ParsedTemplate::default();
    let mut prefix: Vec<u8> = Vec::new();
    let mut pos = 0;

    while pos < template.len() {
        if let Some((name, consumed)) = match_placeholder(&template[pos..]) {
            parsed.ordered_fields.push(name.clone());
            parsed.prefix_by_field.insert(name, std::mem::take(&mut prefix));
            pos += consumed;
        } else {
            prefix.push(template[pos]);
            pos += 1;
        }
    }

    parsed.trailing = prefix;
    parsed
}

/// Try to match `{{.<name>}}` at the start of `input`, returning the field
/// name and the number of bytes consumed.
///
/// The name is every byte after `{{.` up to the first `}`, which must be
/// non-empty and immediately followed by a second `}`. Anything between the
/// markers is taken verbatim as the field name; a body that is not a
/// declared field surfaces later as a binding failure.
fn match_placeholder(input: &[u8]) -> Option<(String, usize)> {
    let body = input.strip_prefix(b"{{.")?;
    let close = body.iter().position(|&b| b == b'}')?;
    if close == 0 || body.get(close + 1) != Some(&b'}') {
        return None;
    }
    let name = String::from_utf8_lossy(&body[..close]).into_owned();
    Some((name, 3 + close + 2))
}
