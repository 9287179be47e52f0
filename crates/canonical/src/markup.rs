//! Markup stripping.
//!
//! Legal texts arrive as HTML fragments scraped from official gazettes. The
//! tokenizer only needs the visible text and the paragraph structure, so this
//! module turns line breaks into `\n`, block boundaries into blank lines, and
//! drops every other tag.
//!
//! ```rust
//! use canonical::strip_markup;
//!
//! let text = strip_markup("<p>Điều 1. Abc.</p><p>Điều 2.<br/>Mới &amp; khác.</p>");
//! assert_eq!(text, "Điều 1. Abc.\n\nĐiều 2.\nMới & khác.");
//! ```

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::whitespace::normalize_line_endings;

static LINE_BREAK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)<br\s*/?>").expect("line break pattern"));

// A closing block tag followed (after optional whitespace) by another tag is a
// paragraph boundary. A trailing closing tag is not, so the text of the last
// paragraph does not pick up a spurious blank line.
static BLOCK_BOUNDARY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)</(?:p|div|h[1-6]|li|tr|table|ul|ol|blockquote)\s*>\s*(<)")
        .expect("block boundary pattern")
});

static TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*(?:>|$)").expect("tag pattern"));

static ENTITY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"&(#[0-9]+|#[xX][0-9a-fA-F]+|[a-zA-Z]+);").expect("entity pattern"));

/// Strips markup from `input`, preserving line and paragraph structure.
///
/// Paragraph boundaries become `\n\n` and `<br>` becomes `\n`. The result is
/// trimmed at both ends; inner whitespace is left untouched.
pub fn strip_markup(input: &str) -> String {
    let text = normalize_line_endings(input);
    let text = LINE_BREAK.replace_all(&text, "\n");
    let text = BLOCK_BOUNDARY.replace_all(&text, "\n\n$1");
    let text = TAG.replace_all(&text, "");
    let text = decode_entities(&text);
    text.trim().to_string()
}

/// Decodes the character entities that show up in scraped legal texts.
/// Unknown named entities are left as-is.
pub fn decode_entities(text: &str) -> String {
    ENTITY
        .replace_all(text, |caps: &Captures<'_>| {
            let name = &caps[1];
            match decode_entity(name) {
                Some(ch) => ch.to_string(),
                None => caps[0].to_string(),
            }
        })
        .into_owned()
}

fn decode_entity(name: &str) -> Option<char> {
    if let Some(hex) = name.strip_prefix("#x").or_else(|| name.strip_prefix("#X")) {
        return u32::from_str_radix(hex, 16).ok().and_then(char::from_u32);
    }
    if let Some(dec) = name.strip_prefix('#') {
        return dec.parse::<u32>().ok().and_then(char::from_u32);
    }
    match name {
        "nbsp" => Some('\u{00A0}'),
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        _ => None,
    }
}

/// Escapes text for inclusion inside markup.
pub fn escape_markup(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}
