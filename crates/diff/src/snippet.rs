//! Locating plain-text tokens inside the original markup.

use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};

static HAS_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]+>").expect("tag pattern"));

// What may stand between two words of a token in the source markup.
const GAP: &str = r"(?:\s|&nbsp;|&#160;|<[^>]*>)*";

/// Finds `token_text` in `markup` and returns the surrounding markup.
///
/// The match tolerates any amount of whitespace, `&nbsp;` or inline tags
/// between words, and entity-encoded forms of `& < > " '`. The match is
/// widened by `context_chars` characters on each side, then out to the
/// nearest `<` before and `>` after. If that contains a tag it is returned as
/// is, otherwise the widened text is wrapped in `<p>`. Without a match the
/// escaped token text is wrapped in `<p>`.
///
/// ```
/// use diff::extract_snippet;
///
/// let markup = "<p>Điều 1. Abc.</p><p>Điều 2.<br/>Mới.</p>";
/// assert_eq!(extract_snippet("Điều 2. Mới.", markup, 0), "<p>Điều 2.<br/>Mới.</p>");
/// assert_eq!(extract_snippet("Điều 9.", markup, 0), "<p>Điều 9.</p>");
/// ```
pub fn extract_snippet(token_text: &str, markup: &str, context_chars: usize) -> String {
    match locate(token_text, markup) {
        Some((start, end)) => {
            let start = back_chars(markup, start, context_chars);
            let end = forward_chars(markup, end, context_chars);
            enclosing_markup(markup, start, end)
                .unwrap_or_else(|| format!("<p>{}</p>", &markup[start..end]))
        }
        None => wrap_plain(token_text),
    }
}

fn wrap_plain(text: &str) -> String {
    format!("<p>{}</p>", canonical::escape_markup(text.trim()))
}

fn locate(token_text: &str, markup: &str) -> Option<(usize, usize)> {
    let words: Vec<String> = token_text.split_whitespace().map(word_pattern).collect();
    if words.is_empty() {
        return None;
    }
    let pattern = RegexBuilder::new(&words.join(GAP))
        .case_insensitive(true)
        .build()
        .ok()?;
    pattern.find(markup).map(|m| (m.start(), m.end()))
}

fn word_pattern(word: &str) -> String {
    let mut out = String::with_capacity(word.len() * 2);
    for ch in word.chars() {
        match ch {
            '&' => out.push_str("(?:&amp;|&)"),
            '<' => out.push_str("(?:&lt;|<)"),
            '>' => out.push_str("(?:&gt;|>)"),
            '"' => out.push_str("(?:&quot;|\")"),
            '\'' => out.push_str("(?:&#39;|&apos;|')"),
            _ => out.push_str(&regex::escape(ch.encode_utf8(&mut [0u8; 4]))),
        }
    }
    out
}

fn enclosing_markup(markup: &str, start: usize, end: usize) -> Option<String> {
    let open = if markup[start..].starts_with('<') {
        start
    } else {
        markup[..start].rfind('<')?
    };
    let close = if end == markup.len() || markup[..end].ends_with('>') {
        end
    } else {
        end + markup[end..].find('>')? + 1
    };
    let expanded = &markup[open..close];
    HAS_TAG.is_match(expanded).then(|| expanded.to_string())
}

/// Byte offset `n` characters before `idx`, clamped to the start.
fn back_chars(text: &str, idx: usize, n: usize) -> usize {
    text[..idx]
        .char_indices()
        .rev()
        .take(n)
        .last()
        .map_or(idx, |(i, _)| i)
}

/// Byte offset `n` characters after `idx`, clamped to the end.
fn forward_chars(text: &str, idx: usize, n: usize) -> usize {
    text[idx..]
        .char_indices()
        .nth(n)
        .map_or(text.len(), |(i, _)| idx + i)
}
