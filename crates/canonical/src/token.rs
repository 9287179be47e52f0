use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::config::TokenizeConfig;
use crate::markup::strip_markup;

static PARAGRAPH_BREAK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\n\s*\n").expect("paragraph break pattern"));

/// Granularity of a [`Token`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    /// A whole paragraph short enough to compare as one unit.
    Paragraph,
    /// A sentence-sized chunk cut from a long paragraph.
    Sentence,
}

/// A comparison unit with the ordinal of the paragraph it came from.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Token {
    /// Plain-text content, trimmed.
    pub content: String,
    /// Whether this is a whole paragraph or a sentence chunk.
    pub kind: TokenKind,
    /// Zero-based ordinal of the source paragraph.
    pub paragraph_index: usize,
}

impl AsRef<str> for Token {
    fn as_ref(&self) -> &str {
        self.content.as_str()
    }
}

/// Tokenizes marked-up content into paragraph and sentence units.
///
/// Markup is stripped first (see [`strip_markup`]). The output order follows
/// the source, so `paragraph_index` is non-decreasing. Deterministic: calling
/// it twice on the same input yields the same tokens.
///
/// ```rust
/// use canonical::{tokenize, TokenKind, TokenizeConfig};
///
/// let tokens = tokenize("<p>Điều 1. Abc.</p><p>Điều 2. Mới.</p>", &TokenizeConfig::default());
/// assert_eq!(tokens.len(), 2);
/// assert_eq!(tokens[1].content, "Điều 2. Mới.");
/// assert_eq!(tokens[1].kind, TokenKind::Paragraph);
/// assert_eq!(tokens[1].paragraph_index, 1);
/// ```
pub fn tokenize(markup: &str, cfg: &TokenizeConfig) -> Vec<Token> {
    tokenize_plain(&strip_markup(markup), cfg)
}

/// Tokenizes text that has already been stripped of markup.
pub fn tokenize_plain(text: &str, cfg: &TokenizeConfig) -> Vec<Token> {
    let mut tokens = Vec::new();

    for (paragraph_index, paragraph) in PARAGRAPH_BREAK.split(text).enumerate() {
        let trimmed = paragraph.trim();
        if trimmed.is_empty() {
            continue;
        }

        if trimmed.chars().count() > cfg.long_paragraph_chars {
            split_sentences(trimmed, cfg.min_sentence_chars, |chunk| {
                tokens.push(Token {
                    content: chunk.to_string(),
                    kind: TokenKind::Sentence,
                    paragraph_index,
                });
            });
        } else {
            tokens.push(Token {
                content: trimmed.to_string(),
                kind: TokenKind::Paragraph,
                paragraph_index,
            });
        }
    }

    tokens
}

/// Cuts `paragraph` after a terminator followed by whitespace once the pending
/// chunk is longer than `min_chars`. The tail is always emitted.
fn split_sentences(paragraph: &str, min_chars: usize, mut emit: impl FnMut(&str)) {
    let mut chunk_start = 0usize;
    let mut chunk_chars = 0usize;
    let mut chars = paragraph.char_indices().peekable();

    while let Some((_, ch)) = chars.next() {
        chunk_chars += 1;
        if !matches!(ch, '.' | '!' | '?') {
            continue;
        }
        let Some(&(ws_idx, next)) = chars.peek() else {
            break;
        };
        if !next.is_whitespace() {
            continue;
        }
        // The whitespace after the terminator belongs to the closing chunk.
        let chunk_end = ws_idx + next.len_utf8();
        if chunk_chars + 1 > min_chars {
            let chunk = paragraph[chunk_start..chunk_end].trim();
            if !chunk.is_empty() {
                emit(chunk);
            }
            chars.next();
            chunk_start = chunk_end;
            chunk_chars = 0;
        }
    }

    let tail = paragraph[chunk_start..].trim();
    if !tail.is_empty() {
        emit(tail);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg() -> TokenizeConfig {
        TokenizeConfig::default()
    }

    fn long_sentence(label: &str) -> String {
        format!("{label} quy định chi tiết về phạm vi điều chỉnh và đối tượng áp dụng của văn bản này trên phạm vi toàn quốc kể từ ngày ký.")
    }

    #[test]
    fn short_paragraphs_stay_whole() {
        let tokens = tokenize_plain("Điều 1. Abc.\n\nĐiều 2. Mới.", &cfg());
        assert_eq!(tokens.len(), 2);
        assert!(tokens.iter().all(|t| t.kind == TokenKind::Paragraph));
        assert_eq!(tokens[0].paragraph_index, 0);
        assert_eq!(tokens[1].paragraph_index, 1);
    }

    #[test]
    fn single_newlines_do_not_split_paragraphs() {
        let tokens = tokenize_plain("Điều 1.\nKhoản 1.\nKhoản 2.", &cfg());
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].content, "Điều 1.\nKhoản 1.\nKhoản 2.");
    }

    #[test]
    fn whitespace_only_lines_count_as_blank() {
        let tokens = tokenize_plain("A.\n  \t\nB.\n\n\n\nC.", &cfg());
        let contents: Vec<&str> = tokens.iter().map(|t| t.content.as_str()).collect();
        assert_eq!(contents, vec!["A.", "B.", "C."]);
        assert_eq!(tokens[2].paragraph_index, 2);
    }

    #[test]
    fn long_paragraph_splits_into_sentences() {
        let paragraph = (1..=4)
            .map(|i| long_sentence(&format!("Câu {i}")))
            .collect::<Vec<_>>()
            .join(" ");
        assert!(paragraph.chars().count() > 300);

        let tokens = tokenize_plain(&paragraph, &cfg());
        assert_eq!(tokens.len(), 4);
        for (i, token) in tokens.iter().enumerate() {
            assert_eq!(token.kind, TokenKind::Sentence);
            assert_eq!(token.paragraph_index, 0);
            assert!(token.content.starts_with(&format!("Câu {}", i + 1)));
            assert!(token.content.ends_with('.'));
        }
    }

    #[test]
    fn short_sentences_accumulate_until_threshold() {
        let short = "Ngắn. ".repeat(60);
        let tokens = tokenize_plain(short.trim(), &cfg());
        assert!(tokens.len() > 1);
        for token in &tokens[..tokens.len() - 1] {
            assert!(token.content.chars().count() > 100);
        }
    }

    #[test]
    fn terminator_without_whitespace_does_not_split() {
        let text = format!("{} 15.2022.ND {}", "a".repeat(200), "b".repeat(200));
        let tokens = tokenize_plain(&text, &cfg());
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].kind, TokenKind::Sentence);
    }

    #[test]
    fn paragraph_indices_are_non_decreasing() {
        let long = (1..=5).map(|i| long_sentence(&format!("Ý {i}"))).collect::<Vec<_>>().join(" ");
        let markup = format!("<p>Mở đầu.</p><p>{long}</p><p>Kết.</p><p>{long}</p>");
        let tokens = tokenize(&markup, &cfg());
        assert!(tokens.len() > 4);
        assert!(tokens
            .windows(2)
            .all(|w| w[0].paragraph_index <= w[1].paragraph_index));
    }

    #[test]
    fn empty_input_yields_no_tokens() {
        assert!(tokenize("", &cfg()).is_empty());
        assert!(tokenize("<p> </p>", &cfg()).is_empty());
    }

    #[test]
    fn tokenize_is_deterministic() {
        let markup = "<p>Điều 1.</p><p>Điều 2.</p>";
        assert_eq!(tokenize(markup, &cfg()), tokenize(markup, &cfg()));
    }

    #[test]
    fn appended_sentence_joins_a_short_tail() {
        let head = format!(
            "{} {} {}",
            long_sentence("Điều 1."),
            long_sentence("Khoản 2"),
            long_sentence("Khoản 3")
        );
        let before = format!("{head} Bộ Tài chính hướng dẫn thi hành.");
        let after = format!("{before} Trừ trường hợp bất khả kháng.");

        let before = tokenize_plain(&before, &cfg());
        let after = tokenize_plain(&after, &cfg());
        assert_eq!(before.len(), after.len());
        assert_eq!(before.len(), 4);
        assert_eq!(before[..3], after[..3]);
        assert_eq!(
            after.last().map(|t| t.content.as_str()),
            Some("Bộ Tài chính hướng dẫn thi hành. Trừ trường hợp bất khả kháng.")
        );
    }
}
