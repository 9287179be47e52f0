//! lexcompare text layer.
//!
//! This crate turns marked-up legal texts into ordered comparison units and
//! scores how close two strings are. Downstream stages (matcher, diff) rely on
//! it for every text-level decision.
//!
//! ## What we do
//!
//! - Markup stripping that keeps line and paragraph structure
//! - Paragraph tokenization, with long paragraphs cut into sentence chunks
//! - Edit-distance similarity on a `[0, 100]` scale
//! - Whitespace helpers shared by the other crates
//!
//! ## Pure function guarantee
//!
//! No I/O, no clock calls, no locale dependence. Same input and config, same
//! tokens and scores on any machine.
//!
//! ## Invariants worth knowing
//!
//! - Token order follows the source; `paragraph_index` never decreases
//! - `similarity(a, b) == similarity(b, a)`
//! - `similarity(a, a) == 100` for any `a`, including empty

mod config;
mod error;
mod markup;
mod similarity;
mod token;
mod whitespace;

pub use crate::config::TokenizeConfig;
pub use crate::error::CanonicalError;
pub use crate::markup::{decode_entities, escape_markup, strip_markup};
pub use crate::similarity::{
    edit_distance, normalize_for_similarity, normalized_similarity, similarity, similarity_ratio,
};
pub use crate::token::{tokenize, tokenize_plain, Token, TokenKind};
pub use crate::whitespace::{collapse_whitespace, normalize_line_endings};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn markup_tokens_compare_against_plain_text() {
        let cfg = TokenizeConfig::default();
        let tokens = tokenize("<p>Điều 1.&nbsp;Phạm vi</p><p>Điều 2. Đối tượng</p>", &cfg);
        assert_eq!(tokens.len(), 2);
        assert_eq!(similarity(&tokens[0].content, "điều 1. phạm vi"), 100.0);
    }

    #[test]
    fn numbered_articles_look_alike_on_their_own() {
        let cfg = TokenizeConfig::default();
        let tokens = tokenize("<p>Điều 1. Abc.</p><p>Điều 2. Mới.</p>", &cfg);
        let score = similarity(&tokens[0].content, &tokens[1].content);
        assert!(score > 60.0 && score < 85.0, "score was {score}");
    }
}
