//! Token classification.
//!
//! Tokens whose normalized text occurs verbatim on the other side are paired
//! first, one to one and in order, and drop out of the comparison. Only the
//! remaining tokens are scored against each other:
//!
//! - a current token whose best score is below `addition_threshold` is an
//!   addition,
//! - a previous token whose best score is below `addition_threshold` is a
//!   deletion,
//! - every remaining pair scoring inside the modification band is a
//!   modification. A token can take part in several such pairs.
//!
//! A token with nothing left to compare against has a best score of 0.

use std::collections::{HashMap, VecDeque};
use std::time::Instant;

use canonical::{normalize_for_similarity, normalized_similarity, tokenize, Token};
use rayon::prelude::*;
use tracing::debug;

use crate::config::{DiffConfig, DiffError};
use crate::entry::{DiffEntry, DiffOutcome, ModificationEntry};
use crate::snippet::extract_snippet;

/// Band a similarity ratio falls into. Every ratio is in exactly one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PairBand {
    Unrelated,
    Modified,
    Unchanged,
}

impl PairBand {
    pub fn of(ratio: f64, cfg: &DiffConfig) -> Self {
        if ratio < cfg.addition_threshold {
            PairBand::Unrelated
        } else if ratio <= cfg.modification_upper {
            PairBand::Modified
        } else {
            PairBand::Unchanged
        }
    }
}

/// Tokenizes both markups with `cfg.tokenize` and diffs them.
pub fn diff_documents(
    current_markup: &str,
    previous_markup: &str,
    cfg: &DiffConfig,
) -> Result<DiffOutcome, DiffError> {
    cfg.validate()?;
    let current = tokenize(current_markup, &cfg.tokenize);
    let previous = tokenize(previous_markup, &cfg.tokenize);
    diff_tokens(&current, &previous, current_markup, previous_markup, cfg)
}

/// Classifies `current` against `previous`.
///
/// The markups are the sources the tokens were cut from; entry contents are
/// snippets taken from them (see [`extract_snippet`]).
pub fn diff_tokens(
    current: &[Token],
    previous: &[Token],
    current_markup: &str,
    previous_markup: &str,
    cfg: &DiffConfig,
) -> Result<DiffOutcome, DiffError> {
    cfg.validate()?;
    let start = Instant::now();

    let current_norm: Vec<String> = current
        .iter()
        .map(|t| normalize_for_similarity(&t.content))
        .collect();
    let previous_norm: Vec<String> = previous
        .iter()
        .map(|t| normalize_for_similarity(&t.content))
        .collect();

    let (open_current, open_previous) = pair_exact(&current_norm, &previous_norm);
    let matrix = similarity_matrix(
        &open_current,
        &open_previous,
        &current_norm,
        &previous_norm,
        cfg.use_parallel,
    );

    let mut current_snippets = SnippetCache::new(current, current_markup, cfg);
    let mut previous_snippets = SnippetCache::new(previous, previous_markup, cfg);
    let mut outcome = DiffOutcome::default();

    for (row, &i) in open_current.iter().enumerate() {
        let best = matrix[row].iter().copied().fold(0.0, f64::max);
        if PairBand::of(best, cfg) == PairBand::Unrelated {
            outcome.additions.push(DiffEntry {
                content: current_snippets.get(i),
                location: cfg.labels.addition_location(current[i].paragraph_index),
            });
        }
    }

    for (col, &j) in open_previous.iter().enumerate() {
        let best = matrix.iter().map(|row| row[col]).fold(0.0, f64::max);
        if PairBand::of(best, cfg) == PairBand::Unrelated {
            outcome.deletions.push(DiffEntry {
                content: previous_snippets.get(j),
                location: cfg.labels.deletion_location(previous[j].paragraph_index),
            });
        }
    }

    for (row, &i) in open_current.iter().enumerate() {
        for (col, &j) in open_previous.iter().enumerate() {
            if PairBand::of(matrix[row][col], cfg) == PairBand::Modified {
                outcome.modifications.push(ModificationEntry {
                    old_content: previous_snippets.get(j),
                    new_content: current_snippets.get(i),
                    location: cfg.labels.modification_location(
                        current[i].paragraph_index,
                        previous[j].paragraph_index,
                    ),
                });
            }
        }
    }

    let (additions, deletions, modifications) = outcome.counts();
    debug!(
        current_tokens = current.len(),
        previous_tokens = previous.len(),
        exact_pairs = current.len() - open_current.len(),
        additions,
        deletions,
        modifications,
        elapsed_micros = start.elapsed().as_micros() as u64,
        "diff_complete"
    );
    Ok(outcome)
}

/// Pairs identical normalized texts one to one, in order. Returns the indices
/// left unpaired on each side.
fn pair_exact(current: &[String], previous: &[String]) -> (Vec<usize>, Vec<usize>) {
    let mut by_text: HashMap<&str, VecDeque<usize>> = HashMap::new();
    for (j, text) in previous.iter().enumerate() {
        by_text.entry(text.as_str()).or_default().push_back(j);
    }

    let mut previous_paired = vec![false; previous.len()];
    let mut open_current = Vec::new();
    for (i, text) in current.iter().enumerate() {
        match by_text.get_mut(text.as_str()).and_then(VecDeque::pop_front) {
            Some(j) => previous_paired[j] = true,
            None => open_current.push(i),
        }
    }
    let open_previous = (0..previous.len()).filter(|&j| !previous_paired[j]).collect();
    (open_current, open_previous)
}

/// Rows follow `rows`, columns follow `cols`; values are ratios in `[0, 1]`.
fn similarity_matrix(
    rows: &[usize],
    cols: &[usize],
    current: &[String],
    previous: &[String],
    use_parallel: bool,
) -> Vec<Vec<f64>> {
    let row = |&i: &usize| -> Vec<f64> {
        cols.iter()
            .map(|&j| normalized_similarity(&current[i], &previous[j]) / 100.0)
            .collect()
    };
    if use_parallel {
        rows.par_iter().map(row).collect()
    } else {
        rows.iter().map(row).collect()
    }
}

/// Extracts each token's snippet at most once.
struct SnippetCache<'a> {
    tokens: &'a [Token],
    markup: &'a str,
    context_chars: usize,
    snippets: Vec<Option<String>>,
}

impl<'a> SnippetCache<'a> {
    fn new(tokens: &'a [Token], markup: &'a str, cfg: &DiffConfig) -> Self {
        Self {
            tokens,
            markup,
            context_chars: cfg.snippet_context_chars,
            snippets: vec![None; tokens.len()],
        }
    }

    fn get(&mut self, index: usize) -> String {
        let (tokens, markup, context_chars) = (self.tokens, self.markup, self.context_chars);
        self.snippets[index]
            .get_or_insert_with(|| extract_snippet(&tokens[index].content, markup, context_chars))
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::labels::Labels;

    fn cfg() -> DiffConfig {
        DiffConfig::default()
    }

    #[test]
    fn identical_documents_have_no_changes() {
        let markup = "<p>Điều 1. Phạm vi điều chỉnh.</p><p>Điều 2. Đối tượng áp dụng.</p>\
                      <p>Điều 3. Hiệu lực thi hành.</p>";
        let outcome = diff_documents(markup, markup, &cfg()).expect("diff");
        assert!(outcome.is_empty());
    }

    #[test]
    fn new_article_is_a_single_addition() {
        let previous = "<p>Điều 1. Abc.</p>";
        let current = "<p>Điều 1. Abc.</p><p>Điều 2. Mới.</p>";
        let outcome = diff_documents(current, previous, &cfg()).expect("diff");
        assert_eq!(outcome.additions.len(), 1);
        assert!(outcome.additions[0].content.contains("Điều 2"));
        assert_eq!(outcome.additions[0].location, "Đoạn 2");
        assert!(outcome.deletions.is_empty());
        assert!(outcome.modifications.is_empty());
    }

    #[test]
    fn removed_article_is_a_deletion() {
        let previous = "<p>Điều 1. Abc.</p><p>Điều 2. Hết hiệu lực từ năm sau.</p>";
        let current = "<p>Điều 1. Abc.</p>";
        let outcome = diff_documents(current, previous, &cfg()).expect("diff");
        assert!(outcome.additions.is_empty());
        assert_eq!(outcome.deletions.len(), 1);
        assert_eq!(outcome.deletions[0].location, "Đoạn 2 (trong văn bản cũ)");
        assert!(outcome.deletions[0].content.contains("Hết hiệu lực"));
    }

    #[test]
    fn appended_sentence_is_the_only_addition() {
        let original = "<p>Điều 1. Luật này quy định về thuế thu nhập doanh nghiệp.</p>\
                        <p>Điều 2. Người nộp thuế là tổ chức có thu nhập chịu thuế.</p>";
        let amended = format!("{original}<p>Điều 3. Luật này có hiệu lực từ ngày 01/01/2025.</p>");
        let outcome = diff_documents(&amended, original, &cfg()).expect("diff");
        assert_eq!(outcome.additions.len(), 1);
        assert!(outcome.additions[0].content.contains("Điều 3"));
        assert!(outcome.deletions.is_empty());
    }

    #[test]
    fn appended_sentence_inside_long_paragraph() {
        let base = "Điều 1. Văn bản này quy định chi tiết về phạm vi điều chỉnh và đối tượng \
                    áp dụng của thuế thu nhập doanh nghiệp trên toàn quốc. Các tổ chức và cá \
                    nhân có liên quan phải tuân thủ đầy đủ quy định tại văn bản này cùng các \
                    văn bản hướng dẫn thi hành khác. Cơ quan thuế các cấp chịu trách nhiệm \
                    hướng dẫn, kiểm tra, thanh tra và xử lý vi phạm theo đúng thẩm quyền được \
                    pháp luật giao.";
        let extra = " Trường hợp điều ước quốc tế mà Việt Nam là thành viên có quy định \
                     khác thì áp dụng theo điều ước quốc tế đó.";
        let previous = format!("<p>{base}</p>");
        let current = format!("<p>{base}{extra}</p>");

        let outcome = diff_documents(&current, &previous, &cfg()).expect("diff");
        assert_eq!(outcome.additions.len(), 1, "{outcome:?}");
        assert!(outcome.additions[0].content.contains("điều ước quốc tế"));
        assert!(outcome.deletions.is_empty());
    }

    const DUTY: &str = "Điều 5. Doanh nghiệp có trách nhiệm kê khai, nộp thuế đầy đủ và đúng hạn \
                        theo quy định của pháp luật về quản lý thuế hiện hành.";
    const LATE: &str = "Trường hợp chậm nộp thuế thì người nộp thuế phải nộp tiền chậm nộp tính \
                        trên số tiền thuế chậm nộp và số ngày chậm nộp thực tế.";
    const SHORT_TAIL: &str = "Bộ Tài chính hướng dẫn chi tiết thủ tục kê khai và nộp thuế.";

    fn long_paragraph_with(extra: &str) -> String {
        let mut text = format!("{DUTY} {LATE} {SHORT_TAIL}");
        if !extra.is_empty() {
            text.push(' ');
            text.push_str(extra);
        }
        format!("<p>{text}</p>")
    }

    #[test]
    fn short_sentence_merged_into_short_tail_is_a_modification() {
        // The tail chunk is under min_sentence_chars, so the new sentence
        // joins it; the merged chunk stays within the modification band.
        let previous = long_paragraph_with("");
        let current = long_paragraph_with("Trừ trường hợp bất khả kháng.");

        let outcome = diff_documents(&current, &previous, &cfg()).expect("diff");
        assert!(outcome.additions.is_empty(), "{outcome:?}");
        assert!(outcome.deletions.is_empty(), "{outcome:?}");
        assert_eq!(outcome.modifications.len(), 1);
        let modification = &outcome.modifications[0];
        assert!(modification.new_content.contains("bất khả kháng"));
        assert!(modification.old_content.contains("Bộ Tài chính"));
    }

    #[test]
    fn long_sentence_merged_into_short_tail_is_addition_and_deletion() {
        // Merged chunk is dominated by the new text and falls below the
        // addition threshold against the old tail.
        let previous = long_paragraph_with("");
        let current = long_paragraph_with(
            "Cơ quan thuế có quyền kiểm tra, thanh tra việc kê khai, nộp thuế của doanh \
             nghiệp và xử lý vi phạm theo đúng thẩm quyền được giao.",
        );

        let outcome = diff_documents(&current, &previous, &cfg()).expect("diff");
        assert!(outcome.modifications.is_empty(), "{outcome:?}");
        assert_eq!(outcome.additions.len(), 1);
        assert!(outcome.additions[0].content.contains("Cơ quan thuế có quyền"));
        assert_eq!(outcome.deletions.len(), 1);
        assert!(outcome.deletions[0].content.contains("Bộ Tài chính"));
    }

    #[test]
    fn moderate_rewording_is_a_modification() {
        let previous = "<p>Điều 4. Thuế suất phổ thông là 20 phần trăm.</p>";
        let current = "<p>Điều 4. Thuế suất phổ thông là 15 phần trăm kể từ 2025.</p>";
        let outcome = diff_documents(current, previous, &cfg()).expect("diff");
        assert!(outcome.additions.is_empty());
        assert!(outcome.deletions.is_empty());
        assert_eq!(outcome.modifications.len(), 1);
        let modification = &outcome.modifications[0];
        assert!(modification.old_content.contains("20 phần trăm"));
        assert!(modification.new_content.contains("15 phần trăm"));
        assert_eq!(modification.location, "Đoạn 1 (hiện tại) / Đoạn 1 (cũ)");
    }

    #[test]
    fn near_identical_text_is_unchanged() {
        let previous = "<p>Điều 5. Người nộp thuế có trách nhiệm kê khai đầy đủ.</p>";
        let current = "<p>Điều 5. Người nộp thuế có trách nhiệm kê khai đầy đủ,</p>";
        let outcome = diff_documents(current, previous, &cfg()).expect("diff");
        assert!(outcome.is_empty(), "{outcome:?}");
    }

    #[test]
    fn empty_sides() {
        let outcome = diff_documents("", "", &cfg()).expect("diff");
        assert!(outcome.is_empty());

        let outcome = diff_documents("<p>Điều 1.</p><p>Điều 2.</p>", "", &cfg()).expect("diff");
        assert_eq!(outcome.additions.len(), 2);

        let outcome = diff_documents("", "<p>Điều 1.</p>", &cfg()).expect("diff");
        assert_eq!(outcome.deletions.len(), 1);
    }

    #[test]
    fn duplicate_paragraphs_pair_one_to_one() {
        let previous = "<p>Bãi bỏ khoản 2.</p>";
        let current = "<p>Bãi bỏ khoản 2.</p><p>Bãi bỏ khoản 2.</p>";
        let outcome = diff_documents(current, previous, &cfg()).expect("diff");
        assert_eq!(outcome.additions.len(), 1);
        assert_eq!(outcome.additions[0].location, "Đoạn 2");
    }

    #[test]
    fn parallel_and_sequential_agree() {
        let previous = "<p>Điều 1. Abc.</p><p>Điều 2. Thuế suất 20%.</p><p>Điều 3. Cũ.</p>";
        let current = "<p>Điều 1. Abc.</p><p>Điều 2. Thuế suất 15%.</p><p>Điều 4. Mới hẳn.</p>";
        let sequential = diff_documents(current, previous, &cfg()).expect("diff");
        let parallel = diff_documents(current, previous, &cfg().with_parallel(true)).expect("diff");
        assert_eq!(sequential, parallel);
    }

    #[test]
    fn english_labels() {
        let cfg = cfg().with_labels(Labels::English);
        let outcome =
            diff_documents("<p>Điều 1. Abc.</p><p>Điều 2. Mới.</p>", "<p>Điều 1. Abc.</p>", &cfg)
                .expect("diff");
        assert_eq!(outcome.additions[0].location, "Paragraph 2");
    }

    #[test]
    fn invalid_config_is_rejected() {
        let cfg = cfg().with_thresholds(0.9, 0.1);
        assert!(matches!(
            diff_documents("a", "b", &cfg),
            Err(DiffError::InvalidConfig(_))
        ));
    }

    #[test]
    fn bands_partition_the_range() {
        let cfg = cfg();
        assert_eq!(PairBand::of(0.0, &cfg), PairBand::Unrelated);
        assert_eq!(PairBand::of(0.599, &cfg), PairBand::Unrelated);
        assert_eq!(PairBand::of(0.6, &cfg), PairBand::Modified);
        assert_eq!(PairBand::of(0.85, &cfg), PairBand::Modified);
        assert_eq!(PairBand::of(0.851, &cfg), PairBand::Unchanged);
        assert_eq!(PairBand::of(1.0, &cfg), PairBand::Unchanged);
    }

    #[test]
    fn modification_serializes_camel_case() {
        let entry = ModificationEntry {
            old_content: "<p>a</p>".into(),
            new_content: "<p>b</p>".into(),
            location: "Đoạn 1 (hiện tại) / Đoạn 1 (cũ)".into(),
        };
        let value = serde_json::to_value(&entry).expect("serialize");
        assert_eq!(value["oldContent"], "<p>a</p>");
        assert_eq!(value["newContent"], "<p>b</p>");
    }
}
