//! Prompt construction and answer parsing for generative ranking.
//!
//! The service is asked for a bracketed list of candidate ids, most similar
//! first. Answers are free text, so parsing takes the first `[...]` group it
//! finds and ignores everything around it.

use once_cell::sync::Lazy;
use regex::Regex;

use corpus::Document;

/// Characters of the target's content included in the prompt.
pub const TARGET_EXCERPT_CHARS: usize = 1000;
/// Characters of each candidate's content included in the prompt.
pub const CANDIDATE_PREVIEW_CHARS: usize = 500;

static ID_LIST: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[(.*?)\]").expect("bracketed id list pattern"));

/// Builds the ranking request for `target` against `candidates`.
pub fn build_ranking_prompt(target: &Document, candidates: &[Document]) -> String {
    let excerpt = if target.has_content() {
        target.content_excerpt(TARGET_EXCERPT_CHARS)
    } else {
        "Không có nội dung"
    };

    let listing = candidates
        .iter()
        .map(|doc| {
            format!(
                "ID: {}, Tiêu đề: {}, Nội dung (phần đầu): {}",
                doc.id,
                doc.title,
                doc.content_excerpt(CANDIDATE_PREVIEW_CHARS)
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n");

    format!(
        "Tôi muốn tìm các văn bản pháp luật tương tự với văn bản hiện tại dựa trên nội dung.\n\
         \n\
         Văn bản hiện tại:\n\
         Tiêu đề: {title}\n\
         Nội dung (phần đầu): {excerpt}\n\
         \n\
         Danh sách các văn bản cần so sánh:\n\
         {listing}\n\
         \n\
         Hãy trả về một danh sách các ID văn bản có nội dung tương đồng với văn bản hiện tại, \
         sắp xếp theo mức độ tương đồng từ cao xuống thấp.\n\
         Chỉ trả về các ID mà có nội dung tương đồng ít nhất 50%.\n\
         Cần phân tích cả nội dung chi tiết không chỉ dựa vào tiêu đề.\n\
         \n\
         Kết quả trả về phải theo định dạng:\n\
         [ID1, ID2, ID3, ...]\n",
        title = target.title,
    )
}

/// Extracts the ranked id list from a free-text answer.
///
/// Takes the first bracketed group, splits on commas, trims whitespace and
/// quotes, and drops empty entries. Returns an empty list when no group is
/// present.
///
/// ```
/// use ranking::parse_ranked_ids;
///
/// assert_eq!(parse_ranked_ids("Kết quả: [12, '7', \"3\"]"), vec!["12", "7", "3"]);
/// assert!(parse_ranked_ids("không tìm thấy").is_empty());
/// ```
pub fn parse_ranked_ids(answer: &str) -> Vec<String> {
    let Some(group) = ID_LIST.captures(answer).and_then(|caps| caps.get(1)) else {
        return Vec::new();
    };

    group
        .as_str()
        .split(',')
        .map(|raw| raw.trim().trim_matches(|c: char| c == '\'' || c == '"').trim())
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_lists_every_candidate_with_preview() {
        let target = Document::new("1", "Nghị định 15/2022/NĐ-CP").with_content("Điều 1. ".repeat(300));
        let candidates = vec![
            Document::new("2", "Nghị định 12/2015/NĐ-CP").with_content("x".repeat(800)),
            Document::new("3", "Nghị định 91/2014/NĐ-CP"),
        ];
        let prompt = build_ranking_prompt(&target, &candidates);

        assert!(prompt.contains("Tiêu đề: Nghị định 15/2022/NĐ-CP"));
        assert!(prompt.contains("ID: 2, Tiêu đề: Nghị định 12/2015/NĐ-CP"));
        assert!(prompt.contains("ID: 3, Tiêu đề: Nghị định 91/2014/NĐ-CP"));
        assert!(prompt.contains(&"x".repeat(500)));
        assert!(!prompt.contains(&"x".repeat(501)));
        assert!(prompt.contains("[ID1, ID2, ID3, ...]"));
    }

    #[test]
    fn prompt_marks_missing_target_content() {
        let prompt = build_ranking_prompt(&Document::new("1", "Luật"), &[]);
        assert!(prompt.contains("Nội dung (phần đầu): Không có nội dung"));
    }

    #[test]
    fn parses_first_bracket_group_only() {
        let ids = parse_ranked_ids("Đây là danh sách: [5, 9 ,  2] và [100]");
        assert_eq!(ids, vec!["5", "9", "2"]);
    }

    #[test]
    fn tolerates_partial_and_malformed_answers() {
        assert!(parse_ranked_ids("").is_empty());
        assert!(parse_ranked_ids("[]").is_empty());
        assert!(parse_ranked_ids("[ , ,]").is_empty());
        assert!(parse_ranked_ids("[1, 2").is_empty());
        assert_eq!(parse_ranked_ids("[\"a-1\", 'b-2']"), vec!["a-1", "b-2"]);
    }
}
