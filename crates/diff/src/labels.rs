//! Human-readable text attached to comparison output.
//!
//! Locations are 1-based paragraph ordinals. Summaries and warnings are small
//! markup fragments because the consumer renders them as-is.

use std::fmt;

use canonical::escape_markup;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Labels {
    #[default]
    Vietnamese,
    English,
}

impl Labels {
    pub fn addition_location(self, paragraph_index: usize) -> String {
        match self {
            Labels::Vietnamese => format!("Đoạn {}", paragraph_index + 1),
            Labels::English => format!("Paragraph {}", paragraph_index + 1),
        }
    }

    pub fn deletion_location(self, paragraph_index: usize) -> String {
        match self {
            Labels::Vietnamese => format!("Đoạn {} (trong văn bản cũ)", paragraph_index + 1),
            Labels::English => format!("Paragraph {} (previous version)", paragraph_index + 1),
        }
    }

    pub fn modification_location(self, current_index: usize, previous_index: usize) -> String {
        match self {
            Labels::Vietnamese => format!(
                "Đoạn {} (hiện tại) / Đoạn {} (cũ)",
                current_index + 1,
                previous_index + 1
            ),
            Labels::English => format!(
                "Paragraph {} (current) / Paragraph {} (previous)",
                current_index + 1,
                previous_index + 1
            ),
        }
    }

    /// Placeholder for a document without a title.
    pub fn untitled(self) -> &'static str {
        match self {
            Labels::Vietnamese => "Không có tiêu đề",
            Labels::English => "Untitled",
        }
    }

    /// Placeholder for a document without a type.
    pub fn unknown_type(self) -> &'static str {
        match self {
            Labels::Vietnamese => "Không xác định",
            Labels::English => "Unknown",
        }
    }

    pub fn current_version(self) -> &'static str {
        match self {
            Labels::Vietnamese => "Hiện hành",
            Labels::English => "Current",
        }
    }

    pub fn previous_version(self) -> &'static str {
        match self {
            Labels::Vietnamese => "Phiên bản trước",
            Labels::English => "Previous version",
        }
    }

    /// Type names are escaped before they are placed in the markup.
    pub fn type_mismatch_warning(self, current_type: &str, previous_type: &str) -> String {
        let current_type = escape_markup(current_type);
        let previous_type = escape_markup(previous_type);
        let body = match self {
            Labels::Vietnamese => format!(
                "<strong>Cảnh báo:</strong> Đang so sánh hai loại văn bản khác nhau \
                 ({current_type} và {previous_type})."
            ),
            Labels::English => format!(
                "<strong>Warning:</strong> Comparing documents of different types \
                 ({current_type} and {previous_type})."
            ),
        };
        warning_block(&body)
    }

    pub fn title_mismatch_warning(self, title_similarity: u32) -> String {
        let body = match self {
            Labels::Vietnamese => format!(
                "<strong>Cảnh báo:</strong> Hai văn bản có tiêu đề khá khác nhau \
                 (chỉ giống {title_similarity}%)."
            ),
            Labels::English => format!(
                "<strong>Warning:</strong> The titles differ considerably \
                 (only {title_similarity}% alike)."
            ),
        };
        warning_block(&body)
    }

    /// Change counts plus the approximate-detection caveat.
    pub fn summary(self, additions: usize, deletions: usize, modifications: usize) -> String {
        match self {
            Labels::Vietnamese => format!(
                "<p>Phân tích văn bản đã tìm thấy:</p>\
                 <ul>\
                 <li><strong>{additions}</strong> phần thêm mới</li>\
                 <li><strong>{deletions}</strong> phần đã xóa</li>\
                 <li><strong>{modifications}</strong> phần được sửa đổi</li>\
                 </ul>\
                 <p><strong>Lưu ý:</strong> Kết quả được phát hiện tự động theo độ tương \
                 đồng văn bản và chỉ mang tính gần đúng.</p>"
            ),
            Labels::English => format!(
                "<p>The analysis found:</p>\
                 <ul>\
                 <li><strong>{additions}</strong> added passages</li>\
                 <li><strong>{deletions}</strong> deleted passages</li>\
                 <li><strong>{modifications}</strong> modified passages</li>\
                 </ul>\
                 <p><strong>Note:</strong> Changes are detected automatically from text \
                 similarity and are approximate.</p>"
            ),
        }
    }
}

impl fmt::Display for Labels {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Labels::Vietnamese => "vietnamese",
            Labels::English => "english",
        })
    }
}

fn warning_block(body: &str) -> String {
    format!("<div class=\"warning-message\">{body}</div>")
}
