use serde::{Deserialize, Serialize};

/// An added or deleted passage.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DiffEntry {
    /// Markup snippet around the passage.
    pub content: String,
    pub location: String,
}

/// A passage present in both versions with moderate changes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ModificationEntry {
    pub old_content: String,
    pub new_content: String,
    pub location: String,
}

/// Classified changes between two token sequences, each list in scan order.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DiffOutcome {
    pub additions: Vec<DiffEntry>,
    pub deletions: Vec<DiffEntry>,
    pub modifications: Vec<ModificationEntry>,
}

impl DiffOutcome {
    pub fn is_empty(&self) -> bool {
        self.additions.is_empty() && self.deletions.is_empty() && self.modifications.is_empty()
    }

    /// `(additions, deletions, modifications)`.
    pub fn counts(&self) -> (usize, usize, usize) {
        (
            self.additions.len(),
            self.deletions.len(),
            self.modifications.len(),
        )
    }
}
