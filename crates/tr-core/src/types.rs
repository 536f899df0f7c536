//! Common types used throughout Issue Tracker RS

use serde::{Deserialize, Serialize};

/// Ordering applied to list queries
///
/// Every list in the tracker defaults to newest-first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    #[default]
    NewestFirst,
    OldestFirst,
}

impl SortOrder {
    /// SQL fragment for `ORDER BY`
    pub fn sql(&self) -> &'static str {
        match self {
            Self::NewestFirst => "created_at DESC, id DESC",
            Self::OldestFirst => "created_at ASC, id ASC",
        }
    }

    pub fn is_descending(&self) -> bool {
        matches!(self, Self::NewestFirst)
    }
}
