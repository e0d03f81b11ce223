//! Cursor pagination, the shape of every snapshot fetch.

use serde::{Deserialize, Serialize};

/// Cursor pair returned alongside a page.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaginationData {
    pub next: Option<String>,
    pub previous: Option<String>,
}

impl PaginationData {
    pub fn has_next(&self) -> bool {
        self.next.is_some()
    }
}

/// One page of records plus its cursors.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PaginationResult<T> {
    pub models: Vec<T>,
    #[serde(default)]
    pub pagination: PaginationData,
}

impl<T> PaginationResult<T> {
    pub fn new(models: Vec<T>, pagination: PaginationData) -> Self {
        Self { models, pagination }
    }
}

impl<T> Default for PaginationResult<T> {
    fn default() -> Self {
        Self {
            models: Vec::new(),
            pagination: PaginationData::default(),
        }
    }
}
