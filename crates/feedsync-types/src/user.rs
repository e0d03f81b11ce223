//! User records embedded in every authored entity.

use serde::{Deserialize, Serialize};

/// The author of an activity, comment, reaction, vote, or bookmark.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserData {
    pub id: String,
    pub name: Option<String>,
    pub image: Option<String>,
}

impl UserData {
    /// A user with only an id; enough for ownership checks.
    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    /// Display name, falling back to the id.
    pub fn display_name(&self) -> &str {
        match self.name.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ => &self.id,
        }
    }
}
