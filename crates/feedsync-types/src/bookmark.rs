//! Bookmarks and bookmark folders.

use serde::{Deserialize, Serialize};

use crate::activity::ActivityData;
use crate::user::UserData;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BookmarkFolderData {
    pub id: String,
    pub name: String,
    pub created_at: u64,
    pub updated_at: u64,
}

/// A user's bookmark of an activity, optionally filed in a folder.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BookmarkData {
    pub activity: ActivityData,
    pub user: UserData,
    pub folder: Option<BookmarkFolderData>,
    pub created_at: u64,
    pub updated_at: u64,
}

impl BookmarkData {
    /// Same activity, folder, and user.
    pub fn same_identity(&self, other: &Self) -> bool {
        self.activity.id == other.activity.id
            && self.user.id == other.user.id
            && self.folder.as_ref().map(|f| &f.id) == other.folder.as_ref().map(|f| &f.id)
    }
}
