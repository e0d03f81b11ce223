//! The current user's bookmarks and bookmark folders.
//!
//! Bookmark events are never feed scoped; both lists only keep records that
//! belong to the current user.

use feedsync_types::{BookmarkData, BookmarkFolderData, PaginationData, PaginationResult};

use crate::collections::{remove_first, upsert_all_sorted, upsert_sorted, upsert_sorted_with};
use crate::container::ApplyEvent;
use crate::context::EngineContext;
use crate::events::StateUpdateEvent;
use crate::own_data::merge_remote;
use crate::sort::{bookmarks_newest_first, folders_recently_updated};

// ============================================================================
// Bookmarks
// ============================================================================

#[derive(Clone, Debug, Default)]
pub struct BookmarkListState {
    pub bookmarks: Vec<BookmarkData>,
    pub pagination: PaginationData,
}

impl BookmarkListState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(&self, page: PaginationResult<BookmarkData>) -> Self {
        let cmp = bookmarks_newest_first();
        let bookmarks = page.models.into_iter().fold(self.bookmarks.clone(), |acc, b| {
            upsert_sorted_with(&acc, b, BookmarkData::same_identity, &cmp)
        });
        Self {
            bookmarks,
            pagination: page.pagination,
        }
    }

    fn with_bookmarks(&self, bookmarks: Vec<BookmarkData>) -> Option<Self> {
        (bookmarks != self.bookmarks).then(|| Self {
            bookmarks,
            ..self.clone()
        })
    }

    fn map_bookmarks(&self, f: impl Fn(&BookmarkData) -> Option<BookmarkData>) -> Option<Self> {
        let bookmarks = self.bookmarks.iter().map(|b| f(b).unwrap_or_else(|| b.clone())).collect();
        self.with_bookmarks(bookmarks)
    }
}

impl ApplyEvent for BookmarkListState {
    fn matches_scope(&self, _event: &StateUpdateEvent) -> bool {
        true
    }

    fn apply(&self, event: &StateUpdateEvent, ctx: &EngineContext) -> Option<Self> {
        use StateUpdateEvent::*;
        match event {
            BookmarkAdded { bookmark } if ctx.is_current_user(&bookmark.user.id) => self.with_bookmarks(
                upsert_sorted_with(&self.bookmarks, bookmark.clone(), BookmarkData::same_identity, &bookmarks_newest_first()),
            ),
            // A folder move changes identity; match on activity + user.
            BookmarkUpdated { bookmark } if ctx.is_current_user(&bookmark.user.id) => {
                self.with_bookmarks(upsert_sorted_with(
                    &self.bookmarks,
                    bookmark.clone(),
                    |a, b| a.activity.id == b.activity.id && a.user.id == b.user.id,
                    &bookmarks_newest_first(),
                ))
            }
            BookmarkDeleted { bookmark } => remove_first(&self.bookmarks, |b| b.same_identity(bookmark))
                .and_then(|bookmarks| self.with_bookmarks(bookmarks)),
            BookmarkFolderUpdated { folder } => self.map_bookmarks(|b| {
                let current = b.folder.as_ref().filter(|f| f.id == folder.id)?;
                (current != folder).then(|| BookmarkData {
                    folder: Some(folder.clone()),
                    ..b.clone()
                })
            }),
            // Bookmarks outlive their folder; they just lose the reference.
            BookmarkFolderDeleted { folder_id } => self.map_bookmarks(|b| {
                b.folder.as_ref().filter(|f| f.id == *folder_id)?;
                Some(BookmarkData {
                    folder: None,
                    ..b.clone()
                })
            }),
            ActivityUpdated { activity, .. } => self.map_bookmarks(|b| {
                (b.activity.id == activity.id).then(|| BookmarkData {
                    activity: merge_remote(&b.activity, activity.clone(), None),
                    ..b.clone()
                })
            }),
            ActivityDeleted { activity_id, .. } => {
                let bookmarks: Vec<BookmarkData> =
                    self.bookmarks.iter().filter(|b| b.activity.id != *activity_id).cloned().collect();
                self.with_bookmarks(bookmarks)
            }
            _ => None,
        }
    }
}

// ============================================================================
// Folders
// ============================================================================

#[derive(Clone, Debug, Default)]
pub struct BookmarkFolderListState {
    pub folders: Vec<BookmarkFolderData>,
    pub pagination: PaginationData,
}

fn folder_id(folder: &BookmarkFolderData) -> &str {
    &folder.id
}

impl BookmarkFolderListState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(&self, page: PaginationResult<BookmarkFolderData>) -> Self {
        Self {
            folders: upsert_all_sorted(&self.folders, page.models, folder_id, &folders_recently_updated()),
            pagination: page.pagination,
        }
    }

    fn with_folders(&self, folders: Vec<BookmarkFolderData>) -> Option<Self> {
        (folders != self.folders).then(|| Self {
            folders,
            ..self.clone()
        })
    }
}

impl ApplyEvent for BookmarkFolderListState {
    fn matches_scope(&self, _event: &StateUpdateEvent) -> bool {
        true
    }

    fn apply(&self, event: &StateUpdateEvent, ctx: &EngineContext) -> Option<Self> {
        use StateUpdateEvent::*;
        match event {
            BookmarkFolderUpdated { folder } => {
                self.with_folders(upsert_sorted(&self.folders, folder.clone(), folder_id, &folders_recently_updated()))
            }
            BookmarkFolderDeleted { folder_id: id } => {
                remove_first(&self.folders, |f| f.id == *id).and_then(|folders| self.with_folders(folders))
            }
            // Bookmarking into a folder the list has not loaded yet.
            BookmarkAdded { bookmark } | BookmarkUpdated { bookmark } if ctx.is_current_user(&bookmark.user.id) => {
                let folder = bookmark.folder.as_ref()?;
                if self.folders.iter().any(|f| f.id == folder.id) {
                    return None;
                }
                self.with_folders(upsert_sorted(&self.folders, folder.clone(), folder_id, &folders_recently_updated()))
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use feedsync_types::{ActivityData, UserData};

    fn ctx() -> EngineContext {
        EngineContext::new("me")
    }

    fn folder(id: &str, at: u64) -> BookmarkFolderData {
        BookmarkFolderData {
            id: id.into(),
            name: id.to_uppercase(),
            created_at: at,
            updated_at: at,
        }
    }

    fn bookmark(activity: &str, user: &str, folder: Option<BookmarkFolderData>, at: u64) -> BookmarkData {
        BookmarkData {
            activity: ActivityData::new(activity, UserData::with_id("author"), 1),
            user: UserData::with_id(user),
            folder,
            created_at: at,
            updated_at: at,
        }
    }

    #[test]
    fn test_only_own_bookmarks_kept() {
        let list = BookmarkListState::new();
        let theirs = StateUpdateEvent::BookmarkAdded {
            bookmark: bookmark("a1", "bob", None, 1),
        };
        assert!(list.apply(&theirs, &ctx()).is_none());
        let mine = StateUpdateEvent::BookmarkAdded {
            bookmark: bookmark("a1", "me", None, 1),
        };
        let list = list.apply(&mine, &ctx()).unwrap();
        assert_eq!(list.bookmarks.len(), 1);
        assert!(list.apply(&mine, &ctx()).is_none());
    }

    #[test]
    fn test_folder_rename_and_delete_propagate() {
        let list = BookmarkListState::new().with_page(PaginationResult::new(
            vec![bookmark("a1", "me", Some(folder("f1", 1)), 1)],
            PaginationData::default(),
        ));
        let renamed = BookmarkFolderData {
            name: "Reading".into(),
            updated_at: 5,
            ..folder("f1", 1)
        };
        let list = list
            .apply(&StateUpdateEvent::BookmarkFolderUpdated { folder: renamed }, &ctx())
            .unwrap();
        assert_eq!(list.bookmarks[0].folder.as_ref().unwrap().name, "Reading");

        let list = list
            .apply(&StateUpdateEvent::BookmarkFolderDeleted { folder_id: "f1".into() }, &ctx())
            .unwrap();
        assert!(list.bookmarks[0].folder.is_none());
    }

    #[test]
    fn test_folder_list_order_and_discovery() {
        let list = BookmarkFolderListState::new();
        let list = list
            .apply(&StateUpdateEvent::BookmarkFolderUpdated { folder: folder("f1", 1) }, &ctx())
            .unwrap();
        let added = StateUpdateEvent::BookmarkAdded {
            bookmark: bookmark("a1", "me", Some(folder("f2", 2)), 2),
        };
        let list = list.apply(&added, &ctx()).unwrap();
        assert_eq!(list.folders.iter().map(|f| f.id.as_str()).collect::<Vec<_>>(), ["f2", "f1"]);
        assert!(list.apply(&added, &ctx()).is_none());

        let list = list
            .apply(&StateUpdateEvent::BookmarkFolderDeleted { folder_id: "f2".into() }, &ctx())
            .unwrap();
        assert_eq!(list.folders.len(), 1);
    }
}
