//! Client configuration, loaded from RON.
//!
//! ```ron
//! (
//!     current_user_id: "alice",
//!     event_buffer: 512,
//!     enrich_capabilities: true,
//!     comment_sort: best,
//!     log_filter: "debug,feedsync_engine=trace",
//! )
//! ```
//!
//! Every field is optional; missing ones take the defaults from
//! [`crate::constants`].

use std::path::{Path, PathBuf};

use feedsync_engine::state::{ActivityState, CommentThreadState};
use feedsync_engine::{CommentSort, EngineContext};
use feedsync_types::{ActivityData, CommentData, FeedId, PaginationResult};
use serde::{Deserialize, Serialize};

use crate::constants::{
    CONFIG_FILE_NAME, DEFAULT_COMMENT_SORT, DEFAULT_ENRICH_CAPABILITIES, DEFAULT_EVENT_BUFFER,
    DEFAULT_LOG_FILTER,
};

/// Errors loading a [`ClientConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("RON parse error: {0}")]
    Ron(#[from] ron::error::SpannedError),
    #[error("event_buffer must be at least 1")]
    ZeroBuffer,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Whose own-data the containers track. Empty means anonymous.
    pub current_user_id: String,
    /// Dispatcher queue capacity.
    pub event_buffer: usize,
    /// Rewrite embedded feed capabilities from the capability cache.
    pub enrich_capabilities: bool,
    /// Comment order for threads built by [`ClientConfig::activity_state`]
    /// and [`ClientConfig::comment_thread`].
    pub comment_sort: CommentSort,
    /// Default `EnvFilter` directive; `RUST_LOG` wins when set.
    pub log_filter: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            current_user_id: String::new(),
            event_buffer: DEFAULT_EVENT_BUFFER,
            enrich_capabilities: DEFAULT_ENRICH_CAPABILITIES,
            comment_sort: DEFAULT_COMMENT_SORT,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl ClientConfig {
    pub fn from_ron_str(text: &str) -> Result<Self, ConfigError> {
        let config: ClientConfig = ron::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_ron_str(&text)
    }

    /// Load `feedsync.ron` from `dir` if present, defaults otherwise.
    pub fn discover(dir: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = dir.as_ref().join(CONFIG_FILE_NAME);
        if path.is_file() {
            tracing::debug!("loading config from {}", path.display());
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn with_user(mut self, user_id: impl Into<String>) -> Self {
        self.current_user_id = user_id.into();
        self
    }

    pub fn context(&self) -> EngineContext {
        EngineContext::new(self.current_user_id.as_str())
    }

    /// Activity detail container, comments ordered by `comment_sort`.
    pub fn activity_state(
        &self,
        activity: ActivityData,
        fid: Option<FeedId>,
        comments: PaginationResult<CommentData>,
    ) -> ActivityState {
        ActivityState::seeded(activity, fid, self.comment_sort, comments)
    }

    pub fn comment_thread(&self, object_id: impl Into<String>, parent_id: Option<String>) -> CommentThreadState {
        CommentThreadState::new(object_id, parent_id, self.comment_sort)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.event_buffer == 0 {
            return Err(ConfigError::ZeroBuffer);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_ron_uses_defaults() {
        let config = ClientConfig::from_ron_str("()").unwrap();
        assert_eq!(config, ClientConfig::default());
        assert_eq!(config.event_buffer, DEFAULT_EVENT_BUFFER);
    }

    #[test]
    fn test_full_ron() {
        let config = ClientConfig::from_ron_str(
            r#"(
                current_user_id: "alice",
                event_buffer: 8,
                enrich_capabilities: false,
                comment_sort: best,
                log_filter: "debug",
            )"#,
        )
        .unwrap();
        assert_eq!(config.current_user_id, "alice");
        assert_eq!(config.event_buffer, 8);
        assert!(!config.enrich_capabilities);
        assert_eq!(config.comment_sort, CommentSort::Best);
        assert!(config.context().is_current_user("alice"));
    }

    #[test]
    fn test_comment_sort_drives_containers() {
        let config = ClientConfig::from_ron_str("(comment_sort: first)").unwrap();
        let thread = config.comment_thread("a1", None);
        assert_eq!(thread.sort, CommentSort::First);

        let state = config.activity_state(
            ActivityData::new("a1", feedsync_types::UserData::with_id("bob"), 1),
            None,
            PaginationResult::default(),
        );
        assert_eq!(state.comments.sort, CommentSort::First);
        assert_eq!(ClientConfig::default().comment_thread("a1", None).sort, DEFAULT_COMMENT_SORT);
    }

    #[test]
    fn test_rejects_zero_buffer() {
        let err = ClientConfig::from_ron_str("(event_buffer: 0)").unwrap_err();
        assert!(matches!(err, ConfigError::ZeroBuffer));
    }

    #[test]
    fn test_parse_error_is_typed() {
        let err = ClientConfig::from_ron_str("(event_buffer: \"lots\")").unwrap_err();
        assert!(matches!(err, ConfigError::Ron(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = ClientConfig::load("/nonexistent/feedsync.ron").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_discover_without_file_is_default() {
        let config = ClientConfig::discover("/nonexistent").unwrap();
        assert_eq!(config, ClientConfig::default());
    }
}
