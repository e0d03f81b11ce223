//! Client configuration constants.
//!
//! Centralizes default values so [`crate::config::ClientConfig`] and the
//! replay tool agree on them.

use feedsync_engine::CommentSort;

/// Capacity of the dispatcher's command queue.
///
/// Pushed events wait here while the dispatcher applies earlier ones; a full
/// queue applies backpressure to the producer instead of dropping events.
pub const DEFAULT_EVENT_BUFFER: usize = 256;

/// Whether capability enrichment runs before dispatch.
pub const DEFAULT_ENRICH_CAPABILITIES: bool = true;

/// Ordering for comment threads created without an explicit sort.
pub const DEFAULT_COMMENT_SORT: CommentSort = CommentSort::Last;

/// `EnvFilter` directive used when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "info,feedsync_engine=info,feedsync_client=info";

/// File name looked up for configuration next to the working directory.
pub const CONFIG_FILE_NAME: &str = "feedsync.ron";
