//! Client-side reconciliation engine for activity feeds.
//!
//! Containers hold ordered, deduplicated snapshots of remote collections and
//! fold two streams of changes into them: local optimistic writes and pushed
//! server events. Both arrive as [`StateUpdateEvent`]s.
//!
//! # Layers
//!
//! ```text
//! sort ─► collections ─► counters / own_data ─► mutations ─► state::* ─► Container
//!                                                              ▲
//!                                   scope + events ────────────┘
//! ```
//!
//! - [`sort`]: sort fields, directions, composed comparators.
//! - [`collections`]: pure upsert / sorted insert / tree update primitives.
//! - [`counters`]: time-guarded reaction-group counters.
//! - [`own_data`]: keeps the current user's slice across remote snapshots.
//! - [`mutations`]: per-entity reactions, comments, bookmarks, votes, follows.
//! - [`state`]: one state type per container kind, each an [`ApplyEvent`].
//! - [`container`]: watch-channel wrapper publishing snapshots on change.
//! - [`handler`]: [`StateHandler`], the closed set of container kinds.
//!
//! Nothing here performs I/O. Normalizing wire messages, enrichment, and the
//! dispatcher task live in `feedsync-client`.

pub mod collections;
pub mod comment_tree;
pub mod container;
pub mod context;
pub mod counters;
pub mod events;
pub mod handler;
pub mod mutations;
pub mod own_data;
pub mod policy;
pub mod scope;
pub mod sort;
pub mod state;

pub use container::{ApplyEvent, Container};
pub use context::EngineContext;
pub use events::StateUpdateEvent;
pub use handler::StateHandler;
pub use own_data::{OwnData, merge_remote};
pub use policy::{ActivityFilter, ActivityQuery, InsertionAction, on_new_activity};
pub use scope::Scope;
pub use sort::{CommentSort, Comparator, Sort, SortDirection, SortField, SortRequest};
