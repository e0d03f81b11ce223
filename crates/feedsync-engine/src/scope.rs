//! Event scope tokens.
//!
//! A push event either names the feed it concerns or it does not. Unscoped
//! events may still apply anywhere their content matches, so [`Scope::matches`]
//! accepts them; per-feed concepts (pins, membership) use
//! [`Scope::strictly_matches`], which does not.

use feedsync_types::FeedId;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Scope {
    /// The event carried no usable feed id.
    #[default]
    Unknown,
    /// The event concerns exactly this feed.
    Specific(FeedId),
}

impl Scope {
    /// Scope from an optional wire `fid`; anything unparseable is `Unknown`.
    pub fn from_fid(fid: Option<&str>) -> Self {
        match fid.map(FeedId::parse) {
            Some(Ok(fid)) => Scope::Specific(fid),
            _ => Scope::Unknown,
        }
    }

    /// Does the event apply to a container bound to `fid` at all?
    pub fn matches(&self, fid: &FeedId) -> bool {
        match self {
            Scope::Unknown => true,
            Scope::Specific(scoped) => scoped == fid,
        }
    }

    /// Like [`Scope::matches`], but an unscoped event matches nothing.
    pub fn strictly_matches(&self, fid: &FeedId) -> bool {
        match self {
            Scope::Unknown => false,
            Scope::Specific(scoped) => scoped == fid,
        }
    }

    pub fn fid(&self) -> Option<&FeedId> {
        match self {
            Scope::Unknown => None,
            Scope::Specific(fid) => Some(fid),
        }
    }
}

impl From<FeedId> for Scope {
    fn from(fid: FeedId) -> Self {
        Scope::Specific(fid)
    }
}
