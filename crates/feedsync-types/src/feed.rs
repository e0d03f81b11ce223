//! Feeds, follows, memberships, and the per-user capability flags.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, IntoStaticStr};

use crate::ids::FeedId;
use crate::user::UserData;

/// What the current user may do in a feed.
///
/// Capabilities are per-user side data: the server computes them for the
/// authenticated user, and push events frequently omit them.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
    Display, EnumString, IntoStaticStr,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum FeedOwnCapability {
    AddActivity,
    AddActivityReaction,
    AddComment,
    AddCommentReaction,
    BookmarkActivity,
    CreateFeed,
    DeleteFeed,
    DeleteOwnActivity,
    DeleteOwnComment,
    Follow,
    PinActivity,
    QueryFeedMembers,
    QueryFollows,
    ReadActivities,
    ReadFeed,
    Unfollow,
    UpdateFeed,
    UpdateOwnActivity,
    UpdateOwnComment,
    /// A capability this client version does not know about.
    #[serde(other)]
    Unknown,
}

/// Set of capabilities, ordered for stable serialization.
pub type CapabilitySet = BTreeSet<FeedOwnCapability>;

/// A feed's own record.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedData {
    pub fid: FeedId,
    pub name: String,
    pub description: String,
    pub visibility: Option<String>,
    pub created_by: UserData,
    pub follower_count: u32,
    pub following_count: u32,
    pub member_count: u32,
    pub pin_count: u32,
    pub created_at: u64,
    pub updated_at: u64,
    pub deleted_at: Option<u64>,
    /// Own-data: capabilities of the current user in this feed.
    pub own_capabilities: CapabilitySet,
    /// Own-data: follows from the current user's feeds to this feed.
    pub own_follows: Vec<FollowData>,
    /// Own-data: the current user's membership in this feed.
    pub own_membership: Option<FeedMemberData>,
}

impl FeedData {
    pub fn new(fid: FeedId) -> Self {
        Self {
            fid,
            ..Default::default()
        }
    }
}

/// Follow request state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum FollowStatus {
    #[default]
    Accepted,
    Pending,
    Rejected,
    #[serde(other)]
    Unknown,
}

/// A follow edge from `source_feed` to `target_feed`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FollowData {
    pub source_feed: FeedData,
    pub target_feed: FeedData,
    pub status: FollowStatus,
    pub push_preference: String,
    pub request_accepted_at: Option<u64>,
    pub request_rejected_at: Option<u64>,
    pub created_at: u64,
    pub updated_at: u64,
}

impl FollowData {
    /// Same source and target feed.
    pub fn same_edge(&self, other: &Self) -> bool {
        self.source_feed.fid == other.source_feed.fid && self.target_feed.fid == other.target_feed.fid
    }

    /// `fid` is followed by this edge and the follow is accepted.
    pub fn is_follower_of(&self, fid: &FeedId) -> bool {
        self.status == FollowStatus::Accepted && &self.target_feed.fid == fid
    }

    /// `fid` is the follower side and the follow is accepted.
    pub fn is_following_from(&self, fid: &FeedId) -> bool {
        self.status == FollowStatus::Accepted && &self.source_feed.fid == fid
    }

    /// A pending request targeting `fid`.
    pub fn is_request_to(&self, fid: &FeedId) -> bool {
        self.status == FollowStatus::Pending && &self.target_feed.fid == fid
    }
}

/// Membership state of a user in a feed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum MemberStatus {
    #[default]
    Member,
    Pending,
    Rejected,
    #[serde(other)]
    Unknown,
}

/// A user's membership in a feed. Identified by the member's user id.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedMemberData {
    pub user: UserData,
    pub role: String,
    pub status: MemberStatus,
    pub invite_accepted_at: Option<u64>,
    pub invite_rejected_at: Option<u64>,
    pub created_at: u64,
    pub updated_at: u64,
}

impl FeedMemberData {
    pub fn id(&self) -> &str {
        &self.user.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capability_strings() {
        assert_eq!(FeedOwnCapability::AddComment.to_string(), "add-comment");
        assert_eq!("pin-activity".parse::<FeedOwnCapability>(), Ok(FeedOwnCapability::PinActivity));
        let caps: Vec<FeedOwnCapability> =
            serde_json::from_str(r#"["read-feed", "teleport-feed"]"#).unwrap();
        assert_eq!(caps, vec![FeedOwnCapability::ReadFeed, FeedOwnCapability::Unknown]);
    }

    #[test]
    fn test_follow_edge_predicates() {
        let alice = FeedId::new("timeline", "alice");
        let bob = FeedId::new("user", "bob");
        let follow = FollowData {
            source_feed: FeedData::new(alice.clone()),
            target_feed: FeedData::new(bob.clone()),
            ..Default::default()
        };
        assert!(follow.is_follower_of(&bob));
        assert!(follow.is_following_from(&alice));
        assert!(!follow.is_request_to(&bob));

        let pending = FollowData { status: FollowStatus::Pending, ..follow.clone() };
        assert!(pending.is_request_to(&bob));
        assert!(!pending.is_follower_of(&bob));
        assert!(pending.same_edge(&follow));
    }
}
