//! Typed feed identifiers.
//!
//! A feed is addressed by a `group` (the feed kind: `user`, `timeline`,
//! `notification`, ...) and an `id` within that group. On the wire and in logs
//! the pair is written as `"group:id"`, the *fid*. Entity ids (activities,
//! comments, users) stay plain `String`s because the server owns their format.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Separator between group and id in the fid form.
const FID_SEPARATOR: char = ':';

/// A feed identifier (`group:id`).
#[derive(Clone, Hash, Eq, PartialEq, Ord, PartialOrd, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FeedId {
    group: String,
    id: String,
}

/// Error parsing a fid string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FeedIdError {
    #[error("fid '{0}' is missing the ':' separator")]
    MissingSeparator(String),
    #[error("fid '{0}' has an empty group")]
    EmptyGroup(String),
    #[error("fid '{0}' has an empty id")]
    EmptyId(String),
}

impl FeedId {
    /// Build from already-validated parts.
    pub fn new(group: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            group: group.into(),
            id: id.into(),
        }
    }

    /// Parse `"group:id"`. The id part may itself contain `:`.
    pub fn parse(fid: &str) -> Result<Self, FeedIdError> {
        let (group, id) = fid
            .split_once(FID_SEPARATOR)
            .ok_or_else(|| FeedIdError::MissingSeparator(fid.to_string()))?;
        if group.is_empty() {
            return Err(FeedIdError::EmptyGroup(fid.to_string()));
        }
        if id.is_empty() {
            return Err(FeedIdError::EmptyId(fid.to_string()));
        }
        Ok(Self::new(group, id))
    }

    /// The feed group (`user`, `timeline`, ...).
    pub fn group(&self) -> &str {
        &self.group
    }

    /// The id within the group.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The `"group:id"` form.
    pub fn fid(&self) -> String {
        format!("{}{}{}", self.group, FID_SEPARATOR, self.id)
    }
}

impl FromStr for FeedId {
    type Err = FeedIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for FeedId {
    type Error = FeedIdError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<FeedId> for String {
    fn from(id: FeedId) -> String {
        id.fid()
    }
}

impl fmt::Display for FeedId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.group, FID_SEPARATOR, self.id)
    }
}

impl fmt::Debug for FeedId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FeedId({self})")
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_fid() {
        let fid = FeedId::parse("user:alice").unwrap();
        assert_eq!(fid.group(), "user");
        assert_eq!(fid.id(), "alice");
        assert_eq!(fid.fid(), "user:alice");
        assert_eq!(fid.to_string(), "user:alice");
    }

    #[test]
    fn test_parse_keeps_colons_in_id() {
        let fid = FeedId::parse("story:2024:summer").unwrap();
        assert_eq!(fid.group(), "story");
        assert_eq!(fid.id(), "2024:summer");
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(
            FeedId::parse("alice"),
            Err(FeedIdError::MissingSeparator("alice".into()))
        );
        assert_eq!(FeedId::parse(":alice"), Err(FeedIdError::EmptyGroup(":alice".into())));
        assert_eq!(FeedId::parse("user:"), Err(FeedIdError::EmptyId("user:".into())));
    }

    #[test]
    fn test_serde_as_string() {
        let fid = FeedId::new("timeline", "bob");
        let json = serde_json::to_string(&fid).unwrap();
        assert_eq!(json, "\"timeline:bob\"");
        let back: FeedId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, fid);
        assert!(serde_json::from_str::<FeedId>("\"nope\"").is_err());
    }
}
