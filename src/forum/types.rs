//! Forum-specific identifier and vote types.
//!
//! - `PostId`: opaque, never-reused identifier of a post
//! - `VoterId`: caller-supplied identity of whoever casts a tracked vote
//! - `VoteState`: a voter's current vote on one post

use crate::error::{Result, ThreadError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Opaque identifier of a post.
///
/// Ids are handed out by the store from a monotonic counter, so they are
/// unique for the lifetime of the store and never reused. Callers must not
/// assume any structure beyond uniqueness and stability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PostId(u64);

impl PostId {
    /// Creates a PostId from its raw value.
    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw value.
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl FromStr for PostId {
    type Err = ThreadError;

    /// Parses `#12` or `12`.
    fn from_str(s: &str) -> Result<Self> {
        let digits = s.trim().trim_start_matches('#');
        digits
            .parse::<u64>()
            .map(PostId)
            .map_err(|_| ThreadError::validation(format!("Invalid post id: {:?}", s)))
    }
}

/// Identity of a voter for tracked votes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VoterId(String);

impl VoterId {
    /// Creates a voter id.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the voter id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VoterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for VoterId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// A voter's current vote on a single post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteState {
    /// No active vote.
    #[default]
    None,
    /// The voter currently likes the post.
    Liked,
    /// The voter currently dislikes the post.
    Disliked,
}

impl VoteState {
    /// Returns the state a like/dislike click moves to from this one.
    ///
    /// Clicking the active direction retracts it; clicking the other
    /// direction switches to it.
    pub fn toggled(self, is_like: bool) -> Self {
        match (self, is_like) {
            (VoteState::Liked, true) | (VoteState::Disliked, false) => VoteState::None,
            (_, true) => VoteState::Liked,
            (_, false) => VoteState::Disliked,
        }
    }

    /// Contribution of this state to the (likes, dislikes) counters.
    pub(crate) fn weights(self) -> (i64, i64) {
        match self {
            VoteState::None => (0, 0),
            VoteState::Liked => (1, 0),
            VoteState::Disliked => (0, 1),
        }
    }
}

impl fmt::Display for VoteState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VoteState::None => write!(f, "none"),
            VoteState::Liked => write!(f, "like"),
            VoteState::Disliked => write!(f, "dislike"),
        }
    }
}

impl FromStr for VoteState {
    type Err = ThreadError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" | "clear" => Ok(VoteState::None),
            "like" | "liked" | "up" => Ok(VoteState::Liked),
            "dislike" | "disliked" | "down" => Ok(VoteState::Disliked),
            other => Err(ThreadError::validation(format!(
                "Unknown vote state '{}' (expected like, dislike or none)",
                other
            ))),
        }
    }
}

/// Returns the current Unix timestamp in milliseconds.
pub fn current_timestamp_millis() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
