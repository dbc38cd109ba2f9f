//! Post nodes for the in-memory thread forest.
//!
//! A post is either a root (depth 0) or a reply to another post. Posts are
//! stored flat in the forest arena; a node refers to its replies by id, in
//! the order they were appended.
//!
//! Two shapes are exposed:
//! - [`PostNode`]: the arena node, read through a [`Forest`](super::Forest)
//! - [`PostTree`]: an owned, nested copy for presentation and JSON export

use crate::error::{Result, ThreadError};
use crate::forum::constants::MAX_REPLY_DEPTH;
use crate::forum::types::PostId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Validated post body.
///
/// Construction trims leading and trailing whitespace; the trimmed text is
/// what gets stored.
#[derive(Clone, PartialEq, Eq)]
pub struct PostContent {
    body: String,
}

impl fmt::Debug for PostContent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PostContent")
            .field("body_len", &self.body.len())
            .finish()
    }
}

impl PostContent {
    /// Validates and trims a post body.
    ///
    /// # Errors
    /// Returns a validation error if the body is empty after trimming or
    /// exceeds `max_size` bytes.
    pub fn new(raw: &str, max_size: usize) -> Result<Self> {
        let body = raw.trim();
        if body.is_empty() {
            return Err(ThreadError::validation("Post body cannot be empty"));
        }
        if body.len() > max_size {
            return Err(ThreadError::validation(format!(
                "Post body exceeds maximum size of {} bytes",
                max_size
            )));
        }

        Ok(Self {
            body: body.to_string(),
        })
    }

    /// Returns the trimmed body.
    pub fn as_str(&self) -> &str {
        &self.body
    }

    pub(crate) fn into_string(self) -> String {
        self.body
    }
}

/// A post as stored in the forest arena.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostNode {
    id: PostId,
    parent: Option<PostId>,
    content: String,
    replies: Vec<PostId>,
    likes: u64,
    dislikes: u64,
    created_at: u64,
    depth: usize,
}

impl PostNode {
    pub(crate) fn root(id: PostId, content: PostContent, created_at: u64) -> Self {
        Self {
            id,
            parent: None,
            content: content.into_string(),
            replies: Vec::new(),
            likes: 0,
            dislikes: 0,
            created_at,
            depth: 0,
        }
    }

    pub(crate) fn reply(
        id: PostId,
        parent: &PostNode,
        content: PostContent,
        created_at: u64,
    ) -> Self {
        Self {
            id,
            parent: Some(parent.id),
            content: content.into_string(),
            replies: Vec::new(),
            likes: 0,
            dislikes: 0,
            created_at,
            depth: parent.depth + 1,
        }
    }

    /// Returns the post id.
    pub fn id(&self) -> PostId {
        self.id
    }

    /// Returns the id of the post this one replies to, if any.
    pub fn parent(&self) -> Option<PostId> {
        self.parent
    }

    /// Returns the post body.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Returns reply ids, oldest first.
    pub fn replies(&self) -> &[PostId] {
        &self.replies
    }

    /// Returns the like counter.
    pub fn likes(&self) -> u64 {
        self.likes
    }

    /// Returns the dislike counter.
    pub fn dislikes(&self) -> u64 {
        self.dislikes
    }

    /// Returns the creation timestamp in milliseconds.
    pub fn created_at(&self) -> u64 {
        self.created_at
    }

    /// Returns the number of ancestor edges to this post's root.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Returns true if this post still accepts replies.
    pub fn accepts_replies(&self) -> bool {
        self.depth < MAX_REPLY_DEPTH
    }

    pub(crate) fn push_reply(&mut self, child: PostId) {
        self.replies.push(child);
    }

    /// Computes the counters that result from applying signed deltas.
    ///
    /// Fails without side effects if either counter would drop below zero.
    pub(crate) fn checked_vote_delta(&self, likes: i64, dislikes: i64) -> Result<(u64, u64)> {
        let new_likes = shift(self.likes, likes).ok_or(ThreadError::NothingToRetract {
            post: self.id,
            counter: "like",
        })?;
        let new_dislikes = shift(self.dislikes, dislikes).ok_or(ThreadError::NothingToRetract {
            post: self.id,
            counter: "dislike",
        })?;
        Ok((new_likes, new_dislikes))
    }

    pub(crate) fn set_counters(&mut self, likes: u64, dislikes: u64) {
        self.likes = likes;
        self.dislikes = dislikes;
    }
}

fn shift(value: u64, delta: i64) -> Option<u64> {
    if delta >= 0 {
        value.checked_add(delta as u64)
    } else {
        value.checked_sub(delta.unsigned_abs())
    }
}

/// Owned, nested copy of a post and all of its replies.
///
/// This is the shape handed to presentational collaborators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostTree {
    /// Post id.
    pub id: PostId,
    /// Trimmed post body.
    pub content: String,
    /// Replies, oldest first.
    pub replies: Vec<PostTree>,
    /// Like counter.
    pub likes: u64,
    /// Dislike counter.
    pub dislikes: u64,
    /// Creation timestamp in milliseconds since Unix epoch.
    pub created_at: u64,
    /// Number of ancestor edges to the root.
    pub depth: usize,
}

impl PostTree {
    /// Total number of posts in this subtree, including this one.
    pub fn subtree_len(&self) -> usize {
        1 + self.replies.iter().map(PostTree::subtree_len).sum::<usize>()
    }

    /// Finds a post by id in this subtree.
    pub fn find(&self, id: PostId) -> Option<&PostTree> {
        if self.id == id {
            return Some(self);
        }
        self.replies.iter().find_map(|reply| reply.find(id))
    }
}
