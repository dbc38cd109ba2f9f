//! The thread store: owner of the forest and the only writer to it.
//!
//! Every mutation runs as one read-modify-write under the store's write
//! lock, so concurrent callers are serialized and two replies to the same
//! post both survive. Rejected operations return an error and leave the
//! current snapshot untouched.
//!
//! ## Usage
//!
//! ```
//! use threadstore::forum::ThreadStore;
//!
//! let store = ThreadStore::new();
//! let a = store.create_post("first!").unwrap().post;
//! let b = store.create_reply(a.id(), "welcome", a.depth()).unwrap().post;
//! store.cast_vote(b.id(), true).unwrap();
//!
//! let snapshot = store.snapshot();
//! assert_eq!(snapshot.get(b.id()).unwrap().likes(), 1);
//! ```

use crate::config::StoreConfig;
use crate::error::{Result, ThreadError};
use crate::forum::constants::MAX_REPLY_DEPTH;
use crate::forum::post::{PostContent, PostNode};
use crate::forum::state::Snapshot;
use crate::forum::types::{current_timestamp_millis, PostId, VoteState, VoterId};
use crate::forum::votes::VoteLedger;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{debug, warn};

/// Result of a successful create operation.
#[derive(Debug, Clone)]
pub struct Created {
    /// The new post.
    pub post: PostNode,
    /// Forest snapshot that includes the new post.
    pub snapshot: Snapshot,
}

/// Result of a tracked vote change.
#[derive(Debug, Clone)]
pub struct VoteOutcome {
    /// The voter's state before the change.
    pub previous: VoteState,
    /// The voter's state after the change.
    pub current: VoteState,
    /// Forest snapshot with the adjusted counters.
    pub snapshot: Snapshot,
}

#[derive(Debug, Default)]
struct StoreInner {
    forest: Snapshot,
    votes: VoteLedger,
    next_id: u64,
}

impl StoreInner {
    fn allocate_id(&mut self) -> PostId {
        self.next_id += 1;
        PostId::from_raw(self.next_id)
    }
}

/// In-memory owner of the post forest.
#[derive(Debug, Default)]
pub struct ThreadStore {
    inner: RwLock<StoreInner>,
    config: StoreConfig,
}

impl ThreadStore {
    /// Creates an empty store with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty store with the given configuration.
    pub fn with_config(config: StoreConfig) -> Self {
        Self {
            inner: RwLock::default(),
            config,
        }
    }

    /// Returns the store configuration.
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Returns the current forest snapshot.
    pub fn snapshot(&self) -> Snapshot {
        Arc::clone(&self.read().forest)
    }

    /// Creates a root post at the front of the forest.
    ///
    /// # Errors
    /// `Validation` if the content is empty after trimming or too large.
    pub fn create_post(&self, content: &str) -> Result<Created> {
        let content = self.validate_content(content)?;

        let mut inner = self.write();
        let id = inner.allocate_id();
        let node = PostNode::root(id, content, current_timestamp_millis());
        let created = node.clone();
        Arc::make_mut(&mut inner.forest).push_root(node);

        debug!(post_id = %id, roots = inner.forest.root_count(), "Created post");
        Ok(Created {
            post: created,
            snapshot: Arc::clone(&inner.forest),
        })
    }

    /// Appends a reply to an existing post.
    ///
    /// `parent_depth` is the caller's view of the parent's depth. It must be
    /// below the maximum and must agree with the depth the store recorded.
    ///
    /// # Errors
    /// - `Validation` if the content is invalid or `parent_depth` is stale
    /// - `DepthLimitExceeded` if `parent_depth` is at the maximum
    /// - `NotFound` if no post has `parent_id`
    pub fn create_reply(
        &self,
        parent_id: PostId,
        content: &str,
        parent_depth: usize,
    ) -> Result<Created> {
        let content = self.validate_content(content)?;
        if parent_depth >= MAX_REPLY_DEPTH {
            debug!(parent_id = %parent_id, parent_depth, "Rejected reply beyond depth limit");
            return Err(ThreadError::DepthLimitExceeded {
                depth: parent_depth,
            });
        }

        let mut inner = self.write();
        let recorded = inner
            .forest
            .get(parent_id)
            .map(PostNode::depth)
            .ok_or(ThreadError::NotFound(parent_id))?;
        if recorded != parent_depth {
            warn!(
                parent_id = %parent_id,
                claimed = parent_depth,
                recorded,
                "Rejected reply with stale parent depth"
            );
            return Err(ThreadError::validation(format!(
                "Parent {} is at depth {}, not {}",
                parent_id, recorded, parent_depth
            )));
        }

        Self::append_reply(&mut inner, parent_id, content)
    }

    /// Appends a reply using the parent's recorded depth.
    ///
    /// # Errors
    /// Same as [`create_reply`](Self::create_reply), without the stale-depth case.
    pub fn reply_to(&self, parent_id: PostId, content: &str) -> Result<Created> {
        let content = self.validate_content(content)?;

        let mut inner = self.write();
        let depth = inner
            .forest
            .get(parent_id)
            .map(PostNode::depth)
            .ok_or(ThreadError::NotFound(parent_id))?;
        if depth >= MAX_REPLY_DEPTH {
            debug!(parent_id = %parent_id, depth, "Rejected reply beyond depth limit");
            return Err(ThreadError::DepthLimitExceeded { depth });
        }

        Self::append_reply(&mut inner, parent_id, content)
    }

    /// Adds one like (or one dislike) to a post.
    ///
    /// The counter is anonymous: the store does not remember who voted. Use
    /// [`set_vote`](Self::set_vote) for per-voter tracking.
    pub fn cast_vote(&self, post_id: PostId, is_like: bool) -> Result<Snapshot> {
        let mut inner = self.write();
        let delta = if is_like { (1, 0) } else { (0, 1) };
        Self::apply_delta(&mut inner, post_id, delta)?;

        debug!(post_id = %post_id, is_like, "Cast vote");
        Ok(Arc::clone(&inner.forest))
    }

    /// Removes one anonymous like (or dislike) from a post.
    ///
    /// # Errors
    /// `NothingToRetract` if the counter holds no anonymous votes; votes
    /// owned by tracked voters can only be withdrawn through `set_vote`.
    pub fn retract_vote(&self, post_id: PostId, is_like: bool) -> Result<Snapshot> {
        let mut inner = self.write();
        let node = inner
            .forest
            .get(post_id)
            .ok_or(ThreadError::NotFound(post_id))?;

        let (tracked_likes, tracked_dislikes) = inner.votes.tally(post_id);
        let (counter, tracked, name) = if is_like {
            (node.likes(), tracked_likes, "like")
        } else {
            (node.dislikes(), tracked_dislikes, "dislike")
        };
        if counter <= tracked {
            debug!(post_id = %post_id, is_like, "Nothing to retract");
            return Err(ThreadError::NothingToRetract {
                post: post_id,
                counter: name,
            });
        }

        let delta = if is_like { (-1, 0) } else { (0, -1) };
        Self::apply_delta(&mut inner, post_id, delta)?;

        debug!(post_id = %post_id, is_like, "Retracted vote");
        Ok(Arc::clone(&inner.forest))
    }

    /// Moves a voter to a new vote state on a post, adjusting both counters
    /// in one step.
    pub fn set_vote(
        &self,
        post_id: PostId,
        voter: &VoterId,
        new_state: VoteState,
    ) -> Result<VoteOutcome> {
        let mut inner = self.write();
        if !inner.forest.contains(post_id) {
            return Err(ThreadError::NotFound(post_id));
        }

        let transition = inner.votes.transition(post_id, voter, new_state);
        if !transition.is_noop() {
            Self::apply_delta(&mut inner, post_id, transition.delta())?;
            inner.votes.record(post_id, voter, new_state);
            debug!(
                post_id = %post_id,
                voter = %voter,
                from = %transition.from,
                to = %transition.to,
                "Changed vote"
            );
        }

        Ok(VoteOutcome {
            previous: transition.from,
            current: transition.to,
            snapshot: Arc::clone(&inner.forest),
        })
    }

    /// Applies a like/dislike click for a voter: the active direction is
    /// retracted, any other click switches to that direction.
    pub fn toggle_vote(
        &self,
        post_id: PostId,
        voter: &VoterId,
        is_like: bool,
    ) -> Result<VoteOutcome> {
        // Read and write under one lock so two clicks cannot interleave.
        let mut inner = self.write();
        if !inner.forest.contains(post_id) {
            return Err(ThreadError::NotFound(post_id));
        }

        let current = inner.votes.state(post_id, voter);
        let transition = inner.votes.transition(post_id, voter, current.toggled(is_like));
        Self::apply_delta(&mut inner, post_id, transition.delta())?;
        inner.votes.record(post_id, voter, transition.to);
        debug!(
            post_id = %post_id,
            voter = %voter,
            from = %transition.from,
            to = %transition.to,
            "Toggled vote"
        );

        Ok(VoteOutcome {
            previous: transition.from,
            current: transition.to,
            snapshot: Arc::clone(&inner.forest),
        })
    }

    /// Returns a voter's current state on a post.
    pub fn vote_state(&self, post_id: PostId, voter: &VoterId) -> VoteState {
        self.read().votes.state(post_id, voter)
    }

    // ==========================================================================
    // Internals
    // ==========================================================================

    fn validate_content(&self, content: &str) -> Result<PostContent> {
        PostContent::new(content, self.config.max_body_size).inspect_err(|e| {
            debug!(error = %e, "Rejected post content");
        })
    }

    fn append_reply(
        inner: &mut StoreInner,
        parent_id: PostId,
        content: PostContent,
    ) -> Result<Created> {
        let parent = inner
            .forest
            .get(parent_id)
            .ok_or(ThreadError::NotFound(parent_id))?;
        let id = PostId::from_raw(inner.next_id + 1);
        let node = PostNode::reply(id, parent, content, current_timestamp_millis());
        let created = node.clone();

        Arc::make_mut(&mut inner.forest).push_reply(node)?;
        inner.allocate_id();

        debug!(
            post_id = %id,
            parent_id = %parent_id,
            depth = created.depth(),
            "Created reply"
        );
        Ok(Created {
            post: created,
            snapshot: Arc::clone(&inner.forest),
        })
    }

    /// Applies counter deltas to one node, checking them before any copy is made.
    fn apply_delta(
        inner: &mut StoreInner,
        post_id: PostId,
        (likes, dislikes): (i64, i64),
    ) -> Result<()> {
        let (new_likes, new_dislikes) = inner
            .forest
            .get(post_id)
            .ok_or(ThreadError::NotFound(post_id))?
            .checked_vote_delta(likes, dislikes)?;

        if let Some(node) = Arc::make_mut(&mut inner.forest).node_mut(post_id) {
            node.set_counters(new_likes, new_dislikes);
        }
        Ok(())
    }

    fn read(&self) -> RwLockReadGuard<'_, StoreInner> {
        self.inner.read().unwrap_or_else(|p| p.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, StoreInner> {
        self.inner.write().unwrap_or_else(|p| p.into_inner())
    }
}

/// Thread-safe shared store.
pub type SharedThreadStore = Arc<ThreadStore>;
