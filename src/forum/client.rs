//! Async calling layer over a shared thread store.
//!
//! The client waits out an artificial latency before handing each mutation
//! to the store, the way a UI would show a pending state while a request is
//! in flight. The delay happens before the store's lock is taken, so it never
//! changes the result, the ordering of concurrent mutations, or what ends up
//! in the forest.
//!
//! ## Usage
//!
//! ```ignore
//! let client = ForumClient::new(Arc::new(ThreadStore::new()), Duration::from_millis(500));
//! let post = client.create_post("hello").await?.post;
//! client.create_reply(post.id(), "hi back", post.depth()).await?;
//! ```

use crate::config::StoreConfig;
use crate::error::Result;
use crate::forum::state::Snapshot;
use crate::forum::store::{Created, SharedThreadStore, ThreadStore, VoteOutcome};
use crate::forum::types::{PostId, VoteState, VoterId};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument};

/// Client for submitting mutations to a shared store.
#[derive(Debug, Clone)]
pub struct ForumClient {
    /// Store every clone of this client writes to.
    store: SharedThreadStore,
    /// Delay before each mutation.
    latency: Duration,
}

impl ForumClient {
    /// Creates a new client.
    pub fn new(store: SharedThreadStore, latency: Duration) -> Self {
        Self { store, latency }
    }

    /// Creates a client over a fresh store built from `config`.
    pub fn from_config(config: StoreConfig) -> Self {
        let latency = config.latency;
        Self::new(Arc::new(ThreadStore::with_config(config)), latency)
    }

    /// Returns the underlying store.
    pub fn store(&self) -> &SharedThreadStore {
        &self.store
    }

    /// Returns the configured latency.
    pub fn latency(&self) -> Duration {
        self.latency
    }

    /// Returns the current snapshot without any delay.
    pub fn snapshot(&self) -> Snapshot {
        self.store.snapshot()
    }

    /// Creates a root post.
    #[instrument(skip(self, content), fields(len = content.len()))]
    pub async fn create_post(&self, content: &str) -> Result<Created> {
        self.simulate_latency().await;
        self.store.create_post(content)
    }

    /// Replies to a post the caller saw at `parent_depth`.
    #[instrument(skip(self, content), fields(len = content.len()))]
    pub async fn create_reply(
        &self,
        parent_id: PostId,
        content: &str,
        parent_depth: usize,
    ) -> Result<Created> {
        self.simulate_latency().await;
        self.store.create_reply(parent_id, content, parent_depth)
    }

    /// Adds an anonymous like or dislike.
    #[instrument(skip(self))]
    pub async fn cast_vote(&self, post_id: PostId, is_like: bool) -> Result<Snapshot> {
        self.simulate_latency().await;
        self.store.cast_vote(post_id, is_like)
    }

    /// Removes an anonymous like or dislike.
    #[instrument(skip(self))]
    pub async fn retract_vote(&self, post_id: PostId, is_like: bool) -> Result<Snapshot> {
        self.simulate_latency().await;
        self.store.retract_vote(post_id, is_like)
    }

    /// Sets a tracked voter's state.
    #[instrument(skip(self))]
    pub async fn set_vote(
        &self,
        post_id: PostId,
        voter: &VoterId,
        state: VoteState,
    ) -> Result<VoteOutcome> {
        self.simulate_latency().await;
        self.store.set_vote(post_id, voter, state)
    }

    /// Applies a like/dislike click for a tracked voter.
    #[instrument(skip(self))]
    pub async fn toggle_vote(
        &self,
        post_id: PostId,
        voter: &VoterId,
        is_like: bool,
    ) -> Result<VoteOutcome> {
        self.simulate_latency().await;
        self.store.toggle_vote(post_id, voter, is_like)
    }

    async fn simulate_latency(&self) {
        if !self.latency.is_zero() {
            debug!(latency_ms = self.latency.as_millis() as u64, "Simulating latency");
            tokio::time::sleep(self.latency).await;
        }
    }
}
