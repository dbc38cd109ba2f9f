//! Forest state: the arena of posts behind every snapshot.
//!
//! ## Indexing Strategy
//!
//! Posts are stored flat, keyed by id, so any post is found in O(1) without
//! walking the tree:
//! - `nodes`: PostId → node
//! - `roots`: root ids, newest first
//! - each node keeps its own reply ids, oldest first
//!
//! ## Snapshots
//!
//! A [`Snapshot`] is an `Arc<Forest>`. The store mutates its forest through
//! `Arc::make_mut`, so while a caller still holds an earlier snapshot the
//! store works on a shallow copy (the node map holds `Arc`s) and only the
//! nodes actually touched are cloned. Snapshots already handed out never
//! change.

use crate::error::{Result, ThreadError};
use crate::forum::post::{PostNode, PostTree};
use crate::forum::types::PostId;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

/// Immutable view of the forest at one point in time.
pub type Snapshot = Arc<Forest>;

/// The forest of posts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Forest {
    /// All posts, keyed by id.
    nodes: HashMap<PostId, Arc<PostNode>>,
    /// Root post ids, newest first.
    roots: VecDeque<PostId>,
}

impl Forest {
    /// Creates an empty forest.
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of posts at every depth.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if the forest holds no posts.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of root posts.
    pub fn root_count(&self) -> usize {
        self.roots.len()
    }

    /// Returns true if a post with this id exists.
    pub fn contains(&self, id: PostId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Looks up a post anywhere in the forest.
    pub fn get(&self, id: PostId) -> Option<&PostNode> {
        self.nodes.get(&id).map(Arc::as_ref)
    }

    /// Root posts, newest first.
    pub fn roots(&self) -> impl Iterator<Item = &PostNode> + '_ {
        self.roots.iter().filter_map(move |id| self.get(*id))
    }

    /// Direct replies of a post, oldest first. Empty if the post is absent.
    pub fn replies(&self, id: PostId) -> impl Iterator<Item = &PostNode> + '_ {
        self.get(id)
            .map(PostNode::replies)
            .unwrap_or_default()
            .iter()
            .filter_map(move |child| self.get(*child))
    }

    /// Materialises one post and its replies as an owned tree.
    pub fn tree(&self, id: PostId) -> Option<PostTree> {
        let node = self.get(id)?;
        Some(PostTree {
            id: node.id(),
            content: node.content().to_string(),
            replies: node
                .replies()
                .iter()
                .filter_map(|child| self.tree(*child))
                .collect(),
            likes: node.likes(),
            dislikes: node.dislikes(),
            created_at: node.created_at(),
            depth: node.depth(),
        })
    }

    /// Materialises the whole forest, roots newest first.
    pub fn to_tree(&self) -> Vec<PostTree> {
        self.roots.iter().filter_map(|id| self.tree(*id)).collect()
    }

    // ==========================================================================
    // Mutation (store only)
    // ==========================================================================

    pub(crate) fn push_root(&mut self, node: PostNode) {
        debug_assert!(node.parent().is_none());
        debug_assert!(!self.nodes.contains_key(&node.id()));
        let id = node.id();
        self.nodes.insert(id, Arc::new(node));
        self.roots.push_front(id);
    }

    /// Appends a reply at the tail of its parent's reply list.
    pub(crate) fn push_reply(&mut self, node: PostNode) -> Result<()> {
        let parent_id = node
            .parent()
            .ok_or_else(|| ThreadError::validation("Reply has no parent"))?;
        debug_assert!(!self.nodes.contains_key(&node.id()));
        let id = node.id();
        self.node_mut(parent_id)
            .ok_or(ThreadError::NotFound(parent_id))?
            .push_reply(id);
        self.nodes.insert(id, Arc::new(node));
        Ok(())
    }

    /// Mutable access to one node, cloning it first if a snapshot shares it.
    pub(crate) fn node_mut(&mut self, id: PostId) -> Option<&mut PostNode> {
        self.nodes.get_mut(&id).map(Arc::make_mut)
    }
}
