//! In-memory discussion threads.
//!
//! The forum is a forest: an ordered list of root posts, each carrying its
//! own tree of replies. Every post is:
//! - **Uniquely identified**: ids come from a counter and are never reused
//! - **Depth-bounded**: replies nest at most two levels below a root
//! - **Append-only**: posts are never edited, deleted, or moved
//!
//! ## Hierarchy
//!
//! ```text
//! Forest
//!     └── Post (depth 0, newest first)
//!             └── Reply (depth 1, oldest first)
//!                     └── Reply (depth 2, accepts no replies)
//! ```
//!
//! All writes go through [`ThreadStore`], which hands back immutable
//! [`Snapshot`]s. A snapshot never changes after it is returned.

pub mod client;
pub mod constants;
mod post;
mod state;
mod store;
pub mod types;
mod votes;

pub use client::ForumClient;
pub use post::{PostContent, PostNode, PostTree};
pub use state::{Forest, Snapshot};
pub use store::{Created, SharedThreadStore, ThreadStore, VoteOutcome};
pub use types::{PostId, VoteState, VoterId};
pub use votes::{VoteLedger, VoteTransition};
