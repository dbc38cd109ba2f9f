//! # threadstore - In-memory discussion threads
//!
//! A small store for a forest of posts with nested replies and votes.
//!
//! ## Features
//!
//! - **Bounded nesting**: replies nest two levels below a root, never deeper
//! - **Stable identity**: every post gets an id that is never reused
//! - **Immutable snapshots**: every mutation yields a new snapshot; earlier
//!   snapshots stay exactly as they were
//! - **Tracked votes**: per-voter like/dislike state with exact counter deltas
//!
//! ## Examples
//!
//! ```rust
//! use threadstore::forum::{ThreadStore, VoteState, VoterId};
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let store = ThreadStore::new();
//! let root = store.create_post("Which editor do you use?")?.post;
//! let reply = store.create_reply(root.id(), "vim, obviously", root.depth())?.post;
//!
//! let alice = VoterId::from("alice");
//! store.set_vote(reply.id(), &alice, VoteState::Liked)?;
//!
//! let snapshot = store.snapshot();
//! assert_eq!(snapshot.root_count(), 1);
//! assert_eq!(snapshot.get(reply.id()).map(|p| p.likes()), Some(1));
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod forum;

pub use config::StoreConfig;
pub use error::{Result, ThreadError};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
