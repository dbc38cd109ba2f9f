//! End-to-end tests for the thread store.
//!
//! These tests drive the public API the way a presentational layer would:
//! create threads, reply, vote, and read snapshots back.

use std::collections::HashSet;
use std::sync::Arc;
use std::thread;
use threadstore::forum::constants::MAX_REPLY_DEPTH;
use threadstore::forum::{PostId, PostTree, ThreadStore, VoteState, VoterId};
use threadstore::{StoreConfig, ThreadError};

/// Collects every id in a materialised forest.
fn all_ids(trees: &[PostTree]) -> Vec<PostId> {
    let mut ids = Vec::new();
    let mut stack: Vec<&PostTree> = trees.iter().collect();
    while let Some(tree) = stack.pop() {
        ids.push(tree.id);
        stack.extend(tree.replies.iter());
    }
    ids
}

// =============================================================================
// Post Creation
// =============================================================================

#[test]
fn test_create_post_prepends_root() {
    let store = ThreadStore::new();

    let first = store.create_post("first").expect("Failed to create first post");
    assert_eq!(first.snapshot.root_count(), 1);

    let second = store.create_post("second").expect("Failed to create second post");
    assert_eq!(second.snapshot.root_count(), 2);

    let roots: Vec<&str> = second.snapshot.roots().map(|p| p.content()).collect();
    assert_eq!(roots, vec!["second", "first"]);

    let post = &second.post;
    assert_eq!(post.depth(), 0);
    assert!(post.replies().is_empty());
    assert_eq!((post.likes(), post.dislikes()), (0, 0));
    assert!(post.created_at() > 0);
    assert!(post.parent().is_none());
}

#[test]
fn test_create_post_stores_trimmed_content() {
    let store = ThreadStore::new();
    let created = store.create_post("\n  spaced out  \t").unwrap();
    assert_eq!(created.post.content(), "spaced out");
    assert_eq!(
        store.snapshot().get(created.post.id()).unwrap().content(),
        "spaced out"
    );
}

#[test]
fn test_create_post_rejects_blank_content() {
    let store = ThreadStore::new();
    store.create_post("keep me").unwrap();
    let before = store.snapshot();

    for blank in ["", " ", "\t\n", "   \r\n  "] {
        let err = store.create_post(blank).unwrap_err();
        assert!(matches!(err, ThreadError::Validation(_)), "{:?}", blank);
    }

    assert_eq!(*store.snapshot(), *before);
    assert_eq!(store.snapshot().root_count(), 1);
}

#[test]
fn test_create_post_rejects_oversize_content() {
    let config = StoreConfig::default().with_max_body_size(8).unwrap();
    let store = ThreadStore::with_config(config);

    assert!(store.create_post("12345678").is_ok());
    let err = store.create_post("123456789").unwrap_err();
    assert!(matches!(err, ThreadError::Validation(_)));
    assert_eq!(store.snapshot().len(), 1);
}

// =============================================================================
// Replies
// =============================================================================

/// Build A -> B -> C, then try to reply to C.
#[test]
fn test_reply_chain_stops_at_max_depth() {
    let store = ThreadStore::new();

    let a = store.create_post("A").unwrap().post;
    assert!(store.snapshot().to_tree()[0].replies.is_empty());

    let b = store.create_reply(a.id(), "B", a.depth()).unwrap().post;
    assert_eq!(b.depth(), 1);
    assert_eq!(store.snapshot().get(a.id()).unwrap().replies(), &[b.id()]);

    let c = store.create_reply(b.id(), "C", b.depth()).unwrap().post;
    assert_eq!(c.depth(), 2);
    assert_eq!(c.depth(), MAX_REPLY_DEPTH);
    assert_eq!(store.snapshot().get(b.id()).unwrap().replies(), &[c.id()]);

    let before = store.snapshot();
    let err = store.create_reply(c.id(), "D", c.depth()).unwrap_err();
    assert!(matches!(err, ThreadError::DepthLimitExceeded { depth: 2 }));

    let after = store.snapshot();
    assert_eq!(*after, *before);
    assert_eq!(after.get(b.id()).unwrap().replies(), &[c.id()]);
    assert!(after.get(c.id()).unwrap().replies().is_empty());
    assert!(after
        .to_tree()
        .iter()
        .all(|tree| !tree_contains_content(tree, "D")));
}

fn tree_contains_content(tree: &PostTree, content: &str) -> bool {
    tree.content == content || tree.replies.iter().any(|r| tree_contains_content(r, content))
}

#[test]
fn test_reply_to_uses_recorded_depth() {
    let store = ThreadStore::new();
    let a = store.create_post("A").unwrap().post;
    let b = store.reply_to(a.id(), "B").unwrap().post;
    let c = store.reply_to(b.id(), "C").unwrap().post;

    let err = store.reply_to(c.id(), "D").unwrap_err();
    assert!(matches!(err, ThreadError::DepthLimitExceeded { depth: 2 }));
    assert_eq!(store.snapshot().len(), 3);
}

#[test]
fn test_depth_limit_checked_before_lookup() {
    let store = ThreadStore::new();
    let err = store
        .create_reply(PostId::from_raw(12345), "D", 2)
        .unwrap_err();
    assert!(matches!(err, ThreadError::DepthLimitExceeded { .. }));
}

#[test]
fn test_reply_to_missing_post_is_rejected() {
    let store = ThreadStore::new();
    store.create_post("A").unwrap();
    let before = store.snapshot();

    let err = store
        .create_reply(PostId::from_raw(999), "orphan", 0)
        .unwrap_err();
    assert!(matches!(err, ThreadError::NotFound(id) if id == PostId::from_raw(999)));
    assert_eq!(*store.snapshot(), *before);
}

#[test]
fn test_blank_reply_is_rejected() {
    let store = ThreadStore::new();
    let a = store.create_post("A").unwrap().post;
    let err = store.create_reply(a.id(), "   ", 0).unwrap_err();
    assert!(matches!(err, ThreadError::Validation(_)));
    assert!(store.snapshot().get(a.id()).unwrap().replies().is_empty());
}

#[test]
fn test_replies_append_in_insertion_order() {
    let store = ThreadStore::new();
    let a = store.create_post("A").unwrap().post;
    for body in ["one", "two", "three"] {
        store.create_reply(a.id(), body, 0).unwrap();
    }

    let snapshot = store.snapshot();
    let replies: Vec<&str> = snapshot.replies(a.id()).map(|p| p.content()).collect();
    assert_eq!(replies, vec!["one", "two", "three"]);
    assert!(snapshot.replies(a.id()).all(|p| p.depth() == 1));
}

#[test]
fn test_replies_land_in_the_right_thread() {
    let store = ThreadStore::new();
    let a = store.create_post("A").unwrap().post;
    let b = store.create_post("B").unwrap().post;

    let reply = store.create_reply(a.id(), "on A", 0).unwrap().post;

    let snapshot = store.snapshot();
    assert_eq!(snapshot.get(a.id()).unwrap().replies(), &[reply.id()]);
    assert!(snapshot.get(b.id()).unwrap().replies().is_empty());
    assert_eq!(snapshot.root_count(), 2);
}

// =============================================================================
// Votes
// =============================================================================

#[test]
fn test_cast_vote_counts_exactly() {
    let store = ThreadStore::new();
    let a = store.create_post("A").unwrap().post;
    let b = store.create_reply(a.id(), "B", 0).unwrap().post;

    for _ in 0..5 {
        store.cast_vote(b.id(), true).unwrap();
    }

    let snapshot = store.snapshot();
    let b_node = snapshot.get(b.id()).unwrap();
    assert_eq!((b_node.likes(), b_node.dislikes()), (5, 0));
    let a_node = snapshot.get(a.id()).unwrap();
    assert_eq!((a_node.likes(), a_node.dislikes()), (0, 0));
}

#[test]
fn test_two_likes_scenario() {
    let store = ThreadStore::new();
    let a = store.create_post("A").unwrap().post;

    store.cast_vote(a.id(), true).unwrap();
    let snapshot = store.cast_vote(a.id(), true).unwrap();

    let node = snapshot.get(a.id()).unwrap();
    assert_eq!(node.likes(), 2);
    assert_eq!(node.dislikes(), 0);
}

#[test]
fn test_vote_on_missing_post_is_rejected() {
    let store = ThreadStore::new();
    let err = store.cast_vote(PostId::from_raw(1), true).unwrap_err();
    assert!(matches!(err, ThreadError::NotFound(_)));
    assert!(store.snapshot().is_empty());
}

#[test]
fn test_retract_vote_undoes_cast() {
    let store = ThreadStore::new();
    let a = store.create_post("A").unwrap().post;

    store.cast_vote(a.id(), false).unwrap();
    let snapshot = store.retract_vote(a.id(), false).unwrap();
    assert_eq!(snapshot.get(a.id()).unwrap().dislikes(), 0);

    let err = store.retract_vote(a.id(), false).unwrap_err();
    assert!(matches!(
        err,
        ThreadError::NothingToRetract {
            counter: "dislike",
            ..
        }
    ));
}

#[test]
fn test_set_vote_tracks_each_voter() {
    let store = ThreadStore::new();
    let a = store.create_post("A").unwrap().post.id();
    let alice = VoterId::from("alice");
    let bob = VoterId::from("bob");

    store.set_vote(a, &alice, VoteState::Liked).unwrap();
    store.set_vote(a, &bob, VoteState::Liked).unwrap();
    // Setting the same state again changes nothing.
    let outcome = store.set_vote(a, &alice, VoteState::Liked).unwrap();
    assert_eq!(outcome.previous, VoteState::Liked);
    assert_eq!(outcome.snapshot.get(a).unwrap().likes(), 2);

    let outcome = store.set_vote(a, &bob, VoteState::Disliked).unwrap();
    let node = outcome.snapshot.get(a).unwrap();
    assert_eq!((node.likes(), node.dislikes()), (1, 1));

    let outcome = store.set_vote(a, &alice, VoteState::None).unwrap();
    let node = outcome.snapshot.get(a).unwrap();
    assert_eq!((node.likes(), node.dislikes()), (0, 1));
    assert_eq!(store.vote_state(a, &alice), VoteState::None);
    assert_eq!(store.vote_state(a, &bob), VoteState::Disliked);
}

#[test]
fn test_toggle_twice_restores_counts() {
    let store = ThreadStore::new();
    let a = store.create_post("A").unwrap().post.id();
    store.cast_vote(a, true).unwrap();
    let voter = VoterId::from("carol");

    store.toggle_vote(a, &voter, true).unwrap();
    let outcome = store.toggle_vote(a, &voter, true).unwrap();

    assert_eq!(outcome.current, VoteState::None);
    let node = outcome.snapshot.get(a).unwrap();
    assert_eq!((node.likes(), node.dislikes()), (1, 0));
}

#[test]
fn test_set_vote_on_missing_post_records_nothing() {
    let store = ThreadStore::new();
    let voter = VoterId::from("dave");
    let missing = PostId::from_raw(5);

    assert!(store.set_vote(missing, &voter, VoteState::Liked).is_err());
    assert_eq!(store.vote_state(missing, &voter), VoteState::None);
}

// =============================================================================
// Snapshots
// =============================================================================

#[test]
fn test_old_snapshots_are_not_mutated() {
    let store = ThreadStore::new();
    let a = store.create_post("A").unwrap();
    let held = a.snapshot.clone();
    let held_tree = held.to_tree();

    let b = store.create_reply(a.post.id(), "B", 0).unwrap();
    store.cast_vote(a.post.id(), true).unwrap();
    store.create_post("C").unwrap();

    // The held snapshot still shows exactly one childless, unvoted root.
    assert_eq!(held.to_tree(), held_tree);
    assert_eq!(held.len(), 1);
    let held_a = held.get(a.post.id()).unwrap();
    assert!(held_a.replies().is_empty());
    assert_eq!(held_a.likes(), 0);
    assert!(held.get(b.post.id()).is_none());

    // The snapshot returned by the reply does not see the later vote.
    assert_eq!(b.snapshot.get(a.post.id()).unwrap().likes(), 0);
    assert_eq!(store.snapshot().get(a.post.id()).unwrap().likes(), 1);
}

#[test]
fn test_snapshot_tree_serializes_to_json() {
    let store = ThreadStore::new();
    let a = store.create_post("A").unwrap().post;
    store.create_reply(a.id(), "B", 0).unwrap();

    let json = serde_json::to_value(store.snapshot().to_tree()).unwrap();
    assert_eq!(json[0]["content"], "A");
    assert_eq!(json[0]["depth"], 0);
    assert_eq!(json[0]["replies"][0]["content"], "B");
    assert_eq!(json[0]["replies"][0]["depth"], 1);
    assert_eq!(json[0]["replies"][0]["likes"], 0);
}

// =============================================================================
// Concurrency
// =============================================================================

#[test]
fn test_concurrent_replies_all_survive() {
    let store = Arc::new(ThreadStore::new());
    let root = store.create_post("root").unwrap().post.id();

    let handles: Vec<_> = (0..8)
        .map(|t| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                for i in 0..25 {
                    store
                        .create_reply(root, &format!("t{} r{}", t, i), 0)
                        .expect("reply should succeed");
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().expect("thread panicked");
    }

    let snapshot = store.snapshot();
    assert_eq!(snapshot.get(root).unwrap().replies().len(), 200);
    assert_eq!(snapshot.len(), 201);

    let ids = all_ids(&snapshot.to_tree());
    let unique: HashSet<_> = ids.iter().collect();
    assert_eq!(unique.len(), ids.len());
}

#[test]
fn test_concurrent_votes_are_not_lost() {
    let store = Arc::new(ThreadStore::new());
    let id = store.create_post("popular").unwrap().post.id();

    let handles: Vec<_> = (0..4)
        .map(|t| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                let voter = VoterId::new(format!("voter-{}", t));
                for _ in 0..50 {
                    store.cast_vote(id, true).unwrap();
                    store.cast_vote(id, false).unwrap();
                }
                store.set_vote(id, &voter, VoteState::Liked).unwrap();
            })
        })
        .collect();
    for handle in handles {
        handle.join().expect("thread panicked");
    }

    let snapshot = store.snapshot();
    let node = snapshot.get(id).unwrap();
    assert_eq!(node.likes(), 204);
    assert_eq!(node.dislikes(), 200);
}
