//! Command implementations for the threadstore shell.

use crate::cli::args::{usage, Command};
use crate::error::ThreadError;
use crate::forum::{Forest, ForumClient, PostId, PostNode};
use crate::Result;
use std::io::Write;
use tracing::info;

/// Whether the shell keeps reading after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Executes one command against the client, writing its output to `out`.
pub async fn execute<W: Write>(
    client: &ForumClient,
    command: Command,
    out: &mut W,
) -> Result<Flow> {
    match command {
        Command::Post { content } => {
            let created = client.create_post(&content).await?;
            info!(post_id = %created.post.id(), "Created post");
            writeln!(out, "{}", created.post.id())?;
        }
        Command::Reply { parent, content } => {
            // The shell has no stale view of the forest, so it reads the
            // parent's current depth just before replying.
            let depth = client
                .snapshot()
                .get(parent)
                .map(PostNode::depth)
                .ok_or(ThreadError::NotFound(parent))?;
            let created = client.create_reply(parent, &content, depth).await?;
            info!(post_id = %created.post.id(), parent_id = %parent, "Created reply");
            writeln!(out, "{}", created.post.id())?;
        }
        Command::Vote { post, is_like } => {
            let snapshot = client.cast_vote(post, is_like).await?;
            write_counters(out, &snapshot, post)?;
        }
        Command::Retract { post, is_like } => {
            let snapshot = client.retract_vote(post, is_like).await?;
            write_counters(out, &snapshot, post)?;
        }
        Command::SetVote { post, voter, state } => {
            let outcome = client.set_vote(post, &voter, state).await?;
            info!(
                post_id = %post,
                voter = %voter,
                from = %outcome.previous,
                to = %outcome.current,
                "Set vote"
            );
            write_counters(out, &outcome.snapshot, post)?;
        }
        Command::Show => {
            let snapshot = client.snapshot();
            if snapshot.is_empty() {
                writeln!(out, "(no posts)")?;
            }
            for root in snapshot.roots() {
                write_subtree(out, &snapshot, root)?;
            }
        }
        Command::Json => {
            let json = serde_json::to_string_pretty(&client.snapshot().to_tree())?;
            writeln!(out, "{}", json)?;
        }
        Command::Help => writeln!(out, "{}", usage())?,
        Command::Quit => return Ok(Flow::Quit),
    }

    Ok(Flow::Continue)
}

fn write_counters<W: Write>(out: &mut W, forest: &Forest, post: PostId) -> Result<()> {
    if let Some(node) = forest.get(post) {
        writeln!(out, "{} +{} -{}", post, node.likes(), node.dislikes())?;
    }
    Ok(())
}

fn write_subtree<W: Write>(out: &mut W, forest: &Forest, node: &PostNode) -> Result<()> {
    writeln!(
        out,
        "{:indent$}{} [+{} -{}] {}",
        "",
        node.id(),
        node.likes(),
        node.dislikes(),
        node.content(),
        indent = node.depth() * 2
    )?;
    for reply in forest.replies(node.id()) {
        write_subtree(out, forest, reply)?;
    }
    Ok(())
}
