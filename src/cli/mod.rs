//! Interactive shell over a single in-memory thread store.
//!
//! The shell reads one command per line and keeps all posts for the life of
//! the process. Rejected operations are reported and the shell keeps going;
//! only I/O and configuration failures end it.

pub mod args;
pub mod commands;

use crate::config::StoreConfig;
use crate::forum::ForumClient;
use crate::Result;
use std::io::{BufRead, Write};
use tracing::{info, warn};

pub use args::{parse_line, parse_options, usage, Command, Options};
pub use commands::{execute, Flow};

/// Main entry point for the CLI application
pub async fn run() -> Result<()> {
    let options = parse_options(std::env::args().skip(1))?;
    if options.help {
        println!("{}", usage());
        return Ok(());
    }

    let config = options.apply(StoreConfig::from_env()?)?;
    info!(
        max_body_size = config.max_body_size,
        latency_ms = config.latency.as_millis() as u64,
        "Starting thread store shell"
    );

    let client = ForumClient::from_config(config);
    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    run_shell(&client, stdin.lock(), &mut stdout.lock()).await
}

/// Runs commands from `input` until end of input or `quit`.
pub async fn run_shell<R, W>(client: &ForumClient, input: R, out: &mut W) -> Result<()>
where
    R: BufRead,
    W: Write,
{
    for line in input.lines() {
        let line = line?;
        let command = match parse_line(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(e) => {
                writeln!(out, "Error: {}", e)?;
                continue;
            }
        };

        match execute(client, command, out).await {
            Ok(Flow::Continue) => {}
            Ok(Flow::Quit) => break,
            Err(e) if e.is_rejection() => {
                warn!(error = %e, "Command rejected");
                writeln!(out, "Rejected: {}", e)?;
            }
            Err(e) => return Err(e),
        }
        out.flush()?;
    }

    Ok(())
}
