//! Argument and command-line parsing for the threadstore shell.

use crate::config::StoreConfig;
use crate::error::{Result, ThreadError};
use crate::forum::{PostId, VoteState, VoterId};

/// Process-level options.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Options {
    /// Override for `StoreConfig::latency`, in milliseconds.
    pub latency_ms: Option<u64>,
    /// Override for `StoreConfig::max_body_size`.
    pub max_body_size: Option<usize>,
    /// Print usage and exit.
    pub help: bool,
}

impl Options {
    /// Applies the overrides on top of a base configuration.
    pub fn apply(&self, mut config: StoreConfig) -> Result<StoreConfig> {
        if let Some(ms) = self.latency_ms {
            config = config.with_latency_ms(ms)?;
        }
        if let Some(size) = self.max_body_size {
            config = config.with_max_body_size(size)?;
        }
        Ok(config)
    }
}

/// Parses process arguments (without the program name).
pub fn parse_options<I, S>(args: I) -> Result<Options>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut options = Options::default();
    let mut args = args.into_iter();

    while let Some(arg) = args.next() {
        match arg.as_ref() {
            "-h" | "--help" => options.help = true,
            "--latency-ms" => {
                let value = args
                    .next()
                    .ok_or_else(|| ThreadError::config("--latency-ms requires a value"))?;
                options.latency_ms = Some(parse_flag_value("--latency-ms", value.as_ref())?);
            }
            "--max-body" => {
                let value = args
                    .next()
                    .ok_or_else(|| ThreadError::config("--max-body requires a value"))?;
                options.max_body_size = Some(parse_flag_value("--max-body", value.as_ref())?);
            }
            other => {
                return Err(ThreadError::config(format!("Unknown argument '{}'", other)));
            }
        }
    }

    Ok(options)
}

fn parse_flag_value<T: std::str::FromStr>(flag: &str, value: &str) -> Result<T> {
    value
        .parse()
        .map_err(|_| ThreadError::config(format!("{} expects a number, got '{}'", flag, value)))
}

/// One shell command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Post {
        content: String,
    },
    Reply {
        parent: PostId,
        content: String,
    },
    Vote {
        post: PostId,
        is_like: bool,
    },
    Retract {
        post: PostId,
        is_like: bool,
    },
    SetVote {
        post: PostId,
        voter: VoterId,
        state: VoteState,
    },
    Show,
    Json,
    Help,
    Quit,
}

/// Parses one input line. Blank lines yield `None`.
pub fn parse_line(line: &str) -> Result<Option<Command>> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let (verb, rest) = split_word(line);
    let command = match verb.to_ascii_lowercase().as_str() {
        "post" => Command::Post {
            content: rest.to_string(),
        },
        "reply" => {
            let (id, content) = split_word(rest);
            Command::Reply {
                parent: parse_id(id)?,
                content: content.to_string(),
            }
        }
        "like" => Command::Vote {
            post: parse_id(rest)?,
            is_like: true,
        },
        "dislike" => Command::Vote {
            post: parse_id(rest)?,
            is_like: false,
        },
        "unlike" => Command::Retract {
            post: parse_id(rest)?,
            is_like: true,
        },
        "undislike" => Command::Retract {
            post: parse_id(rest)?,
            is_like: false,
        },
        "vote" => {
            let (id, rest) = split_word(rest);
            let (voter, state) = split_word(rest);
            if voter.is_empty() {
                return Err(ThreadError::validation(
                    "Usage: vote <id> <voter> <like|dislike|none>",
                ));
            }
            Command::SetVote {
                post: parse_id(id)?,
                voter: VoterId::new(voter),
                state: state.parse()?,
            }
        }
        "show" | "ls" => Command::Show,
        "json" => Command::Json,
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => {
            return Err(ThreadError::validation(format!(
                "Unknown command '{}' (try 'help')",
                other
            )));
        }
    };

    Ok(Some(command))
}

fn split_word(input: &str) -> (&str, &str) {
    let input = input.trim_start();
    match input.find(char::is_whitespace) {
        Some(idx) => (&input[..idx], input[idx..].trim_start()),
        None => (input, ""),
    }
}

fn parse_id(input: &str) -> Result<PostId> {
    if input.trim().is_empty() {
        return Err(ThreadError::validation("Missing post id"));
    }
    input.parse()
}

/// Usage text for the process and the shell.
pub fn usage() -> &'static str {
    "threadstore - in-memory discussion threads\n\
     \n\
     Usage: threadstore [--latency-ms <ms>] [--max-body <bytes>]\n\
     \n\
     Commands (one per line on stdin):\n\
     \x20 post <text>                          start a new thread\n\
     \x20 reply <id> <text>                    reply to a post\n\
     \x20 like <id> | dislike <id>             add an anonymous vote\n\
     \x20 unlike <id> | undislike <id>         retract an anonymous vote\n\
     \x20 vote <id> <voter> <like|dislike|none> set a tracked vote\n\
     \x20 show                                 print the forest\n\
     \x20 json                                 print the forest as JSON\n\
     \x20 help | quit\n\
     \n\
     Environment: THREADSTORE_MAX_BODY_SIZE, THREADSTORE_LATENCY_MS, RUST_LOG"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_options() {
        let options = parse_options(["--latency-ms", "200", "--max-body", "64"]).unwrap();
        assert_eq!(options.latency_ms, Some(200));
        assert_eq!(options.max_body_size, Some(64));
        assert!(!options.help);

        assert!(parse_options(["--latency-ms"]).is_err());
        assert!(parse_options(["--latency-ms", "soon"]).is_err());
        assert!(parse_options(["--verbose"]).is_err());
        assert!(parse_options(["-h"]).unwrap().help);
    }

    #[test]
    fn test_options_apply_validates() {
        let options = parse_options(["--max-body", "0"]).unwrap();
        assert!(options.apply(StoreConfig::default()).is_err());
    }

    #[test]
    fn test_parse_post_and_reply() {
        assert_eq!(
            parse_line("post   hello there ").unwrap(),
            Some(Command::Post {
                content: "hello there".into()
            })
        );
        assert_eq!(
            parse_line("reply #3 thanks, agreed").unwrap(),
            Some(Command::Reply {
                parent: PostId::from_raw(3),
                content: "thanks, agreed".into()
            })
        );
        assert!(parse_line("reply").is_err());
        assert!(parse_line("reply x text").is_err());
    }

    #[test]
    fn test_parse_votes() {
        assert_eq!(
            parse_line("like 4").unwrap(),
            Some(Command::Vote {
                post: PostId::from_raw(4),
                is_like: true
            })
        );
        assert_eq!(
            parse_line("undislike #4").unwrap(),
            Some(Command::Retract {
                post: PostId::from_raw(4),
                is_like: false
            })
        );
        assert_eq!(
            parse_line("vote 4 alice dislike").unwrap(),
            Some(Command::SetVote {
                post: PostId::from_raw(4),
                voter: VoterId::from("alice"),
                state: VoteState::Disliked
            })
        );
        assert!(parse_line("vote 4").is_err());
        assert!(parse_line("vote 4 alice sideways").is_err());
    }

    #[test]
    fn test_parse_misc() {
        assert_eq!(parse_line("   ").unwrap(), None);
        assert_eq!(parse_line("SHOW").unwrap(), Some(Command::Show));
        assert_eq!(parse_line("exit").unwrap(), Some(Command::Quit));
        assert!(parse_line("frobnicate").is_err());
    }
}
