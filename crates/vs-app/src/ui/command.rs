use thiserror::Error;
use vs_core::{AspectRatio, Platform, Resolution};

pub const HELP: &str = "\
Commands:
  prompt <text>                          set the prompt
  caption <text>                         set the social caption
  format <landscape|portrait>            aspect ratio (16:9 or 9:16)
  quality <720p|1080p>                   resolution
  generate [prompt]                      start generating a video
  post <id> [instagram|tiktok|youtube]   post a draft (simulated)
  delete <id>                            delete a video
  list                                   show all videos
  key                                    select the API key again
  help                                   show this help
  quit                                   exit";

#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    PromptChanged(String),
    CaptionChanged(String),
    AspectRatioChanged(AspectRatio),
    ResolutionChanged(Resolution),
    Generate(Option<String>),
    Post {
        id: String,
        platform: Option<Platform>,
    },
    Remove(String),
    List,
    SelectKey,
    Help,
    Quit,
}

#[derive(Error, Debug, PartialEq)]
pub enum CommandError {
    #[error("Unknown command '{0}', type 'help' for a list")]
    Unknown(String),

    #[error("'{command}' needs {argument}")]
    MissingArgument {
        command: &'static str,
        argument: &'static str,
    },

    #[error(transparent)]
    InvalidOption(#[from] vs_core::error::Error),
}

/// Parse one input line. Blank lines parse to `None`.
pub fn parse_command(line: &str) -> Result<Option<UiEvent>, CommandError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let (command, rest) = match line.split_once(char::is_whitespace) {
        Some((command, rest)) => (command, rest.trim()),
        None => (line, ""),
    };

    let event = match command.to_ascii_lowercase().as_str() {
        "prompt" => UiEvent::PromptChanged(rest.to_string()),
        "caption" => UiEvent::CaptionChanged(rest.to_string()),
        "format" | "aspect" => UiEvent::AspectRatioChanged(require(rest, "format", "an aspect ratio")?.parse::<AspectRatio>()?),
        "quality" | "resolution" => UiEvent::ResolutionChanged(require(rest, "quality", "a resolution")?.parse::<Resolution>()?),
        "generate" | "gen" => UiEvent::Generate((!rest.is_empty()).then(|| rest.to_string())),
        "post" => {
            let mut args = require(rest, "post", "a video id")?.split_whitespace();
            let id = args.next().unwrap_or_default().to_string();
            let platform = args.next().map(str::parse::<Platform>).transpose()?;
            UiEvent::Post { id, platform }
        }
        "delete" | "rm" => UiEvent::Remove(require(rest, "delete", "a video id")?.to_string()),
        "list" | "ls" => UiEvent::List,
        "key" => UiEvent::SelectKey,
        "help" | "?" => UiEvent::Help,
        "quit" | "exit" => UiEvent::Quit,
        other => return Err(CommandError::Unknown(other.to_string())),
    };

    Ok(Some(event))
}

fn require<'a>(rest: &'a str, command: &'static str, argument: &'static str) -> Result<&'a str, CommandError> {
    if rest.is_empty() {
        Err(CommandError::MissingArgument { command, argument })
    } else {
        Ok(rest)
    }
}
