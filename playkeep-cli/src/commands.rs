use std::str::FromStr;

use anyhow::{Context, bail};
use strum::{EnumIter, EnumString, IntoEnumIterator};

/// Command words understood on stdin
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, EnumString, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum CommandKind {
    Add,
    Remove,
    Clear,
    List,
    Save,
    Load,
    Saved,
    Help,
    Quit,
}

impl CommandKind {
    pub fn usage(&self) -> &'static str {
        match self {
            CommandKind::Add => "add <path|url>   queue a file or stream",
            CommandKind::Remove => "remove <index>   drop the entry at a 1-based position",
            CommandKind::Clear => "clear            empty the queue",
            CommandKind::List => "list             show the queue",
            CommandKind::Save => "save             write the queue file now",
            CommandKind::Load => "load             restore entries from the queue file",
            CommandKind::Saved => "saved            show what the queue file holds",
            CommandKind::Help => "help             this text",
            CommandKind::Quit => "quit             save (if enabled) and exit",
        }
    }
}

/// Commands sent from the terminal to the player
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayerCommand {
    /// Append a path or URI to the queue
    Add(String),
    /// Remove the entry at a 0-based index
    Remove(usize),
    /// Empty the queue
    Clear,
    /// Print the queue
    List,
    /// Save the queue file immediately
    Save,
    /// Load the queue file immediately
    Load,
    /// Print the queue file's entries
    Saved,
    Help,
    /// Shut the player down
    Quit,
}

impl FromStr for PlayerCommand {
    type Err = anyhow::Error;

    fn from_str(line: &str) -> anyhow::Result<Self> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        let kind = CommandKind::from_str(&word.to_lowercase())
            .with_context(|| format!("unknown command {:?}, try `help`", word))?;

        let command = match kind {
            CommandKind::Add => {
                if rest.is_empty() {
                    bail!("usage: {}", kind.usage());
                }
                PlayerCommand::Add(rest.to_string())
            }
            CommandKind::Remove => {
                let position: usize = rest
                    .parse()
                    .with_context(|| format!("usage: {}", kind.usage()))?;
                if position == 0 {
                    bail!("positions start at 1");
                }
                PlayerCommand::Remove(position - 1)
            }
            CommandKind::Clear => PlayerCommand::Clear,
            CommandKind::List => PlayerCommand::List,
            CommandKind::Save => PlayerCommand::Save,
            CommandKind::Load => PlayerCommand::Load,
            CommandKind::Saved => PlayerCommand::Saved,
            CommandKind::Help => PlayerCommand::Help,
            CommandKind::Quit => PlayerCommand::Quit,
        };
        Ok(command)
    }
}

pub fn help_text() -> String {
    CommandKind::iter()
        .map(|kind| format!("  {}", kind.usage()))
        .collect::<Vec<_>>()
        .join("\n")
}
