//! Parsing of REPL input lines

/// One line of REPL input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    /// Plain text: send it as a message
    Send(String),
    History,
    Edit { index: usize, text: String },
    Delete(usize),
    Reroll(usize),
    /// Re-open the conversation after a failed load
    Retry,
    Help,
    Quit,
}

impl ReplCommand {
    /// Parse a non-blank input line.
    ///
    /// Anything not starting with `/` is a message, kept exactly as typed.
    /// Errors are user-facing.
    pub fn parse(line: &str) -> Result<Self, String> {
        let Some(command) = line.trim().strip_prefix('/') else {
            return Ok(ReplCommand::Send(line.to_string()));
        };

        let (name, rest) = match command.split_once(char::is_whitespace) {
            Some((name, rest)) => (name, rest.trim()),
            None => (command, ""),
        };

        match name {
            "quit" | "exit" | "q" => Ok(ReplCommand::Quit),
            "help" | "h" | "?" => Ok(ReplCommand::Help),
            "history" | "ls" => Ok(ReplCommand::History),
            "retry" => Ok(ReplCommand::Retry),
            "delete" | "del" => parse_index(rest, "/delete <n>").map(ReplCommand::Delete),
            "reroll" | "r" => parse_index(rest, "/reroll <n>").map(ReplCommand::Reroll),
            "edit" => {
                let (index, text) = rest
                    .split_once(char::is_whitespace)
                    .ok_or_else(|| "Usage: /edit <n> <text>".to_string())?;
                let index = parse_index(index, "/edit <n> <text>")?;
                let text = text.trim();
                if text.is_empty() {
                    return Err("Usage: /edit <n> <text>".to_string());
                }
                Ok(ReplCommand::Edit {
                    index,
                    text: text.to_string(),
                })
            }
            other => Err(format!(
                "Unknown command: /{}\nType /help for available commands",
                other
            )),
        }
    }
}

fn parse_index(arg: &str, usage: &str) -> Result<usize, String> {
    arg.parse()
        .map_err(|_| format!("Usage: {} (n is the number shown in brackets)", usage))
}
