//! REPL (Read-Eval-Print Loop) for chatting with a character

use super::command::ReplCommand;
use crate::ReplConfig;
use crate::TranscriptFormatter;
use colored::Colorize;
use juno_application::{ConversationSession, SessionError, SessionSnapshot};
use juno_domain::{CharacterId, UserId};
use rustyline::error::ReadlineError;
use rustyline::{DefaultEditor, Result as RlResult};
use std::sync::Arc;
use tracing::debug;

/// Interactive chat REPL
pub struct ChatRepl {
    session: Arc<ConversationSession>,
    user_id: UserId,
    character_id: CharacterId,
    config: ReplConfig,
}

impl ChatRepl {
    pub fn new(
        session: Arc<ConversationSession>,
        user_id: UserId,
        character_id: CharacterId,
    ) -> Self {
        Self {
            session,
            user_id,
            character_id,
            config: ReplConfig::default(),
        }
    }

    pub fn with_config(mut self, config: ReplConfig) -> Self {
        self.config = config;
        self
    }

    /// Open the conversation and run the interactive loop
    pub async fn run(&self) -> RlResult<()> {
        let mut rl = DefaultEditor::new()?;

        if let Some(path) = &self.config.history_path {
            if let Some(parent) = path.parent() {
                let _ = std::fs::create_dir_all(parent);
            }
            let _ = rl.load_history(path);
        }

        self.open().await;

        loop {
            match rl.readline("you> ") {
                Ok(line) => {
                    if line.trim().is_empty() {
                        continue;
                    }
                    let _ = rl.add_history_entry(line.trim());

                    match ReplCommand::parse(&line) {
                        Ok(ReplCommand::Quit) => {
                            println!("Bye!");
                            break;
                        }
                        Ok(command) => self.dispatch(command).await,
                        Err(message) => println!("{}", message),
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    println!("^C");
                    continue;
                }
                Err(ReadlineError::Eof) => {
                    println!("Bye!");
                    break;
                }
                Err(err) => {
                    eprintln!("Error: {:?}", err);
                    break;
                }
            }
        }

        if let Some(path) = &self.config.history_path {
            let _ = rl.save_history(path);
        }

        Ok(())
    }

    async fn dispatch(&self, command: ReplCommand) {
        match command {
            ReplCommand::Send(text) => self.send(&text).await,
            ReplCommand::History => self.print_transcript(&self.session.snapshot()),
            ReplCommand::Edit { index, text } => {
                let snapshot = self.session.edit_message(index, &text);
                self.print_transcript(&snapshot);
            }
            ReplCommand::Delete(index) => {
                let snapshot = self.session.delete_message(index);
                self.print_transcript(&snapshot);
            }
            ReplCommand::Reroll(index) => {
                match self.session.reroll_message(index).await {
                    Ok(snapshot) => self.print_transcript(&snapshot),
                    Err(e) => self.print_rejection(&e),
                }
            }
            ReplCommand::Retry => self.open().await,
            ReplCommand::Help => Self::print_help(),
            ReplCommand::Quit => {}
        }
    }

    async fn open(&self) {
        let result = self
            .session
            .open_conversation(self.user_id.clone(), self.character_id.clone())
            .await;

        match result {
            Ok(snapshot) if snapshot.conversation.is_some() => {
                println!();
                println!("{}", TranscriptFormatter::header(&snapshot));
                println!("{}", TranscriptFormatter::transcript(&snapshot));
                println!();
                println!("{}", "Type a message, or /help for commands.".dimmed());
            }
            Ok(snapshot) => {
                if let Some(banner) = TranscriptFormatter::banner(&snapshot) {
                    println!("{}", banner);
                }
                println!("{}", "Use /retry to try again, /quit to leave.".dimmed());
            }
            Err(e) => self.print_rejection(&e),
        }
    }

    async fn send(&self, text: &str) {
        let snapshot = match self.session.send_message(text).await {
            Ok(snapshot) => snapshot,
            Err(e) => return self.print_rejection(&e),
        };
        let Some(report) = &snapshot.last_send else {
            return;
        };

        let name = snapshot
            .character
            .as_ref()
            .map(|c| c.name.as_str())
            .unwrap_or("Character");
        match &report.reply {
            Some(reply) => {
                let index = snapshot.transcript.len().saturating_sub(1);
                println!("{}", TranscriptFormatter::turn(index, reply, name));
            }
            None => {
                debug!("Send stopped at stage {:?}", report.stage);
                if let Some(message) = TranscriptFormatter::send_failure(report, name) {
                    println!("{}", message);
                }
            }
        }
    }

    fn print_transcript(&self, snapshot: &SessionSnapshot) {
        println!("{}", TranscriptFormatter::transcript(snapshot));
    }

    fn print_rejection(&self, error: &SessionError) {
        match error {
            SessionError::NotReady => println!(
                "{} {}",
                error.to_string().yellow(),
                "(use /retry to open it)".dimmed()
            ),
            other => println!("{}", other.to_string().yellow()),
        }
    }

    fn print_help() {
        println!();
        println!("Commands:");
        println!("  <text>             - Send a message");
        println!("  /history           - Show the conversation");
        println!("  /edit <n> <text>   - Change message n (this view only)");
        println!("  /delete <n>        - Remove message n (this view only)");
        println!("  /reroll <n>        - Ask for another version of reply n");
        println!("  /retry             - Re-open the conversation");
        println!("  /help, /h, /?      - Show this help");
        println!("  /quit, /exit, /q   - Exit chat");
        println!();
    }
}
