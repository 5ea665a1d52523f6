//! Console rendering of transcripts and session errors

use colored::Colorize;
use juno_application::{SendReport, SendStage, SendStep, SessionSnapshot};
use juno_domain::{Role, Turn};

/// Formats conversation state for console display
pub struct TranscriptFormatter;

impl TranscriptFormatter {
    /// Header shown once a conversation is open
    pub fn header(snapshot: &SessionSnapshot) -> String {
        let name = Self::character_name(snapshot);
        let line = "─".repeat(50);
        let mut output = format!("{}\n{}", line.cyan(), format!(" Chatting with {}", name).bold());

        if let Some(character) = &snapshot.character {
            let description = character.description.trim();
            if !description.is_empty() {
                output.push_str(&format!("\n {}", description.dimmed()));
            }
        }
        output.push_str(&format!("\n{}", line.cyan()));
        output
    }

    /// One indexed turn, e.g. `[3] Juno: hello`
    pub fn turn(index: usize, turn: &Turn, character_name: &str) -> String {
        let index = format!("[{}]", index);
        let width = index.len() + character_name.len() + 3;
        let index = index.dimmed();
        match turn.role {
            Role::User => format!("{} {} {}", index, "You:".cyan().bold(), turn.content),
            Role::Assistant => format!(
                "{} {} {}",
                index,
                format!("{}:", character_name).yellow().bold(),
                Self::indent_continuation(&turn.content, width)
            ),
            Role::System => format!("{} {}", index, turn.content.italic().dimmed()),
        }
    }

    /// The whole transcript followed by the error banner, if any
    pub fn transcript(snapshot: &SessionSnapshot) -> String {
        let name = Self::character_name(snapshot);
        let mut lines: Vec<String> = snapshot
            .transcript
            .turns()
            .iter()
            .enumerate()
            .map(|(i, turn)| Self::turn(i, turn, name))
            .collect();

        if lines.is_empty() {
            lines.push("(no messages yet)".dimmed().to_string());
        }
        if let Some(banner) = Self::banner(snapshot) {
            lines.push(banner);
        }
        lines.join("\n")
    }

    /// Persistent error banner
    pub fn banner(snapshot: &SessionSnapshot) -> Option<String> {
        snapshot
            .error
            .as_ref()
            .map(|error| format!("{} {}", "!".red().bold(), error.red()))
    }

    /// What went wrong with a submission, in user terms
    pub fn send_failure(report: &SendReport, character_name: &str) -> Option<String> {
        let failure = report.failure.as_ref()?;
        let summary = match (report.stage, failure.step) {
            (SendStage::Appended, _) => "Your message could not be saved.".to_string(),
            (_, SendStep::GenerateReply) => {
                format!("Your message was saved, but {} did not reply.", character_name)
            }
            (_, SendStep::PersistReply) => {
                format!("{} replied, but the reply could not be saved.", character_name)
            }
            _ => "Sending failed.".to_string(),
        };
        Some(format!(
            "{} {} {}",
            "!".red().bold(),
            summary.red(),
            format!("({})", failure.error).dimmed()
        ))
    }

    fn character_name(snapshot: &SessionSnapshot) -> &str {
        snapshot
            .character
            .as_ref()
            .map(|c| c.name.as_str())
            .unwrap_or("Character")
    }

    /// Indent every line after the first so multi-line replies stay aligned
    fn indent_continuation(text: &str, width: usize) -> String {
        let pad = " ".repeat(width);
        text.lines()
            .enumerate()
            .map(|(i, line)| {
                if i == 0 {
                    line.to_string()
                } else {
                    format!("{}{}", pad, line)
                }
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use juno_application::{SendFailure, SessionError};
    use juno_domain::{Character, CharacterId, SessionPhase, Transcript};

    fn plain() {
        colored::control::set_override(false);
    }

    fn snapshot(turns: Vec<Turn>, error: Option<&str>) -> SessionSnapshot {
        SessionSnapshot {
            phase: SessionPhase::Ready,
            conversation: None,
            character: Some(Character::new(CharacterId::from(1), "Juno")),
            transcript: Transcript::from_turns(turns),
            error: error.map(str::to_string),
            last_send: None,
        }
    }

    #[test]
    fn test_turns_are_indexed_by_position() {
        plain();
        let output = TranscriptFormatter::transcript(&snapshot(
            vec![
                Turn::user("Hello"),
                Turn::assistant("Hi there"),
                Turn::system("Juno left"),
            ],
            None,
        ));
        assert_eq!(output, "[0] You: Hello\n[1] Juno: Hi there\n[2] Juno left");
    }

    #[test]
    fn test_banner_follows_transcript() {
        plain();
        let output = TranscriptFormatter::transcript(&snapshot(
            vec![Turn::user("Hello")],
            Some("Remote unavailable: timeout"),
        ));
        assert_eq!(output, "[0] You: Hello\n! Remote unavailable: timeout");
    }

    #[test]
    fn test_empty_transcript() {
        plain();
        let output = TranscriptFormatter::transcript(&snapshot(vec![], None));
        assert_eq!(output, "(no messages yet)");
    }

    #[test]
    fn test_multiline_reply_is_aligned() {
        plain();
        let output = TranscriptFormatter::turn(1, &Turn::assistant("one\ntwo"), "Juno");
        assert_eq!(output, "[1] Juno: one\n          two");
    }

    #[test]
    fn test_send_failure_wording() {
        plain();
        let report = SendReport {
            stage: SendStage::Persisted,
            reply: None,
            failure: Some(SendFailure {
                step: SendStep::GenerateReply,
                error: SessionError::RemoteUnavailable("503".to_string()),
            }),
        };
        let message = TranscriptFormatter::send_failure(&report, "Juno").unwrap();
        assert!(message.starts_with("! Your message was saved, but Juno did not reply."));
    }
}
