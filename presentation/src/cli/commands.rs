//! CLI command definitions

use clap::{Parser, ValueEnum};
use juno_domain::RerollMode;
use std::path::PathBuf;

/// Where a rerolled reply lands
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RerollModeArg {
    /// Keep the original reply and add the new one right after it
    Insert,
    /// Overwrite the original reply
    Replace,
}

impl From<RerollModeArg> for RerollMode {
    fn from(arg: RerollModeArg) -> Self {
        match arg {
            RerollModeArg::Insert => RerollMode::Insert,
            RerollModeArg::Replace => RerollMode::Replace,
        }
    }
}

/// CLI arguments for juno-chat
#[derive(Parser, Debug)]
#[command(name = "juno-chat")]
#[command(author, version, about = "Chat with a JunoChat character from the terminal")]
#[command(long_about = r#"
juno-chat opens (or creates) your conversation with a JunoChat character,
loads its history and lets you keep talking. Replies come from the
configured completion endpoint and every turn is saved to the backend.

Configuration files are loaded from (in priority order):
1. JUNO_* environment variables (e.g. JUNO_BACKEND__BASE_URL)
2. --config <path>     Explicit config file
3. ./juno.toml         Project-level config
4. ~/.config/juno-chat/config.toml   Global config

Example:
  juno-chat --user 3 --character 1
  juno-chat --user 3 --character 1 --token "$JUNOCHAT_TOKEN" --reroll-mode replace
  juno-chat --offline --user me --character 1
"#)]
pub struct Cli {
    /// Character to chat with
    #[arg(short, long, value_name = "ID")]
    pub character: String,

    /// Your JunoChat user id
    #[arg(short, long, value_name = "ID")]
    pub user: String,

    /// Backend auth token (overrides [backend] token)
    #[arg(long, value_name = "TOKEN")]
    pub token: Option<String>,

    /// Use an in-memory backend and canned replies; no network
    #[arg(long)]
    pub offline: bool,

    /// Placement of rerolled replies (overrides [session] reroll_mode)
    #[arg(long, value_enum, value_name = "MODE")]
    pub reroll_mode: Option<RerollModeArg>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal() {
        let cli = Cli::try_parse_from(["juno-chat", "--user", "3", "--character", "1"]).unwrap();
        assert_eq!(cli.user, "3");
        assert_eq!(cli.character, "1");
        assert!(!cli.offline);
        assert_eq!(cli.reroll_mode, None);
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn test_parse_overrides() {
        let cli = Cli::try_parse_from([
            "juno-chat",
            "-u",
            "3",
            "-c",
            "1",
            "--offline",
            "--reroll-mode",
            "replace",
            "-vv",
        ])
        .unwrap();
        assert!(cli.offline);
        assert_eq!(
            cli.reroll_mode.map(RerollMode::from),
            Some(RerollMode::Replace)
        );
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn test_character_is_required() {
        assert!(Cli::try_parse_from(["juno-chat", "--user", "3"]).is_err());
    }
}
