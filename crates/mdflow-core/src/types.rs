use std::collections::HashMap;
use std::path::PathBuf;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// The external AI-assistant command an agent file resolves to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CommandName {
    Claude,
    Codex,
    Gemini,
    Copilot,
}

impl CommandName {
    /// Returns the CLI-facing (and filename-suffix, and config-key) name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Claude => "claude",
            Self::Codex => "codex",
            Self::Gemini => "gemini",
            Self::Copilot => "copilot",
        }
    }

    /// The binary name to look up on PATH. Identical to `as_str()` for every
    /// known command today but kept distinct since adapters may diverge from
    /// their config-key name in the future.
    pub fn binary_name(&self) -> &'static str {
        self.as_str()
    }
}

impl std::fmt::Display for CommandName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for CommandName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "claude" => Ok(Self::Claude),
            "codex" => Ok(Self::Codex),
            "gemini" => Ok(Self::Gemini),
            "copilot" => Ok(Self::Copilot),
            other => Err(format!(
                "unknown command '{other}'. Valid values: claude, codex, gemini, copilot"
            )),
        }
    }
}

/// Immutable-by-convention bundle of everything the resolution pipeline
/// needs that isn't the document itself: merged config, collected template
/// variables, the environment overlay to apply to the child process, the
/// working directory imports resolve relative to, the stdin payload (if
/// any was piped into this process), and TTY facts used to decide whether
/// interactive prompts (trust, variable recovery, failure menu) are legal.
#[derive(Debug, Clone, Default)]
pub struct RunContext {
    pub env_overlay: HashMap<String, String>,
    pub cwd: PathBuf,
    pub piped_stdin: Option<String>,
    pub stdin_is_tty: bool,
    pub stdout_is_tty: bool,
}

impl RunContext {
    pub fn new(cwd: PathBuf) -> Self {
        Self {
            env_overlay: HashMap::new(),
            cwd,
            piped_stdin: None,
            stdin_is_tty: false,
            stdout_is_tty: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn command_name_round_trips_through_str() {
        for cmd in [
            CommandName::Claude,
            CommandName::Codex,
            CommandName::Gemini,
            CommandName::Copilot,
        ] {
            let s = cmd.to_string();
            assert_eq!(CommandName::from_str(&s).unwrap(), cmd);
        }
    }

    #[test]
    fn command_name_rejects_unknown() {
        assert!(CommandName::from_str("not-a-command").is_err());
    }

    #[test]
    fn command_name_is_case_sensitive() {
        assert!(CommandName::from_str("Claude").is_err());
    }
}
