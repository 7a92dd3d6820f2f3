//! Command resolver (spec §4.10): decides which external command to run,
//! in priority order CLI flag > filename suffix > metadata hint.

use std::path::Path;

use mdflow_core::{CommandName, Metadata, MdflowError};

pub struct CommandResolution {
    pub command: CommandName,
    pub interactive: bool,
}

/// Resolves the command for a regular `md <file.md>` invocation.
pub fn resolve_command(
    cli_command_flag: Option<&str>,
    agent_path: &Path,
    metadata: &Metadata,
) -> Result<CommandResolution, MdflowError> {
    if let Some(name) = cli_command_flag {
        let command = name
            .parse()
            .map_err(|_| MdflowError::NoCommand)?;
        return Ok(CommandResolution {
            command,
            interactive: false,
        });
    }

    if let Some((command, interactive)) = command_from_filename(agent_path) {
        return Ok(CommandResolution { command, interactive });
    }

    if let Some(hint) = metadata.get("_command").and_then(|v| v.as_str()) {
        let command = hint.parse().map_err(|_| MdflowError::NoCommand)?;
        return Ok(CommandResolution {
            command,
            interactive: false,
        });
    }

    Err(MdflowError::NoCommand)
}

/// Parses `NAME.<command>.md` or `NAME.i.<command>.md` from a filename. The
/// `.i.` segment is decorative (requests interactive mode); the command is
/// always the last dotted segment before `.md`.
fn command_from_filename(path: &Path) -> Option<(CommandName, bool)> {
    let name = path.file_name()?.to_str()?;
    let stem = name.strip_suffix(".md")?;
    let mut segments: Vec<&str> = stem.split('.').collect();
    if segments.len() < 2 {
        return None;
    }
    let command_str = segments.pop()?;
    let command: CommandName = command_str.parse().ok()?;
    let interactive = segments.last() == Some(&"i");
    Some((command, interactive))
}

/// The known value-taking ad-hoc flags (spec §4.10's "small known list"),
/// used to disambiguate `--flag value` from `--flag` bare when dispatching
/// through the `md.<command>` basename entry point.
pub const VALUE_TAKING_FLAGS: &[&str] = &[
    "--model",
    "--_command",
    "-_c",
    "--_context",
    "--temperature",
    "--max-tokens",
];
