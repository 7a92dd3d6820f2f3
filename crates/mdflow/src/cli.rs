//! CLI surface (spec §6). `--_`-prefixed long flags can't be spelled as
//! Rust field identifiers, so every tool-reserved flag pins its `long`
//! name explicitly.

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "md", version, about = "Turns a markdown file into an AI-assistant invocation")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Markdown agent file to run (when no subcommand is given).
    pub file: Option<String>,

    /// Command to run, overriding filename/metadata resolution.
    #[arg(long = "_command")]
    pub command_override: Option<String>,

    /// Print the resolved argv and stdin payload without spawning.
    #[arg(long = "_dry-run")]
    pub dry_run: bool,

    /// Open the resolved agent file in $EDITOR/$VISUAL before running.
    #[arg(long = "_edit")]
    pub edit: bool,

    /// Trust the host(s) this run fetches from without prompting.
    #[arg(long = "_trust")]
    pub trust: bool,

    /// Bypass the URL cache for this run.
    #[arg(long = "_no-cache")]
    pub no_cache: bool,

    /// Override the model's context-limit for the budgeter.
    #[arg(long = "_context")]
    pub context: Option<usize>,

    /// Suppress non-essential output.
    #[arg(long = "_quiet")]
    pub quiet: bool,

    /// Never offer the failure auto-heal menu; propagate the exit code.
    #[arg(long = "_no-menu")]
    pub no_menu: bool,

    /// Skip reading/writing variable history.
    #[arg(long = "_no-history")]
    pub no_history: bool,

    /// Force interactive mode regardless of metadata/filename.
    #[arg(long = "_interactive", visible_alias = "_i")]
    pub interactive: bool,

    /// Print the raw expanded body instead of spawning the child.
    #[arg(long)]
    pub raw: bool,

    /// Everything after the agent file is passed through to the child.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub passthrough: Vec<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show usage and available subcommands.
    Help,
    /// Show the debug log for a given agent name.
    Logs { agent_name: String },
    /// Interactively scaffold the per-user configuration directory.
    Setup,
    /// Create a new agent markdown file from a template.
    Create { name: String },
    /// Print the resolved pipeline stages for an agent file without running it.
    Explain { file: String },
}
