//! The execution stage (spec §4.9-4.11): maps metadata to argv, applies
//! per-command interactive transforms, resolves which command to run, and
//! spawns it with tee'd capture and a failure auto-heal menu.

pub mod adapters;
pub mod argv;
pub mod menu;
pub mod process;
pub mod resolve_command;

pub use argv::build_argv;
pub use menu::{present_failure_menu, MenuChoice};
pub use process::{spawn_and_capture, SpawnOutcome};
pub use resolve_command::{resolve_command, CommandResolution};
