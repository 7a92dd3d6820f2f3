//! Per-command interactive-mode adapters (spec §4.9): each adapter edits
//! the metadata map in place to switch a command into interactive mode.

use mdflow_core::{CommandName, MetaValue, Metadata};

/// True when metadata, the filename, or the CLI requests interactive mode.
pub fn wants_interactive(metadata: &Metadata, filename_has_i_segment: bool, cli_flag: bool) -> bool {
    metadata.wants_interactive() || filename_has_i_segment || cli_flag
}

/// Applies the command-specific interactive-mode transform in place.
pub fn apply_interactive_transform(command: CommandName, metadata: &mut Metadata) {
    match command {
        CommandName::Claude => {
            metadata.remove("print");
        }
        CommandName::Codex => {
            metadata.remove("_subcommand");
        }
        CommandName::Gemini => {
            metadata.insert("$1", MetaValue::String("prompt-interactive".to_string()));
        }
        CommandName::Copilot => {
            metadata.insert("$1", MetaValue::String("interactive".to_string()));
        }
    }
    metadata.remove("_interactive");
    metadata.remove("_i");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn claude_interactive_removes_print() {
        let mut metadata = Metadata::new();
        metadata.insert("print", MetaValue::Bool(true));
        apply_interactive_transform(CommandName::Claude, &mut metadata);
        assert!(metadata.get("print").is_none());
    }

    #[test]
    fn codex_interactive_removes_subcommand() {
        let mut metadata = Metadata::new();
        metadata.insert("_subcommand", MetaValue::String("exec".to_string()));
        apply_interactive_transform(CommandName::Codex, &mut metadata);
        assert!(metadata.get("_subcommand").is_none());
    }

    #[test]
    fn gemini_interactive_sets_positional_one() {
        let mut metadata = Metadata::new();
        apply_interactive_transform(CommandName::Gemini, &mut metadata);
        assert_eq!(
            metadata.get("$1"),
            Some(&MetaValue::String("prompt-interactive".to_string()))
        );
    }

    #[test]
    fn copilot_interactive_sets_positional_one() {
        let mut metadata = Metadata::new();
        apply_interactive_transform(CommandName::Copilot, &mut metadata);
        assert_eq!(
            metadata.get("$1"),
            Some(&MetaValue::String("interactive".to_string()))
        );
    }

    #[test]
    fn interactive_flag_always_dropped_after_transform() {
        let mut metadata = Metadata::new();
        metadata.insert("_interactive", MetaValue::Bool(true));
        apply_interactive_transform(CommandName::Claude, &mut metadata);
        assert!(metadata.get("_interactive").is_none());
    }
}
