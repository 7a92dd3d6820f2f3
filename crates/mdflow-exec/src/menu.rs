//! Failure auto-heal menu (spec §4.11): offered when stdin is a TTY and
//! the child exits non-zero. The fix-with-AI prompt format is fixed:
//! `--- STDERR ---`, `--- STDOUT (partial) ---`, then `Original request:`.

use dialoguer::Select;
use mdflow_core::MdflowError;

const TAIL_BYTES: usize = 2_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    Retry,
    FixWithAi,
    Quit,
}

/// Presents the three-option menu. Returns `UserCancelled` if the prompt
/// itself is interrupted (e.g. Ctrl-C at the selector).
pub fn present_failure_menu(exit_code: i32) -> Result<MenuChoice, MdflowError> {
    let options = ["Retry", "Fix with AI", "Quit"];
    let selection = Select::new()
        .with_prompt(format!("Command exited with code {exit_code}. What next?"))
        .items(&options)
        .default(0)
        .interact_opt()
        .map_err(|_| MdflowError::UserCancelled)?;

    match selection {
        Some(0) => Ok(MenuChoice::Retry),
        Some(1) => Ok(MenuChoice::FixWithAi),
        _ => Ok(MenuChoice::Quit),
    }
}

/// Builds the secondary "fix it" prompt: the original request, exit code,
/// and the truncated (last `TAIL_BYTES`) tails of stderr/stdout, in the
/// spec's fixed section order.
pub fn build_fix_prompt(original_request: &str, exit_code: i32, stderr: &str, stdout: &str) -> String {
    format!(
        "--- STDERR ---\n{}\n--- STDOUT (partial) ---\n{}\n\nOriginal request:\n{}\n\n(exit code: {})",
        tail(stderr),
        tail(stdout),
        original_request,
        exit_code
    )
}

fn tail(s: &str) -> &str {
    if s.len() <= TAIL_BYTES {
        return s;
    }
    let start = s.len() - TAIL_BYTES;
    let mut boundary = start;
    while boundary < s.len() && !s.is_char_boundary(boundary) {
        boundary += 1;
    }
    &s[boundary..]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fix_prompt_has_fixed_section_order() {
        let prompt = build_fix_prompt("do the thing", 1, "err text", "out text");
        let stderr_pos = prompt.find("--- STDERR ---").unwrap();
        let stdout_pos = prompt.find("--- STDOUT (partial) ---").unwrap();
        let original_pos = prompt.find("Original request:").unwrap();
        assert!(stderr_pos < stdout_pos);
        assert!(stdout_pos < original_pos);
    }

    #[test]
    fn tail_truncates_to_last_2000_bytes() {
        let long = "x".repeat(5_000);
        let result = tail(&long);
        assert_eq!(result.len(), TAIL_BYTES);
    }

    #[test]
    fn tail_leaves_short_strings_untouched() {
        assert_eq!(tail("short"), "short");
    }
}
