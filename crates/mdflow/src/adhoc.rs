//! Ad-hoc invocation (spec §4.10): when the binary is invoked under a
//! basename like `md.claude` or `md.i.claude`, the first non-flag CLI
//! positional becomes the body of an implicit virtual agent file rather
//! than a path to a real one.

use mdflow_core::CommandName;
use mdflow_exec::resolve_command::VALUE_TAKING_FLAGS;

/// Detects `md.<command>` / `md.i.<command>` basenames, tolerating a
/// trailing `.ts`/`.js` (the shim scripts some shells wrap this binary in).
pub fn detect_adhoc(program_name: &str) -> Option<(CommandName, bool)> {
    let stem = program_name
        .strip_suffix(".ts")
        .or_else(|| program_name.strip_suffix(".js"))
        .unwrap_or(program_name);

    let rest = stem.strip_prefix("md.")?;
    if let Some(command_str) = rest.strip_prefix("i.") {
        let command: CommandName = command_str.parse().ok()?;
        Some((command, true))
    } else {
        let command: CommandName = rest.parse().ok()?;
        Some((command, false))
    }
}

/// Splits `args` into (virtual agent body, remaining passthrough args).
/// The first token that isn't a flag (and isn't the value of a preceding
/// flag from `VALUE_TAKING_FLAGS`) is taken as the body; everything else
/// passes through untouched, in order.
pub fn extract_adhoc_body(args: &[String]) -> (String, Vec<String>) {
    let mut body = String::new();
    let mut rest = Vec::new();
    let mut found_body = false;
    let mut iter = args.iter().peekable();

    while let Some(arg) = iter.next() {
        if !found_body && !is_flag(arg) {
            body = arg.clone();
            found_body = true;
            continue;
        }

        rest.push(arg.clone());
        if is_flag(arg) && VALUE_TAKING_FLAGS.contains(&arg.as_str()) {
            if let Some(value) = iter.next() {
                rest.push(value.clone());
            }
        }
    }

    (body, rest)
}

fn is_flag(arg: &str) -> bool {
    arg.starts_with('-')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_plain_command_basename() {
        let (command, interactive) = detect_adhoc("md.claude").unwrap();
        assert_eq!(command, CommandName::Claude);
        assert!(!interactive);
    }

    #[test]
    fn detects_interactive_basename() {
        let (command, interactive) = detect_adhoc("md.i.gemini").unwrap();
        assert_eq!(command, CommandName::Gemini);
        assert!(interactive);
    }

    #[test]
    fn tolerates_trailing_script_extension() {
        let (command, _) = detect_adhoc("md.codex.ts").unwrap();
        assert_eq!(command, CommandName::Codex);
    }

    #[test]
    fn rejects_unrelated_basename() {
        assert!(detect_adhoc("md").is_none());
        assert!(detect_adhoc("bash").is_none());
    }

    #[test]
    fn first_non_flag_token_becomes_body() {
        let args = vec!["--_quiet".to_string(), "summarize this".to_string(), "--raw".to_string()];
        let (body, rest) = extract_adhoc_body(&args);
        assert_eq!(body, "summarize this");
        assert_eq!(rest, vec!["--_quiet".to_string(), "--raw".to_string()]);
    }

    #[test]
    fn value_taking_flag_keeps_its_value_out_of_the_body_slot() {
        let args = vec![
            "--model".to_string(),
            "opus".to_string(),
            "the real prompt".to_string(),
        ];
        let (body, rest) = extract_adhoc_body(&args);
        assert_eq!(body, "the real prompt");
        assert_eq!(rest, vec!["--model".to_string(), "opus".to_string()]);
    }
}
