//! The top-level state machine (spec §4.12): LOAD → CONFIG-CASCADE →
//! COMMAND-RESOLVE → INTERACTIVE-MODE-APPLY → TEMPLATE-EXTRACT →
//! TEMPLATE-COLLECT → IMPORT-EXPAND → TEMPLATE-SUBSTITUTE → ARGV-BUILD →
//! (DRY-RUN-PRINT | SPAWN) → (SUCCESS | FAILURE-MENU).

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use is_terminal::IsTerminal;
use tokio::sync::Mutex;

use mdflow_config::{ConfigMap, TrustStore, VariableHistory};
use mdflow_core::{MdflowError, Metadata};
use mdflow_exec::adapters::{apply_interactive_transform, wants_interactive};
use mdflow_exec::{build_argv, present_failure_menu, resolve_command, spawn_and_capture, MenuChoice};
use mdflow_import::{resolve_all, ImportCache, ResolveContext};
use mdflow_template::{recover_missing_variables, substitute};

use crate::cli::Cli;
use crate::document::parse_document;

pub struct RunOutcome {
    pub exit_code: i32,
}

pub async fn run(cli: &Cli, file: &str) -> Result<RunOutcome, MdflowError> {
    let path = PathBuf::from(file);
    if cli.edit {
        edit_file(&path)?;
    }
    let source = std::fs::read_to_string(&path)?;
    let document = parse_document(&source);

    let resolution = resolve_command(cli.command_override.as_deref(), &path, &document.metadata)?;

    let cwd = path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));

    run_document(cli, document, resolution, cwd, path)
        .await
}

/// Runs an ad-hoc invocation (spec §4.10): `command`/`interactive` come from
/// the program's own basename, `body` is the first non-flag CLI positional,
/// and there is no real agent file on disk — a synthetic path keys variable
/// history and import resolution runs relative to the current directory.
pub async fn run_adhoc(
    cli: &Cli,
    command: mdflow_core::CommandName,
    interactive: bool,
    body: String,
) -> Result<RunOutcome, MdflowError> {
    let document = mdflow_core::AgentDocument {
        metadata: Metadata::new(),
        body,
        shebang: None,
    };
    let resolution = mdflow_exec::CommandResolution { command, interactive };
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let synthetic_path = cwd.join(format!("<adhoc.{}.md>", command.as_str()));

    run_document(cli, document, resolution, cwd.clone(), synthetic_path)
        .await
}

async fn run_document(
    cli: &Cli,
    document: mdflow_core::AgentDocument,
    resolution: mdflow_exec::CommandResolution,
    cwd: PathBuf,
    path: PathBuf,
) -> Result<RunOutcome, MdflowError> {
    let config = ConfigMap::load_cascade(&cwd);
    let command_defaults: Metadata =
        serde_json::from_value(serde_json::Value::Object(config.command_table(resolution.command.as_str())))
            .unwrap_or_default();

    let mut metadata = document.metadata.clone();
    let interactive = wants_interactive(&metadata, resolution.interactive, cli.interactive);
    if interactive {
        apply_interactive_transform(resolution.command, &mut metadata);
    }

    let stdin_is_tty = std::io::stdin().is_terminal();
    let stdout_is_tty = std::io::stdout().is_terminal();

    let (mut variables, child_passthrough) = split_template_flags(&cli.passthrough);

    if !cli.no_history && stdin_is_tty {
        let mut history = VariableHistory::load().unwrap_or_default();
        recover_missing_variables(&document.body, &path, &mut variables, &mut history)?;
    }

    let client = reqwest::Client::new();
    let cache_dir = if cli.no_cache {
        // A fresh per-process directory that nothing else reads from, so
        // every lookup in this run misses without touching the real cache.
        std::env::temp_dir().join(format!("mdflow-nocache-{}", std::process::id()))
    } else {
        mdflow_import::cache::default_cache_dir()
            .unwrap_or_else(|_| std::env::temp_dir().join("mdflow-cache"))
    };
    let cache = ImportCache::new(cache_dir);
    let trust_store = Arc::new(Mutex::new(TrustStore::load().unwrap_or_default()));

    let resolve_ctx = ResolveContext {
        base_dir: cwd.clone(),
        client,
        cache,
        env: env_overlay(&metadata),
        force_trust: cli.trust,
        stdin_is_tty,
    };

    let mut visited = HashSet::new();
    visited.insert(path.canonicalize().unwrap_or_else(|_| path.clone()));
    let resolved = resolve_all(&document.body, &resolve_ctx, trust_store, &mut visited).await?;
    let expanded_body = mdflow_import::inject::inject_imports(&document.body, &resolved);

    let model = metadata.get("model").and_then(|v| v.as_str());
    match mdflow_import::budget::check_budget(&expanded_body, model, cli.context) {
        mdflow_import::budget::BudgetCheck::Overflow { tokens, limit } => {
            return Err(MdflowError::ContextOverflow { tokens, limit });
        }
        mdflow_import::budget::BudgetCheck::Warn { tokens, limit } => {
            if !cli.quiet {
                tracing::warn!(tokens, limit, "expanded body is close to the model's context limit");
            }
        }
        mdflow_import::budget::BudgetCheck::Ok => {}
    }

    let rendered_body = substitute(&expanded_body, &variables, !stdin_is_tty || cli.no_history)?;

    let argv = build_argv(&command_defaults, &Metadata::new(), &metadata, &child_passthrough);
    tracing::debug!(
        command = resolution.command.as_str(),
        argv = %redact_argv(&argv).join(" "),
        "resolved child invocation"
    );

    if cli.dry_run {
        let argv_line = format!("{} {}", resolution.command.binary_name(), argv.join(" "));
        let _ = write_stdout_line(&argv_line);
        let _ = write_stdout_line(&format!("--- stdin payload ---\n{rendered_body}"));
        return Ok(RunOutcome { exit_code: 0 });
    }

    if cli.raw {
        let _ = write_stdout_line(&rendered_body);
        return Ok(RunOutcome { exit_code: 0 });
    }

    run_with_failure_menu(
        resolution.command.binary_name(),
        &argv,
        &cwd,
        &resolve_ctx.env,
        &rendered_body,
        interactive,
        stdout_is_tty && stdin_is_tty && !cli.no_menu,
        rendered_body.clone(),
    )
    .await
}

async fn run_with_failure_menu(
    binary: &str,
    argv: &[String],
    cwd: &Path,
    env_overlay: &HashMap<String, String>,
    stdin_payload: &str,
    interactive: bool,
    menu_enabled: bool,
    original_request: String,
) -> Result<RunOutcome, MdflowError> {
    let mut current_payload = stdin_payload.to_string();
    loop {
        let outcome = spawn_and_capture(binary, argv, cwd, env_overlay, &current_payload, interactive).await?;
        tracing::info!(exit_code = outcome.exit_code, "child process finished");

        if outcome.exit_code == 0 || !menu_enabled {
            return Ok(RunOutcome {
                exit_code: outcome.exit_code,
            });
        }

        match present_failure_menu(outcome.exit_code)? {
            MenuChoice::Retry => continue,
            MenuChoice::FixWithAi => {
                current_payload = mdflow_exec::menu::build_fix_prompt(
                    &original_request,
                    outcome.exit_code,
                    &outcome.stderr,
                    &outcome.stdout,
                );
            }
            MenuChoice::Quit => {
                return Ok(RunOutcome {
                    exit_code: outcome.exit_code,
                })
            }
        }
    }
}

/// Splits `--_<varname> <value>` pairs (spec §6) out of the trailing
/// passthrough args, returning (template variables, remaining passthrough).
fn split_template_flags(passthrough: &[String]) -> (HashMap<String, String>, Vec<String>) {
    let mut variables = HashMap::new();
    let mut rest = Vec::new();
    let mut iter = passthrough.iter().peekable();
    while let Some(arg) = iter.next() {
        if let Some(name) = arg.strip_prefix("--_") {
            if !name.is_empty() {
                if let Some(value) = iter.next() {
                    variables.insert(format!("_{name}"), value.clone());
                    continue;
                }
            }
        }
        rest.push(arg.clone());
    }
    (variables, rest)
}

/// Writes `line` plus a trailing newline to stdout, reporting (rather than
/// panicking on) a broken pipe: `println!` unwraps its own write and would
/// abort the process when a downstream reader has gone away, which spec §6
/// and §4.11 require converting to a clean exit 0 instead.
fn write_stdout_line(line: &str) -> std::io::Result<()> {
    use std::io::Write;
    let mut stdout = std::io::stdout();
    stdout.write_all(line.as_bytes())?;
    stdout.write_all(b"\n")
}

/// Opens `path` in `$VISUAL`/`$EDITOR` (falling back to `vi`) and waits for
/// the editor to exit before the caller re-reads the file.
fn edit_file(path: &Path) -> Result<(), MdflowError> {
    let editor = std::env::var("VISUAL")
        .or_else(|_| std::env::var("EDITOR"))
        .unwrap_or_else(|_| "vi".to_string());
    let status = std::process::Command::new(editor).arg(path).status()?;
    if !status.success() {
        tracing::warn!("editor exited with non-zero status");
    }
    Ok(())
}

/// Redacts values of sensitive-looking flags before they reach the debug
/// log (spec §7): a `--key`/`value` pair where `key` names a secret gets
/// its value masked, everything else passes through unchanged.
fn redact_argv(argv: &[String]) -> Vec<String> {
    let mut out = Vec::with_capacity(argv.len());
    let mut iter = argv.iter().peekable();
    while let Some(token) = iter.next() {
        out.push(token.clone());
        let flag_name = token.trim_start_matches('-');
        if token.starts_with('-') && mdflow_config::redact::is_sensitive_key(flag_name) {
            if let Some(value) = iter.next() {
                out.push(mdflow_config::redact::redact_for_log(value));
            }
        }
    }
    out
}

fn env_overlay(metadata: &Metadata) -> HashMap<String, String> {
    let mut overlay = HashMap::new();
    if let Some(env_value) = metadata.get("_env") {
        if let mdflow_core::MetaValue::Map(map) = env_value {
            for (k, v) in map {
                overlay.insert(k.clone(), v.to_arg_string());
            }
        }
    }
    overlay
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_template_flags_extracts_underscore_pairs() {
        let passthrough = vec![
            "--_name".to_string(),
            "alice".to_string(),
            "--model".to_string(),
            "opus".to_string(),
        ];
        let (variables, rest) = split_template_flags(&passthrough);
        assert_eq!(variables.get("_name").unwrap(), "alice");
        assert_eq!(rest, vec!["--model".to_string(), "opus".to_string()]);
    }

    #[test]
    fn redact_argv_masks_sensitive_flag_values() {
        let argv = vec![
            "--api-key".to_string(),
            "sk-abc123".to_string(),
            "--model".to_string(),
            "opus".to_string(),
        ];
        let redacted = redact_argv(&argv);
        assert_eq!(redacted[1], "sk-****");
        assert_eq!(redacted[3], "opus");
    }

    #[test]
    fn env_overlay_reads_env_map_from_metadata() {
        let mut metadata = Metadata::new();
        let mut env_map = indexmap::IndexMap::new();
        env_map.insert("FOO".to_string(), mdflow_core::MetaValue::String("bar".into()));
        metadata.insert("_env", mdflow_core::MetaValue::Map(env_map));
        let overlay = env_overlay(&metadata);
        assert_eq!(overlay.get("FOO").unwrap(), "bar");
    }
}
