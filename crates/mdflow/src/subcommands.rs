//! Tool subcommands (spec §6): consumed before file dispatch, so none of
//! these touch the main pipeline's spawn step.

use std::path::PathBuf;

use clap::CommandFactory;
use dialoguer::Confirm;
use mdflow_core::MdflowError;

use crate::cli::Cli;
use crate::document::parse_document;

pub fn help() {
    Cli::command().print_long_help().ok();
    println!();
}

/// Prints the debug log for `agent_name`, redacting sensitive-looking
/// lines the same way the log writer would have masked them at write time.
pub fn logs(agent_name: &str) -> Result<(), MdflowError> {
    let path = mdflow_config::paths::agent_log_path(agent_name)
        .map_err(|e| MdflowError::ConfigParse {
            path: PathBuf::from(agent_name),
            message: e.to_string(),
        })?;

    if !path.exists() {
        eprintln!("no log file for agent '{agent_name}' (looked at {})", path.display());
        return Ok(());
    }

    let content = std::fs::read_to_string(&path)?;
    print!("{content}");
    Ok(())
}

/// Interactively scaffolds the per-user config directory: creates the
/// directory, a starter `config.yaml`, and empty `known_hosts`/history
/// files so later commands find a populated cascade instead of silently
/// falling back to defaults.
pub fn setup() -> Result<(), MdflowError> {
    let config_dir = mdflow_config::paths::config_dir().map_err(|e| MdflowError::ConfigParse {
        path: PathBuf::from("~/.config/mdflow"),
        message: e.to_string(),
    })?;

    if config_dir.exists() {
        println!("config directory already exists at {}", config_dir.display());
        return Ok(());
    }

    let proceed = Confirm::new()
        .with_prompt(format!("Create config directory at {}?", config_dir.display()))
        .default(true)
        .interact()
        .unwrap_or(false);

    if !proceed {
        println!("aborted");
        return Ok(());
    }

    std::fs::create_dir_all(&config_dir)?;
    std::fs::create_dir_all(config_dir.join("cache"))?;
    std::fs::create_dir_all(config_dir.join("logs"))?;
    std::fs::write(
        config_dir.join("config.yaml"),
        "commands: {}\n",
    )?;
    std::fs::write(config_dir.join("known_hosts"), "")?;
    std::fs::write(config_dir.join("history.json"), "{}\n")?;

    println!("initialized config directory at {}", config_dir.display());
    Ok(())
}

/// Scaffolds a new agent markdown file at `name` (a `.md` suffix is added
/// if missing) with a minimal frontmatter block.
pub fn create(name: &str) -> Result<(), MdflowError> {
    let path = if name.ends_with(".md") {
        PathBuf::from(name)
    } else {
        PathBuf::from(format!("{name}.md"))
    };

    if path.exists() {
        return Err(MdflowError::ConfigParse {
            path,
            message: "file already exists".to_string(),
        });
    }

    let template = "---\nmodel: sonnet\nprint: true\n---\n{{ _prompt }}\n";
    std::fs::write(&path, template)?;
    println!("created {}", path.display());
    Ok(())
}

/// Prints the resolved pipeline stages for `file` without spawning a
/// child: parsed metadata, resolved command, and the raw import
/// directives found in the body. Import resolution and template
/// substitution are not executed here (they may hit the network or
/// prompt interactively) — `--_dry-run` is the place for a full render.
pub fn explain(file: &str) -> Result<(), MdflowError> {
    let path = PathBuf::from(file);
    let source = std::fs::read_to_string(&path)?;
    let document = parse_document(&source);

    let resolution = mdflow_exec::resolve_command(None, &path, &document.metadata)?;

    println!("file: {}", path.display());
    println!("command: {} (interactive: {})", resolution.command.as_str(), resolution.interactive);
    println!("metadata: {}", serde_json::to_string_pretty(&document.metadata).unwrap_or_default());

    let variables = mdflow_template::extract_variables(&document.body);
    println!("template variables referenced: {variables:?}");

    let imports = mdflow_import::parser::parse_imports(&document.body);
    if imports.is_empty() {
        println!("imports: none");
    } else {
        println!("imports:");
        for action in &imports {
            println!("  [{}] {:?}", action.index, action.kind);
        }
    }

    Ok(())
}
