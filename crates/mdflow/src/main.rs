use mdflow_core::MdflowError;

mod adhoc;
mod cli;
mod document;
mod logging;
mod pipeline;
mod subcommands;

use cli::{Cli, Commands};

#[tokio::main]
async fn main() {
    let cli = <Cli as clap::Parser>::parse();

    let agent_name = cli
        .file
        .as_deref()
        .and_then(|f| std::path::Path::new(f).file_stem())
        .map(|s| s.to_string_lossy().into_owned());
    let _logging_guard = logging::init(agent_name.as_deref());

    std::process::exit(dispatch(cli).await);
}

async fn dispatch(cli: Cli) -> i32 {
    if let Some(command) = &cli.command {
        return match run_subcommand(command) {
            Ok(()) => 0,
            Err(err) => report_error(&err),
        };
    }

    if let Some(file) = cli.file.clone() {
        return match pipeline::run(&cli, &file).await {
            Ok(outcome) => outcome.exit_code,
            Err(err) => report_error(&err),
        };
    }

    let program_name = std::env::args()
        .next()
        .and_then(|arg0| {
            std::path::Path::new(&arg0)
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
        })
        .unwrap_or_default();

    if let Some((command, interactive)) = adhoc::detect_adhoc(&program_name) {
        let (body, rest) = adhoc::extract_adhoc_body(&cli.passthrough);
        if body.is_empty() {
            eprintln!("usage: {program_name} <prompt> [flags]");
            return 1;
        }
        let mut cli = cli;
        cli.passthrough = rest;
        return match pipeline::run_adhoc(&cli, command, interactive, body).await {
            Ok(outcome) => outcome.exit_code,
            Err(err) => report_error(&err),
        };
    }

    match pick_agent_file() {
        Ok(Some(file)) => match pipeline::run(&cli, &file).await {
            Ok(outcome) => outcome.exit_code,
            Err(err) => report_error(&err),
        },
        Ok(None) => {
            eprintln!("no agent file given and none found in the current directory");
            1
        }
        Err(MdflowError::UserCancelled) => 130,
        Err(err) => report_error(&err),
    }
}

fn run_subcommand(command: &Commands) -> Result<(), MdflowError> {
    match command {
        Commands::Help => {
            subcommands::help();
            Ok(())
        }
        Commands::Logs { agent_name } => subcommands::logs(agent_name),
        Commands::Setup => subcommands::setup(),
        Commands::Create { name } => subcommands::create(name),
        Commands::Explain { file } => subcommands::explain(file),
    }
}

/// PICKER state (spec §4.12): invoked with no file, subcommand, or ad-hoc
/// basename. Offers every `*.md` in the current directory.
fn pick_agent_file() -> Result<Option<String>, MdflowError> {
    let mut candidates: Vec<String> = std::fs::read_dir(".")?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.extension().and_then(|e| e.to_str()) == Some("md"))
        .filter_map(|path| path.file_name().map(|n| n.to_string_lossy().into_owned()))
        .collect();
    candidates.sort();

    if candidates.is_empty() {
        return Ok(None);
    }

    let selection = dialoguer::Select::new()
        .with_prompt("Which agent file?")
        .items(&candidates)
        .default(0)
        .interact_opt()
        .map_err(|_| MdflowError::UserCancelled)?;

    Ok(selection.map(|i| candidates[i].clone()))
}

fn report_error(err: &MdflowError) -> i32 {
    eprintln!("mdflow: {err}");
    if matches!(err, MdflowError::UserCancelled) {
        130
    } else {
        1
    }
}
