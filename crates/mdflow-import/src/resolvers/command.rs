//! Command/ExecutableFence resolver (spec §4.3): runs a subprocess through
//! the user's shell, inheriting the process environment plus any `_env`
//! overlay, and captures stdout. A non-zero exit is fatal and carries
//! stderr for diagnostics.

use std::collections::HashMap;
use std::path::Path;
use std::process::Stdio;

use mdflow_core::MdflowError;

/// Runs `command` via `sh -c` (or `cmd /C` on Windows) in `cwd`, with `env`
/// merged on top of the inherited environment.
pub async fn resolve_command(
    command: &str,
    cwd: &Path,
    env: &HashMap<String, String>,
) -> Result<String, MdflowError> {
    let mut cmd = shell_command(command);
    cmd.current_dir(cwd);
    cmd.envs(env);
    cmd.stdin(Stdio::null());
    cmd.stdout(Stdio::piped());
    cmd.stderr(Stdio::piped());

    let output = cmd
        .output()
        .await
        .map_err(|_| MdflowError::ChildSpawnFailed(command.to_string()))?;

    if !output.status.success() {
        return Err(MdflowError::CommandImportFailed {
            command: command.to_string(),
            exit_code: output.status.code().unwrap_or(-1),
            stderr: String::from_utf8_lossy(&output.stderr).trim_end().to_string(),
        });
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim_end().to_string())
}

#[cfg(target_os = "windows")]
fn shell_command(command: &str) -> tokio::process::Command {
    let mut cmd = tokio::process::Command::new("cmd");
    cmd.arg("/C").arg(command);
    cmd
}

#[cfg(not(target_os = "windows"))]
fn shell_command(command: &str) -> tokio::process::Command {
    let mut cmd = tokio::process::Command::new("sh");
    cmd.arg("-c").arg(command);
    cmd
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn captures_stdout_on_success() {
        let tmp = tempfile::tempdir().unwrap();
        let result = resolve_command("echo hello", tmp.path(), &HashMap::new())
            .await
            .unwrap();
        assert_eq!(result, "hello");
    }

    #[tokio::test]
    async fn non_zero_exit_is_command_import_failed() {
        let tmp = tempfile::tempdir().unwrap();
        let err = resolve_command("echo oops 1>&2; exit 3", tmp.path(), &HashMap::new())
            .await
            .unwrap_err();
        match err {
            MdflowError::CommandImportFailed {
                exit_code, stderr, ..
            } => {
                assert_eq!(exit_code, 3);
                assert!(stderr.contains("oops"));
            }
            other => panic!("expected CommandImportFailed, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn env_overlay_is_visible_to_command() {
        let tmp = tempfile::tempdir().unwrap();
        let mut env = HashMap::new();
        env.insert("MDFLOW_TEST_VAR".to_string(), "xyz".to_string());
        let result = resolve_command("echo $MDFLOW_TEST_VAR", tmp.path(), &env)
            .await
            .unwrap();
        assert_eq!(result, "xyz");
    }
}
