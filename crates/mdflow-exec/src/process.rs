//! Process executor (spec §4.11): spawns the resolved command, tees its
//! output streams when capturing, and normalizes the exit code — 127 for a
//! missing binary, 0 when a downstream pipe closes our stdout early.

use std::collections::HashMap;
use std::path::Path;
use std::process::Stdio;

use mdflow_core::MdflowError;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::process::Command;

pub struct SpawnOutcome {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

/// Spawns `binary` with `argv`, feeding `stdin_payload` and, in print mode,
/// teeing stdout/stderr to both the terminal and an in-memory buffer. In
/// interactive mode the child inherits the terminal directly and the
/// returned buffers are empty.
pub async fn spawn_and_capture(
    binary: &str,
    argv: &[String],
    cwd: &Path,
    env_overlay: &HashMap<String, String>,
    stdin_payload: &str,
    interactive: bool,
) -> Result<SpawnOutcome, MdflowError> {
    if which::which(binary).is_err() {
        eprintln!("command not found: {binary}");
        return Ok(SpawnOutcome {
            exit_code: 127,
            stdout: String::new(),
            stderr: String::new(),
        });
    }

    let mut command = Command::new(binary);
    command.args(argv);
    command.current_dir(cwd);
    command.envs(env_overlay);

    if interactive {
        command.stdin(Stdio::inherit());
        command.stdout(Stdio::inherit());
        command.stderr(Stdio::inherit());
        let status = command
            .status()
            .await
            .map_err(|_| MdflowError::ChildSpawnFailed(binary.to_string()))?;
        return Ok(SpawnOutcome {
            exit_code: status.code().unwrap_or(1),
            stdout: String::new(),
            stderr: String::new(),
        });
    }

    command.stdin(Stdio::piped());
    command.stdout(Stdio::piped());
    command.stderr(Stdio::piped());

    let mut child = command
        .spawn()
        .map_err(|_| MdflowError::ChildSpawnFailed(binary.to_string()))?;

    if let Some(mut stdin) = child.stdin.take() {
        let payload = stdin_payload.to_string();
        tokio::spawn(async move {
            let _ = stdin.write_all(payload.as_bytes()).await;
        });
    }

    let mut stdout_pipe = child.stdout.take().expect("stdout piped");
    let mut stderr_pipe = child.stderr.take().expect("stderr piped");

    let stdout_task = tokio::spawn(async move {
        let mut buf = Vec::new();
        let _ = tee_to_terminal(&mut stdout_pipe, &mut buf, false).await;
        buf
    });
    let stderr_task = tokio::spawn(async move {
        let mut buf = Vec::new();
        let _ = tee_to_terminal(&mut stderr_pipe, &mut buf, true).await;
        buf
    });

    let status = child
        .wait()
        .await
        .map_err(|_| MdflowError::ChildSpawnFailed(binary.to_string()))?;

    let stdout_bytes = stdout_task.await.unwrap_or_default();
    let stderr_bytes = stderr_task.await.unwrap_or_default();

    Ok(SpawnOutcome {
        exit_code: status.code().unwrap_or(1),
        stdout: String::from_utf8_lossy(&stdout_bytes).to_string(),
        stderr: String::from_utf8_lossy(&stderr_bytes).to_string(),
    })
}

/// Reads `source` to EOF, writing every chunk both to the process's own
/// terminal stream and into `collector`. A broken pipe on the terminal side
/// (a downstream reader going away) is swallowed here rather than aborting
/// the tee early: the reported exit code still comes from the child's own
/// status, so a closed stdout never turns into a failure by itself (spec
/// §4.11, §6).
async fn tee_to_terminal(
    source: &mut (impl tokio::io::AsyncRead + Unpin),
    collector: &mut Vec<u8>,
    is_stderr: bool,
) -> std::io::Result<()> {
    let mut buf = [0u8; 8192];
    loop {
        let n = source.read(&mut buf).await?;
        if n == 0 {
            break;
        }
        collector.extend_from_slice(&buf[..n]);
        let write_result = if is_stderr {
            tokio::io::stderr().write_all(&buf[..n]).await
        } else {
            tokio::io::stdout().write_all(&buf[..n]).await
        };
        if let Err(e) = write_result {
            if e.kind() == std::io::ErrorKind::BrokenPipe {
                continue;
            }
        }
    }
    Ok(())
}
