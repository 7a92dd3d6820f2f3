//! Persisted state layout, all under a per-user config directory
//! (`directories::ProjectDirs::from("", "", "mdflow")`), mirroring the XDG
//! resolution `csa-config::paths` uses for cli-sub-agent.

use std::path::PathBuf;

use anyhow::{Context, Result};

fn project_dirs() -> Result<directories::ProjectDirs> {
    directories::ProjectDirs::from("", "", "mdflow").context("failed to determine config directory")
}

/// `~/.config/mdflow` (or platform equivalent).
pub fn config_dir() -> Result<PathBuf> {
    Ok(project_dirs()?.config_dir().to_path_buf())
}

/// The user-global config file, searched after built-in defaults and before
/// any project-level file.
pub fn user_global_config_path() -> Result<PathBuf> {
    Ok(config_dir()?.join("config.yaml"))
}

/// `known_hosts` — the trust store.
pub fn known_hosts_path() -> Result<PathBuf> {
    Ok(config_dir()?.join("known_hosts"))
}

/// `history.json` — variable recall.
pub fn history_path() -> Result<PathBuf> {
    Ok(config_dir()?.join("history.json"))
}

/// `cache/<hash>` — URL cache entries.
pub fn cache_dir() -> Result<PathBuf> {
    Ok(config_dir()?.join("cache"))
}

/// `logs/<agent-name>/debug.log`.
pub fn agent_log_path(agent_name: &str) -> Result<PathBuf> {
    Ok(config_dir()?.join("logs").join(agent_name).join("debug.log"))
}

/// Project-level config filenames, in priority order (first existing wins).
pub const PROJECT_CONFIG_NAMES: &[&str] =
    &["mdflow.config.yaml", ".mdflow.yaml", ".mdflow.json"];

/// Walks upward from `start` looking for a `.git` directory, returning the
/// first ancestor that has one (the "git root"), or `None` if none is found.
pub fn find_git_root(start: &std::path::Path) -> Option<PathBuf> {
    let mut dir = start.to_path_buf();
    loop {
        if dir.join(".git").exists() {
            return Some(dir);
        }
        if !dir.pop() {
            return None;
        }
    }
}

/// Writes `content` to `path` atomically via write-then-rename into a
/// sibling temp file, so concurrent readers never observe a partial file.
pub fn write_atomic(path: &std::path::Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory {}", parent.display()))?;
    }
    let tmp_path = path.with_extension("tmp");
    std::fs::write(&tmp_path, content)
        .with_context(|| format!("failed to write {}", tmp_path.display()))?;
    std::fs::rename(&tmp_path, path)
        .with_context(|| format!("failed to rename into place: {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn find_git_root_locates_ancestor() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path();
        std::fs::create_dir_all(root.join(".git")).unwrap();
        let nested = root.join("a/b/c");
        std::fs::create_dir_all(&nested).unwrap();
        assert_eq!(find_git_root(&nested), Some(root.to_path_buf()));
    }

    #[test]
    fn find_git_root_returns_none_without_git_dir() {
        let tmp = tempfile::tempdir().unwrap();
        assert_eq!(find_git_root(tmp.path()), None);
    }

    #[test]
    fn write_atomic_creates_parent_dirs_and_content() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("nested/dir/file.txt");
        write_atomic(&path, "hello").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "hello");
    }
}
