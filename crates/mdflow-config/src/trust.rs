//! TrustStore: the set of hostnames trusted for remote URL execution,
//! persisted as a newline-delimited `known_hosts` file under the config
//! directory. Comment lines beginning with `#` and blank lines are ignored.

use std::collections::BTreeSet;
use std::path::PathBuf;

use anyhow::Result;

use crate::paths;

#[derive(Debug, Default)]
pub struct TrustStore {
    path: PathBuf,
    hosts: BTreeSet<String>,
}

impl TrustStore {
    /// Loads from the default `known_hosts` path, or starts empty if it
    /// doesn't exist yet (lazily created on first use, per spec §3).
    pub fn load() -> Result<Self> {
        Self::load_from(paths::known_hosts_path()?)
    }

    pub fn load_from(path: PathBuf) -> Result<Self> {
        let hosts = if path.exists() {
            parse_known_hosts(&std::fs::read_to_string(&path)?)
        } else {
            BTreeSet::new()
        };
        Ok(Self { path, hosts })
    }

    pub fn is_trusted(&self, host: &str) -> bool {
        self.hosts.contains(host)
    }

    /// Adds `host` and persists the file via write-then-rename.
    pub fn remember(&mut self, host: &str) -> Result<()> {
        self.hosts.insert(host.to_string());
        let content = self
            .hosts
            .iter()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join("\n");
        paths::write_atomic(&self.path, &format!("{content}\n"))
    }
}

fn parse_known_hosts(content: &str) -> BTreeSet<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}
