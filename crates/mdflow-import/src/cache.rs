//! ImportCache (spec §3, §6): an on-disk content-addressed cache for remote
//! URL fetches, keyed by a 16-hex-char truncated hash of the URL plus
//! relevant directives. Write-once per key; concurrent writers may race to
//! write the same key, but content is byte-identical so last-write-wins is
//! safe.

use std::path::PathBuf;

use sha2::{Digest, Sha256};

#[derive(Debug, Clone)]
pub struct ImportCache {
    dir: PathBuf,
}

impl ImportCache {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// 16-hex-char truncated hash of the canonicalized request (URL plus
    /// any directive flags that affect the fetch).
    pub fn key_for(url: &str, directives: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(url.as_bytes());
        hasher.update(b"\0");
        hasher.update(directives.as_bytes());
        let digest = hasher.finalize();
        hex_prefix(&digest, 16)
    }

    pub fn get(&self, key: &str) -> Option<String> {
        std::fs::read_to_string(self.path_for(key)).ok()
    }

    pub fn put(&self, key: &str, content: &str) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.dir)?;
        std::fs::write(self.path_for(key), content)
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(key)
    }
}

fn hex_prefix(bytes: &[u8], hex_chars: usize) -> String {
    let mut s = String::with_capacity(hex_chars);
    for b in bytes {
        if s.len() >= hex_chars {
            break;
        }
        s.push_str(&format!("{b:02x}"));
    }
    s.truncate(hex_chars);
    s
}

pub fn default_cache_dir() -> anyhow::Result<PathBuf> {
    mdflow_config::paths::cache_dir()
}
