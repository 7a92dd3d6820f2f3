//! The configuration cascade (spec §3, §4.10 and the "Cascade" glossary
//! entry): built-in defaults → user-global file → git-root project file →
//! CWD project file, each layer overriding the previous at every level.
//!
//! The merge algorithm is generalized from `csa-config::config_merge`'s
//! `merge_toml_values`, retargeted from `toml::Value` to `serde_json::Value`
//! since project config files here are YAML/JSON (spec §6), not TOML.

use std::path::{Path, PathBuf};

use serde_json::{Map, Value};

use crate::paths;

/// `{ commands: { <command>: { <key>: <primitive|array|map> } } }`.
///
/// Invariants: `ConfigMap::builtin_defaults()` is never mutated in place —
/// every accessor returns a fresh value; each merge produces a fresh map.
#[derive(Clone, Debug, Default)]
pub struct ConfigMap {
    commands: Map<String, Value>,
}

impl ConfigMap {
    /// The conceptual floor of the cascade. Returns a fresh, empty map: this
    /// tool ships no non-empty built-in command defaults, but the call
    /// exists so the cascade always has an explicit starting layer to merge
    /// onto, matching the shape described in spec §3.
    pub fn builtin_defaults() -> Self {
        Self {
            commands: Map::new(),
        }
    }

    pub fn from_value(value: Value) -> Self {
        let commands = value
            .get("commands")
            .and_then(Value::as_object)
            .cloned()
            .unwrap_or_default();
        Self { commands }
    }

    /// Deep-merges `overlay` on top of `self`, returning a new `ConfigMap`.
    /// `self` and `overlay` are both left untouched.
    pub fn merged_with(&self, overlay: &ConfigMap) -> ConfigMap {
        let base = Value::Object(self.commands.clone());
        let over = Value::Object(overlay.commands.clone());
        let merged = merge_json(&base, &over);
        match merged {
            Value::Object(m) => ConfigMap { commands: m },
            _ => ConfigMap::default(),
        }
    }

    /// The merged key/value table for `command`, or an empty table if the
    /// command has no entries anywhere in the cascade.
    pub fn command_table(&self, command: &str) -> Map<String, Value> {
        self.commands
            .get(command)
            .and_then(Value::as_object)
            .cloned()
            .unwrap_or_default()
    }

    /// Loads a single config file (YAML or JSON, selected by extension,
    /// defaulting to YAML parsing for unknown/no extension). A parse failure
    /// is `ConfigParse` territory: recovered locally by returning an empty
    /// config and logging a warning, never propagated.
    pub fn load_file(path: &Path) -> ConfigMap {
        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(_) => return ConfigMap::default(),
        };
        let is_json = path.extension().and_then(|e| e.to_str()) == Some("json");
        let parsed = if is_json {
            serde_json::from_str::<Value>(&content)
                .map_err(|e| e.to_string())
        } else {
            serde_yaml::from_str::<Value>(&content)
                .map_err(|e| e.to_string())
                .and_then(|v| serde_json::to_value(&v).map_err(|e| e.to_string()))
        };
        match parsed {
            Ok(v) => ConfigMap::from_value(v),
            Err(message) => {
                tracing::warn!(path = %path.display(), %message, "failed to parse config file, ignoring");
                ConfigMap::default()
            }
        }
    }

    /// Full cascade: built-in defaults → user-global → git-root project →
    /// CWD project. Project files are searched in `paths::PROJECT_CONFIG_NAMES`
    /// priority at each of the two project locations. Configuration is
    /// loaded fresh on every call; there is no cross-run caching (spec §5).
    pub fn load_cascade(cwd: &Path) -> ConfigMap {
        let mut merged = ConfigMap::builtin_defaults();

        if let Ok(user_path) = paths::user_global_config_path() {
            if user_path.exists() {
                merged = merged.merged_with(&ConfigMap::load_file(&user_path));
            }
        }

        if let Some(git_root) = paths::find_git_root(cwd) {
            if git_root != cwd {
                if let Some(path) = find_project_config(&git_root) {
                    merged = merged.merged_with(&ConfigMap::load_file(&path));
                }
            }
        }

        if let Some(path) = find_project_config(cwd) {
            merged = merged.merged_with(&ConfigMap::load_file(&path));
        }

        merged
    }
}

fn find_project_config(dir: &Path) -> Option<PathBuf> {
    paths::PROJECT_CONFIG_NAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|p| p.exists())
}

/// Recursive deep merge: objects merge key-by-key (overlay wins at the
/// leaf); any other value type is replaced wholesale by the overlay's value
/// when present.
pub fn merge_json(base: &Value, overlay: &Value) -> Value {
    match (base, overlay) {
        (Value::Object(base_map), Value::Object(overlay_map)) => {
            let mut merged = base_map.clone();
            for (key, overlay_value) in overlay_map {
                let merged_value = match merged.get(key) {
                    Some(base_value) => merge_json(base_value, overlay_value),
                    None => overlay_value.clone(),
                };
                merged.insert(key.clone(), merged_value);
            }
            Value::Object(merged)
        }
        (_, overlay_value) => overlay_value.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn merge_overlay_wins_at_leaf() {
        let base = json!({"a": {"x": 1, "y": 2}});
        let overlay = json!({"a": {"x": 9}});
        let merged = merge_json(&base, &overlay);
        assert_eq!(merged, json!({"a": {"x": 9, "y": 2}}));
    }

    #[test]
    fn merge_is_associative_for_non_overlapping_keys() {
        let a = json!({"a": 1});
        let b = json!({"b": 2});
        let c = json!({"c": 3});
        let left = merge_json(&merge_json(&a, &b), &c);
        let right = merge_json(&a, &merge_json(&b, &c));
        assert_eq!(left, right);
    }

    #[test]
    fn merge_does_not_mutate_base() {
        let base = ConfigMap::builtin_defaults();
        let mut overlay_map = Map::new();
        overlay_map.insert(
            "claude".to_string(),
            json!({"model": "opus"}),
        );
        let overlay = ConfigMap {
            commands: overlay_map,
        };
        let merged = base.merged_with(&overlay);
        assert!(base.command_table("claude").is_empty());
        assert_eq!(
            merged.command_table("claude").get("model").unwrap(),
            "opus"
        );
    }

    #[test]
    fn load_cascade_without_any_files_yields_empty_config() {
        let tmp = tempfile::tempdir().unwrap();
        let cfg = ConfigMap::load_cascade(tmp.path());
        assert!(cfg.command_table("claude").is_empty());
    }

    #[test]
    fn load_file_recovers_from_malformed_yaml() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("bad.yaml");
        std::fs::write(&path, "commands:\n  claude: [unterminated").unwrap();
        let cfg = ConfigMap::load_file(&path);
        assert!(cfg.command_table("claude").is_empty());
    }

    #[test]
    fn project_config_overrides_global() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(
            tmp.path().join("mdflow.config.yaml"),
            "commands:\n  claude:\n    model: sonnet\n",
        )
        .unwrap();
        let cfg = ConfigMap::load_cascade(tmp.path());
        assert_eq!(cfg.command_table("claude").get("model").unwrap(), "sonnet");
    }
}
