use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A primitive metadata value, or an array/map of them. Order-preserving so
/// that `_inputs` lists and ad-hoc positional maps keep their declared order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetaValue {
    String(String),
    Number(f64),
    Bool(bool),
    Array(Vec<MetaValue>),
    Map(IndexMap<String, MetaValue>),
}

impl MetaValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Bool(b) => *b,
            Self::String(s) => !s.is_empty(),
            Self::Number(n) => *n != 0.0,
            Self::Array(a) => !a.is_empty(),
            Self::Map(m) => !m.is_empty(),
        }
    }

    /// Render as the literal string that would appear on a command line.
    pub fn to_arg_string(&self) -> String {
        match self {
            Self::String(s) => s.clone(),
            Self::Number(n) => {
                if n.fract() == 0.0 {
                    format!("{}", *n as i64)
                } else {
                    n.to_string()
                }
            }
            Self::Bool(b) => b.to_string(),
            Self::Array(_) | Self::Map(_) => String::new(),
        }
    }
}

/// The parsed metadata block of an agent file: an order-preserving map from
/// key to value. Reserved keys (any `_`-prefixed key — `_inputs`, `_env`,
/// `_interactive`/`_i`, `_subcommand`, `_command`, and any tool-specific
/// `_foo` — plus positional `$N` keys) are consumed by the tool and never
/// forwarded to the child as flags.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Metadata(pub IndexMap<String, MetaValue>);

impl Metadata {
    pub fn new() -> Self {
        Self(IndexMap::new())
    }

    pub fn get(&self, key: &str) -> Option<&MetaValue> {
        self.0.get(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<MetaValue> {
        self.0.shift_remove(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: MetaValue) {
        self.0.insert(key.into(), value);
    }

    pub fn is_truthy(&self, key: &str) -> bool {
        self.get(key).map(MetaValue::is_truthy).unwrap_or(false)
    }

    /// True if either `_interactive` or its short alias `_i` is truthy.
    pub fn wants_interactive(&self) -> bool {
        self.is_truthy("_interactive") || self.is_truthy("_i")
    }

    /// Positional override keys (`$1`, `$2`, ...) in ascending numeric order.
    pub fn positional_overrides(&self) -> Vec<(u32, &MetaValue)> {
        let mut out: Vec<(u32, &MetaValue)> = self
            .0
            .iter()
            .filter_map(|(k, v)| {
                k.strip_prefix('$')
                    .and_then(|n| n.parse::<u32>().ok())
                    .filter(|n| *n > 0)
                    .map(|n| (n, v))
            })
            .collect();
        out.sort_by_key(|(n, _)| *n);
        out
    }

    /// Non-reserved keys, in declaration order, that become child CLI flags.
    pub fn flag_entries(&self) -> impl Iterator<Item = (&str, &MetaValue)> {
        self.0.iter().filter_map(|(k, v)| {
            if is_reserved_key(k) {
                None
            } else {
                Some((k.as_str(), v))
            }
        })
    }
}

/// A reserved key is consumed by the tool itself and never forwarded as a
/// child flag: every `_`-prefixed key (spec §3, §4.9 — not just the named
/// ones `mdflow` itself reads) plus any `$N` positional key.
pub fn is_reserved_key(key: &str) -> bool {
    key.starts_with('_') || (key.starts_with('$') && key[1..].parse::<u32>().is_ok())
}

/// A markdown agent document: metadata block, body, and optional leading
/// shebang line (`#!/usr/bin/env ...`) preserved verbatim ahead of the
/// metadata block when present.
#[derive(Clone, Debug, Default)]
pub struct AgentDocument {
    pub metadata: Metadata,
    pub body: String,
    pub shebang: Option<String>,
}
