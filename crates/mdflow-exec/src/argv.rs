//! Metadata-to-argv mapper (spec §4.9): merges command adapter defaults,
//! cascaded-config defaults, metadata, and CLI passthrough (highest wins)
//! into a final argv for the child process.

use std::collections::BTreeMap;

use mdflow_core::{MetaValue, Metadata};

/// Builds the final argv for `command`, merging layers in ascending
/// priority (later layers override earlier ones at the key level) and
/// then expanding into flags per spec §4.9's per-type rules.
pub fn build_argv(
    adapter_defaults: &Metadata,
    config_defaults: &Metadata,
    metadata: &Metadata,
    cli_passthrough: &[String],
) -> Vec<String> {
    let mut merged = adapter_defaults.clone();
    for (k, v) in config_defaults.0.iter() {
        merged.insert(k.clone(), v.clone());
    }
    for (k, v) in metadata.0.iter() {
        merged.insert(k.clone(), v.clone());
    }

    let positional_names = positional_name_map(merged.get("_inputs"));
    let mut positionals: BTreeMap<u32, String> = BTreeMap::new();
    for (n, value) in merged.positional_overrides() {
        if let Some(s) = positional_string(value, n, &positional_names) {
            positionals.insert(n, s);
        }
    }

    let mut flags: Vec<String> = Vec::new();
    for (key, value) in merged.flag_entries() {
        append_flag(&mut flags, key, value);
    }

    let mut argv: Vec<String> = positionals.into_values().collect();
    argv.extend(flags);
    argv.extend(cli_passthrough.iter().cloned());
    argv
}

/// `_inputs` (spec §3) doubles as the positional-name map §4.9 requires:
/// an ordered list of names, or a map of typed input definitions whose key
/// order gives the same thing.
fn positional_name_map(inputs: Option<&MetaValue>) -> Vec<String> {
    match inputs {
        Some(MetaValue::Array(items)) => items.iter().filter_map(|v| v.as_str().map(String::from)).collect(),
        Some(MetaValue::Map(map)) => map.keys().cloned().collect(),
        _ => Vec::new(),
    }
}

/// `position` is the `$N` the value came from (1-based), used to look up
/// its name in `positional_names` when `value` is the bare boolean `true`.
fn positional_string(value: &MetaValue, position: u32, positional_names: &[String]) -> Option<String> {
    match value {
        MetaValue::String(s) => Some(s.clone()),
        MetaValue::Bool(true) => positional_names
            .get((position - 1) as usize)
            .map(|name| format!("--{name}")),
        MetaValue::Bool(false) => None,
        other => Some(other.to_arg_string()),
    }
}

fn append_flag(out: &mut Vec<String>, key: &str, value: &MetaValue) {
    let flag_name = if key.len() == 1 {
        format!("-{key}")
    } else {
        format!("--{key}")
    };
    match value {
        MetaValue::Bool(true) => out.push(flag_name),
        MetaValue::Bool(false) => {}
        MetaValue::Array(items) => {
            for item in items {
                out.push(flag_name.clone());
                out.push(item.to_arg_string());
            }
        }
        other => {
            out.push(flag_name);
            out.push(other.to_arg_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mdflow_core::meta::MetaValue;

    fn meta(pairs: &[(&str, MetaValue)]) -> Metadata {
        let mut m = Metadata::default();
        for (k, v) in pairs {
            m.insert((*k).to_string(), v.clone());
        }
        m
    }

    #[test]
    fn bool_true_appends_bare_flag() {
        let metadata = meta(&[("verbose", MetaValue::Bool(true))]);
        let argv = build_argv(&Metadata::default(), &Metadata::default(), &metadata, &[]);
        assert_eq!(argv, vec!["--verbose".to_string()]);
    }

    #[test]
    fn bool_false_is_omitted() {
        let metadata = meta(&[("verbose", MetaValue::Bool(false))]);
        let argv = build_argv(&Metadata::default(), &Metadata::default(), &metadata, &[]);
        assert!(argv.is_empty());
    }

    #[test]
    fn string_value_appends_key_and_value() {
        let metadata = meta(&[("model", MetaValue::String("opus".to_string()))]);
        let argv = build_argv(&Metadata::default(), &Metadata::default(), &metadata, &[]);
        assert_eq!(argv, vec!["--model".to_string(), "opus".to_string()]);
    }

    #[test]
    fn single_char_key_gets_single_dash() {
        let metadata = meta(&[("m", MetaValue::String("opus".to_string()))]);
        let argv = build_argv(&Metadata::default(), &Metadata::default(), &metadata, &[]);
        assert_eq!(argv, vec!["-m".to_string(), "opus".to_string()]);
    }

    #[test]
    fn array_value_repeats_flag_per_element() {
        let metadata = meta(&[(
            "tag",
            MetaValue::Array(vec![
                MetaValue::String("a".to_string()),
                MetaValue::String("b".to_string()),
            ]),
        )]);
        let argv = build_argv(&Metadata::default(), &Metadata::default(), &metadata, &[]);
        assert_eq!(
            argv,
            vec!["--tag", "a", "--tag", "b"].into_iter().map(String::from).collect::<Vec<_>>()
        );
    }

    #[test]
    fn positional_dollar_key_inserted_by_number_order() {
        let metadata = meta(&[
            ("$2", MetaValue::String("second".to_string())),
            ("$1", MetaValue::String("first".to_string())),
        ]);
        let argv = build_argv(&Metadata::default(), &Metadata::default(), &metadata, &[]);
        assert_eq!(argv, vec!["first".to_string(), "second".to_string()]);
    }

    #[test]
    fn metadata_overrides_config_and_adapter_defaults() {
        let adapter = meta(&[("model", MetaValue::String("default-model".to_string()))]);
        let config = meta(&[("model", MetaValue::String("config-model".to_string()))]);
        let metadata = meta(&[("model", MetaValue::String("metadata-model".to_string()))]);
        let argv = build_argv(&adapter, &config, &metadata, &[]);
        assert_eq!(argv, vec!["--model".to_string(), "metadata-model".to_string()]);
    }

    #[test]
    fn cli_passthrough_appended_last() {
        let metadata = meta(&[("model", MetaValue::String("opus".to_string()))]);
        let argv = build_argv(
            &Metadata::default(),
            &Metadata::default(),
            &metadata,
            &["--extra".to_string()],
        );
        assert_eq!(argv.last(), Some(&"--extra".to_string()));
    }

    #[test]
    fn positional_bool_true_inserts_name_from_inputs_list() {
        let metadata = meta(&[
            (
                "_inputs",
                MetaValue::Array(vec![MetaValue::String("prompt".to_string())]),
            ),
            ("$1", MetaValue::Bool(true)),
        ]);
        let argv = build_argv(&Metadata::default(), &Metadata::default(), &metadata, &[]);
        assert_eq!(argv, vec!["--prompt".to_string()]);
    }

    #[test]
    fn positional_bool_true_without_a_name_is_dropped() {
        let metadata = meta(&[("$1", MetaValue::Bool(true))]);
        let argv = build_argv(&Metadata::default(), &Metadata::default(), &metadata, &[]);
        assert!(argv.is_empty());
    }

    #[test]
    fn reserved_keys_are_never_forwarded() {
        let metadata = meta(&[
            ("_inputs", MetaValue::Array(vec![])),
            ("model", MetaValue::String("opus".to_string())),
        ]);
        let argv = build_argv(&Metadata::default(), &Metadata::default(), &metadata, &[]);
        assert!(!argv.iter().any(|a| a.contains("_inputs")));
    }
}
