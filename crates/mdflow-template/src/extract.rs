//! Variable extraction (spec §4.8): walks the body's `{{ }}`/`{% %}` tags
//! for identifiers whose first segment begins with `_`, returning the set
//! that is **globally referenced** — excluding names that are
//! locally assigned, captured, or bound by a `for` loop anywhere in the
//! template. This is a textual scan rather than a full AST walk (the
//! template engine's own parser does the real render-time binding); it is
//! deliberately conservative, matching the spec's framing of this
//! extraction as heuristic rather than a full static analysis.

use std::sync::LazyLock;

use regex::Regex;

static REFERENCE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(_[A-Za-z][A-Za-z0-9_]*)").unwrap());

static ASSIGN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{%-?\s*assign\s+(_[A-Za-z][A-Za-z0-9_]*)\s*=").unwrap());

static CAPTURE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{%-?\s*capture\s+(_[A-Za-z][A-Za-z0-9_]*)\s*-?%\}").unwrap());

static FOR_LOOP_VAR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{%-?\s*for\s+(_[A-Za-z][A-Za-z0-9_]*)\s+in\s").unwrap());

static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\{\{.*?\}\}|\{%.*?%\}").unwrap());

/// Returns the globally referenced `_`-prefixed variable names, in the
/// order their first reference appears in `body`.
pub fn extract_variables(body: &str) -> Vec<String> {
    let locally_bound = locally_bound_names(body);

    let mut seen = std::collections::HashSet::new();
    let mut ordered = Vec::new();

    for tag in TAG_RE.find_iter(body) {
        for caps in REFERENCE_RE.captures_iter(tag.as_str()) {
            let name = caps[1].to_string();
            if locally_bound.contains(&name) {
                continue;
            }
            if seen.insert(name.clone()) {
                ordered.push(name);
            }
        }
    }

    ordered
}

fn locally_bound_names(body: &str) -> std::collections::HashSet<String> {
    let mut bound = std::collections::HashSet::new();
    for caps in ASSIGN_RE.captures_iter(body) {
        bound.insert(caps[1].to_string());
    }
    for caps in CAPTURE_RE.captures_iter(body) {
        bound.insert(caps[1].to_string());
    }
    for caps in FOR_LOOP_VAR_RE.captures_iter(body) {
        bound.insert(caps[1].to_string());
    }
    bound
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_simple_output_reference() {
        let vars = extract_variables("Hello {{ _name }}!");
        assert_eq!(vars, vec!["_name".to_string()]);
    }

    #[test]
    fn extracts_if_and_unless_conditions() {
        let vars = extract_variables("{% if _flag %}A{% endif %}{% unless _other %}B{% endunless %}");
        assert_eq!(vars, vec!["_flag".to_string(), "_other".to_string()]);
    }

    #[test]
    fn excludes_assigned_variable_from_reference_set() {
        let vars = extract_variables("{% assign _computed = 1 %}{{ _computed }}{{ _input }}");
        assert_eq!(vars, vec!["_input".to_string()]);
    }

    #[test]
    fn excludes_captured_variable() {
        let vars = extract_variables("{% capture _buf %}x{% endcapture %}{{ _buf }}{{ _real }}");
        assert_eq!(vars, vec!["_real".to_string()]);
    }

    #[test]
    fn for_loop_variable_excluded_but_collection_var_referenced() {
        let vars = extract_variables("{% for _item in _items %}{{ _item }}{% endfor %}");
        assert_eq!(vars, vec!["_items".to_string()]);
    }

    #[test]
    fn non_underscore_names_are_ignored() {
        let vars = extract_variables("{{ model }} {{ _name }}");
        assert_eq!(vars, vec!["_name".to_string()]);
    }

    #[test]
    fn duplicate_references_deduplicated_preserving_first_order() {
        let vars = extract_variables("{{ _b }} {{ _a }} {{ _b }}");
        assert_eq!(vars, vec!["_b".to_string(), "_a".to_string()]);
    }
}
