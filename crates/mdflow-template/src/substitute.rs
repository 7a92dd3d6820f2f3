//! Substitution (spec §4.8): renders the expanded body against a variable
//! map. Strict mode detects every missing variable before touching the
//! renderer and fails on the first one, in extraction order; non-strict
//! mode lets missing variables render as empty, which is Liquid's default
//! behavior for an undefined value.

use std::collections::HashMap;

use mdflow_core::MdflowError;

use crate::engine::build_parser;
use crate::extract::extract_variables;

/// Renders `body` against `variables`. Only `_`-prefixed names are ever
/// consumed from `variables`; any other `{{ name }}` is left to Liquid to
/// resolve from its own (here, empty) namespace.
pub fn substitute(
    body: &str,
    variables: &HashMap<String, String>,
    strict: bool,
) -> Result<String, MdflowError> {
    if strict {
        for name in extract_variables(body) {
            if !variables.contains_key(&name) {
                return Err(MdflowError::MissingTemplateVar(name));
            }
        }
    }

    let parser = build_parser()?;
    let template = parser
        .parse(body)
        .map_err(|e| MdflowError::TemplateRenderError(e.to_string()))?;

    let mut globals = liquid::Object::new();
    for (key, value) in variables.iter().filter(|(k, _)| k.starts_with('_')) {
        globals.insert(key.clone().into(), liquid::model::Value::scalar(value.clone()));
    }

    template
        .render(&globals)
        .map_err(|e| MdflowError::TemplateRenderError(e.to_string()))
}
