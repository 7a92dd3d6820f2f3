//! Custom Liquid filters (spec §4.8): `shell_escape` and its alias `q`.
//! POSIX targets wrap the value in single quotes, escaping embedded single
//! quotes with the `'\''` dance; Windows-style targets wrap in double
//! quotes and double any embedded quote.

use liquid_core::{
    Display_filter, Filter, FilterReflection, ParseFilter, Result, Runtime, Value, ValueView,
};

#[derive(Clone, ParseFilter, FilterReflection)]
#[filter(
    name = "shell_escape",
    description = "Escapes a value for safe inclusion in a shell command line.",
    parsed(ShellEscapeFilter)
)]
pub struct ShellEscapeFilterParser;

#[derive(Debug, Default, Display_filter)]
#[name = "shell_escape"]
pub struct ShellEscapeFilter;

impl Filter for ShellEscapeFilter {
    fn evaluate(&self, input: &dyn ValueView, _runtime: &dyn Runtime) -> Result<Value> {
        let s = input.to_kstr().into_owned();
        Ok(Value::scalar(shell_escape(&s)))
    }
}

#[derive(Clone, ParseFilter, FilterReflection)]
#[filter(
    name = "q",
    description = "Alias for shell_escape.",
    parsed(QFilter)
)]
pub struct QFilterParser;

#[derive(Debug, Default, Display_filter)]
#[name = "q"]
pub struct QFilter;

impl Filter for QFilter {
    fn evaluate(&self, input: &dyn ValueView, _runtime: &dyn Runtime) -> Result<Value> {
        let s = input.to_kstr().into_owned();
        Ok(Value::scalar(shell_escape(&s)))
    }
}

#[cfg(windows)]
fn shell_escape(value: &str) -> String {
    let doubled = value.replace('"', "\"\"");
    format!("\"{doubled}\"")
}

#[cfg(not(windows))]
fn shell_escape(value: &str) -> String {
    let escaped = value.replace('\'', r#"'\''"#);
    format!("'{escaped}'")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[cfg(not(windows))]
    fn posix_escapes_embedded_single_quotes() {
        assert_eq!(shell_escape("it's"), r#"'it'\''s'"#);
    }

    #[test]
    #[cfg(not(windows))]
    fn posix_wraps_plain_value_in_single_quotes() {
        assert_eq!(shell_escape("hello world"), "'hello world'");
    }
}
