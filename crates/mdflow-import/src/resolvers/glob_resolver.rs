//! Glob resolver (spec §4.3): enumerates matches relative to the base
//! directory, silently excludes binary files, and formats a concatenation
//! of `<relative-path>\n<content>\n\n` blocks. A pattern matching nothing
//! is non-fatal — it returns empty content (spec §7's `GlobError` note).

use std::path::Path;

use mdflow_core::MdflowError;

use crate::binary::is_binary_file;

pub fn resolve_glob(pattern: &str, base_dir: &Path) -> Result<String, MdflowError> {
    let full_pattern = base_dir.join(pattern);
    let pattern_str = full_pattern.to_string_lossy().to_string();

    let paths = glob::glob(&pattern_str).map_err(|e| MdflowError::GlobError {
        pattern: pattern.to_string(),
        message: e.to_string(),
    })?;

    let mut out = String::new();
    for entry in paths {
        let path = match entry {
            Ok(p) => p,
            Err(_) => continue,
        };
        if !path.is_file() {
            continue;
        }
        if is_binary_file(&path).unwrap_or(true) {
            continue;
        }
        let Ok(content) = std::fs::read_to_string(&path) else {
            continue;
        };
        let relative = path.strip_prefix(base_dir).unwrap_or(&path);
        out.push_str(&relative.to_string_lossy());
        out.push('\n');
        out.push_str(&content);
        out.push_str("\n\n");
    }
    Ok(out)
}
