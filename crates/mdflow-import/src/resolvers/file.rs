//! File resolver (spec §4.3).

use std::path::Path;

use mdflow_core::MdflowError;

use crate::binary::is_binary_file;
use crate::resolvers::resolve_path;

pub fn resolve_file(
    path_str: &str,
    line_range: Option<(u32, u32)>,
    base_dir: &Path,
) -> Result<String, MdflowError> {
    let path = resolve_path(path_str, base_dir);

    if !path.exists() {
        return Err(MdflowError::FileNotFound(path));
    }
    if is_binary_file(&path)? {
        return Err(MdflowError::BinaryFileRejection(path));
    }

    let content = std::fs::read_to_string(&path)?;

    match line_range {
        None => Ok(content),
        Some((start, end)) => slice_line_range(&content, &path, start, end),
    }
}

/// Inclusive 1-based line slice. `start` may exceed `end`; that ordering is
/// honored as given (the emitted lines run from `start` down to `end`) per
/// spec §4.3.
fn slice_line_range(
    content: &str,
    path: &Path,
    start: u32,
    end: u32,
) -> Result<String, MdflowError> {
    let lines: Vec<&str> = content.lines().collect();
    let total = lines.len() as u32;

    let line_numbers: Vec<u32> = if start <= end {
        (start..=end).collect()
    } else {
        (end..=start).rev().collect()
    };

    for &n in &line_numbers {
        if n == 0 || n > total {
            return Err(MdflowError::InvalidRange {
                path: path.to_path_buf(),
                start,
                end,
                lines: total,
            });
        }
    }

    Ok(line_numbers
        .into_iter()
        .map(|n| lines[(n - 1) as usize])
        .collect::<Vec<_>>()
        .join("\n"))
}
