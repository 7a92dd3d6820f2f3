//! Symbol resolver (spec §4.3, §9 open question): a deliberately simple
//! language-agnostic heuristic — scan for `function NAME`, `const NAME`,
//! `class NAME`, `interface NAME`, `type NAME` — left unformalized per
//! language, as the spec flags this heuristic as brittle by design and asks
//! implementers not to guess a richer one.

use std::path::Path;

use mdflow_core::MdflowError;

use crate::binary::is_binary_file;
use crate::resolvers::resolve_path;

const SYMBOL_KEYWORDS: &[&str] = &["function", "const", "class", "interface", "type"];

pub fn resolve_symbol(
    path_str: &str,
    symbol: &str,
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

    for line in content.lines() {
        let trimmed = line.trim_start();
        for keyword in SYMBOL_KEYWORDS {
            let prefix = format!("{keyword} {symbol}");
            if trimmed.starts_with(&prefix) {
                let next = trimmed.as_bytes().get(prefix.len());
                let boundary = matches!(next, None | Some(b'(') | Some(b' ') | Some(b'{') | Some(b'<') | Some(b':') | Some(b'='));
                if boundary {
                    return Ok(line.to_string());
                }
            }
        }
    }

    Err(MdflowError::SymbolNotFound {
        path,
        symbol: symbol.to_string(),
    })
}
