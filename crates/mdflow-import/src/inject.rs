//! Injector (spec §4.5): reverse-sorted string splice that replaces each
//! action's original text span with its resolved content. Pure string
//! transformation, no I/O.

use crate::action::ResolvedImport;

/// Splices every resolved import's content into `source` at its original
/// position, processing in descending index order so that earlier indices
/// remain valid as later (higher-index) splices are applied.
pub fn inject_imports(source: &str, resolved: &[ResolvedImport]) -> String {
    let mut ordered: Vec<&ResolvedImport> = resolved.iter().collect();
    ordered.sort_by_key(|r| std::cmp::Reverse(r.action.index));

    let mut out = source.to_string();
    for r in ordered {
        let start = r.action.index;
        let end = r.action.end();
        if start > out.len() || end > out.len() || start > end {
            continue;
        }
        out.replace_range(start..end, &r.content);
    }
    out
}
