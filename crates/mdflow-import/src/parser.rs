//! Parser (spec §4.2): produces an ordered list of `ImportAction`s by
//! pattern-matching inside safe ranges. `LazyLock<Regex>` statics for token
//! classification, in the idiom the teacher uses for its own markdown
//! directive parsing.

use std::sync::LazyLock;

use regex::Regex;

use crate::action::{ImportAction, ImportActionKind};
use crate::scanner::scan;

static AT_IMPORT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"@(https?://[^\s`]+|~[^\s`]*|\.[^\s`]*|/[^\s`]*)").unwrap());

static LINE_RANGE_SUFFIX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.*):(\d+)-(\d+)$").unwrap());

static SYMBOL_SUFFIX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.*)#([A-Za-z_$][A-Za-z0-9_$]*)$").unwrap());

static COMMAND_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"!`([^`\n]+)`").unwrap());

/// Parses `source` into an ordered (strictly ascending by `index`) list of
/// import actions. Total: never panics, never returns `Err`, for any input.
pub fn parse_imports(source: &str) -> Vec<ImportAction> {
    let scan_result = scan(source);
    let mut actions = Vec::new();

    for &(start, end) in &scan_result.safe_ranges {
        let segment = &source[start..end];
        actions.extend(parse_at_imports(segment, start));
        actions.extend(parse_commands(segment, start));
    }

    for span in &scan_result.fenced_spans {
        if span.body.trim_start().starts_with("#!") {
            let original = &source[span.start..span.end];
            actions.push(ImportAction::new(
                ImportActionKind::ExecutableFence {
                    language: span.info.clone(),
                    body: span.body.clone(),
                },
                original,
                span.start,
            ));
        }
    }

    actions.sort_by_key(|a| a.index);
    actions
}

pub fn has_imports(source: &str) -> bool {
    !parse_imports(source).is_empty()
}

fn parse_at_imports(segment: &str, offset: usize) -> Vec<ImportAction> {
    let mut out = Vec::new();
    for m in AT_IMPORT_RE.find_iter(segment) {
        let full_match = m.as_str();
        let path_part = &full_match[1..]; // drop leading '@'
        let index = offset + m.start();

        if path_part.starts_with("http://") || path_part.starts_with("https://") {
            out.push(ImportAction::new(
                ImportActionKind::Url {
                    url: path_part.to_string(),
                },
                full_match,
                index,
            ));
            continue;
        }

        out.push(classify_path(path_part, full_match, index));
    }
    out
}

fn classify_path(path_part: &str, full_match: &str, index: usize) -> ImportAction {
    if let Some(caps) = LINE_RANGE_SUFFIX_RE.captures(path_part) {
        let path = caps[1].to_string();
        let start: u32 = caps[2].parse().unwrap_or(0);
        let end: u32 = caps[3].parse().unwrap_or(0);
        return ImportAction::new(
            ImportActionKind::File {
                path,
                line_range: Some((start, end)),
            },
            full_match,
            index,
        );
    }

    if let Some(caps) = SYMBOL_SUFFIX_RE.captures(path_part) {
        return ImportAction::new(
            ImportActionKind::Symbol {
                path: caps[1].to_string(),
                symbol: caps[2].to_string(),
            },
            full_match,
            index,
        );
    }

    if path_part.contains(['*', '?', '[']) {
        return ImportAction::new(
            ImportActionKind::Glob {
                pattern: path_part.to_string(),
            },
            full_match,
            index,
        );
    }

    ImportAction::new(
        ImportActionKind::File {
            path: path_part.to_string(),
            line_range: None,
        },
        full_match,
        index,
    )
}

fn parse_commands(segment: &str, offset: usize) -> Vec<ImportAction> {
    COMMAND_RE
        .captures_iter(segment)
        .map(|caps| {
            let full_match = caps.get(0).unwrap();
            let command = caps[1].to_string();
            ImportAction::new(
                ImportActionKind::Command { command },
                full_match.as_str(),
                offset + full_match.start(),
            )
        })
        .collect()
}
