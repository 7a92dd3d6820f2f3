//! Safe-range scanner (spec §4.1): identifies byte ranges in a markdown
//! string where import directive parsing is legal — everything outside
//! fenced code blocks and inline code spans.
//!
//! This is a precision byte-index state machine rather than a line-oriented
//! regex pass, since fence/backtick matching needs exact boundaries the
//! injector later relies on.

/// A fenced code block discovered while scanning, independent of whether
/// anything inside it parses as an import. `body` excludes the fence
/// delimiter lines themselves; `start`/`end` cover the whole block
/// (opening fence line through closing fence line).
#[derive(Clone, Debug, PartialEq)]
pub struct FencedSpan {
    pub start: usize,
    pub end: usize,
    pub info: Option<String>,
    pub body: String,
}

#[derive(Clone, Debug, Default)]
pub struct ScanResult {
    pub safe_ranges: Vec<(usize, usize)>,
    pub fenced_spans: Vec<FencedSpan>,
}

enum Context {
    Normal,
    Fenced {
        ch: u8,
        len: usize,
        span_start: usize,
        info: Option<String>,
        body_start: usize,
    },
}

/// Scans `source`, returning non-overlapping in-order safe ranges and the
/// fenced spans found along the way.
pub fn scan(source: &str) -> ScanResult {
    let bytes = source.as_bytes();
    let len = bytes.len();
    let mut result = ScanResult::default();
    let mut context = Context::Normal;
    let mut safe_start = 0usize;
    let mut i = 0usize;

    while i < len {
        let line_start = i;
        let newline_pos = memchr_newline(bytes, i);
        let line_end = newline_pos.unwrap_or(len);
        let next_line_start = newline_pos.map(|p| p + 1).unwrap_or(len);
        let line = &bytes[line_start..line_end];

        match &context {
            Context::Fenced {
                ch,
                len: flen,
                span_start,
                info,
                body_start,
            } => {
                if is_closing_fence(line, *ch, *flen) {
                    let body = String::from_utf8_lossy(&bytes[*body_start..line_start]).into_owned();
                    let body = body.strip_suffix('\n').unwrap_or(&body).to_string();
                    result.fenced_spans.push(FencedSpan {
                        start: *span_start,
                        end: line_end,
                        info: info.clone(),
                        body,
                    });
                    context = Context::Normal;
                    safe_start = next_line_start;
                }
            }
            Context::Normal => {
                if let Some((ch, flen)) = opening_fence(line) {
                    if safe_start < line_start {
                        result.safe_ranges.push((safe_start, line_start));
                    }
                    let info = info_string(line, flen);
                    context = Context::Fenced {
                        ch,
                        len: flen,
                        span_start: line_start,
                        info,
                        body_start: next_line_start,
                    };
                    i = next_line_start;
                    continue;
                }

                let mut j = line_start;
                while j < line_end {
                    if bytes[j] == b'`' {
                        if j + 1 < line_end && bytes[j + 1] == b'`' {
                            j += 1;
                            continue;
                        }
                        if safe_start < j {
                            result.safe_ranges.push((safe_start, j));
                        }
                        let mut k = j + 1;
                        while k < line_end && bytes[k] != b'`' {
                            k += 1;
                        }
                        let close_end = if k < line_end { k + 1 } else { k };
                        safe_start = close_end;
                        j = close_end;
                        continue;
                    }
                    j += 1;
                }
            }
        }

        i = next_line_start;
    }

    if matches!(context, Context::Normal) && safe_start < len {
        result.safe_ranges.push((safe_start, len));
    }

    result
}

fn memchr_newline(bytes: &[u8], from: usize) -> Option<usize> {
    bytes[from..].iter().position(|&b| b == b'\n').map(|p| p + from)
}

/// A line opens a fence when its first non-whitespace run is three or more
/// of the same backtick/tilde character.
fn opening_fence(line: &[u8]) -> Option<(u8, usize)> {
    let mut idx = 0;
    while idx < line.len() && (line[idx] == b' ' || line[idx] == b'\t') {
        idx += 1;
    }
    let ch = *line.get(idx)?;
    if ch != b'`' && ch != b'~' {
        return None;
    }
    let mut count = 0;
    while idx + count < line.len() && line[idx + count] == ch {
        count += 1;
    }
    if count >= 3 {
        Some((ch, count))
    } else {
        None
    }
}

/// A closing fence line: leading whitespace, then a run of `ch` of length
/// at least `flen`, then only trailing whitespace.
fn is_closing_fence(line: &[u8], ch: u8, flen: usize) -> bool {
    let mut idx = 0;
    while idx < line.len() && (line[idx] == b' ' || line[idx] == b'\t') {
        idx += 1;
    }
    let mut count = 0;
    while idx + count < line.len() && line[idx + count] == ch {
        count += 1;
    }
    if count < flen {
        return false;
    }
    let rest = &line[idx + count..];
    rest.iter().all(|&b| b == b' ' || b == b'\t')
}

fn info_string(line: &[u8], fence_len: usize) -> Option<String> {
    let mut idx = 0;
    while idx < line.len() && (line[idx] == b' ' || line[idx] == b'\t') {
        idx += 1;
    }
    idx += fence_len;
    let info = String::from_utf8_lossy(&line[idx.min(line.len())..])
        .trim()
        .to_string();
    if info.is_empty() {
        None
    } else {
        Some(info)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn safe_text(source: &str) -> String {
        let result = scan(source);
        result
            .safe_ranges
            .iter()
            .map(|&(s, e)| &source[s..e])
            .collect::<Vec<_>>()
            .join("")
    }

    #[test]
    fn code_fence_isolation() {
        let body = "A @./file.md B\n\n```\n@./inside.md\n```\n@./after.md";
        let result = scan(body);
        let safe = safe_text(body);
        assert!(safe.contains("@./file.md"));
        assert!(safe.contains("@./after.md"));
        assert!(!safe.contains("@./inside.md"));
        assert_eq!(result.fenced_spans.len(), 1);
        assert_eq!(result.fenced_spans[0].body, "@./inside.md");
    }

    #[test]
    fn inline_code_excluded_but_does_not_cross_lines() {
        let body = "before `@./x.md` after\nnext line @./y.md";
        let safe = safe_text(body);
        assert!(!safe.contains("@./x.md"));
        assert!(safe.contains("@./y.md"));
    }

    #[test]
    fn unterminated_fence_recovered_at_eof_without_panicking() {
        let body = "```\n@./inside.md\nstill fenced";
        let result = scan(body);
        assert!(result.fenced_spans.is_empty());
        assert!(result.safe_ranges.is_empty());
    }

    #[test]
    fn unterminated_inline_code_recovered_at_newline() {
        let body = "broken `inline code with no close\nnext line is safe";
        let result = scan(body);
        let safe = safe_text(body);
        assert!(safe.contains("next line is safe"));
    }

    #[test]
    fn tilde_fences_are_recognized() {
        let body = "~~~\n@./inside.md\n~~~\n@./after.md";
        let result = scan(body);
        assert_eq!(result.fenced_spans.len(), 1);
        assert_eq!(result.fenced_spans[0].body, "@./inside.md");
    }

    #[test]
    fn ranges_are_non_overlapping_and_in_order() {
        let body = "a `b` c `d` e";
        let result = scan(body);
        let mut last_end = 0;
        for &(s, e) in &result.safe_ranges {
            assert!(s >= last_end);
            assert!(e <= body.len());
            last_end = e;
        }
    }

    #[test]
    fn closing_fence_must_have_at_least_opening_count() {
        let body = "````\ncontent\n```\nstill fenced\n````\nsafe here";
        let result = scan(body);
        assert_eq!(result.fenced_spans.len(), 1);
        let safe = safe_text(body);
        assert!(safe.contains("safe here"));
    }

    #[test]
    fn fence_info_string_is_captured() {
        let body = "```rust\nfn main() {}\n```\n";
        let result = scan(body);
        assert_eq!(result.fenced_spans[0].info.as_deref(), Some("rust"));
    }
}
