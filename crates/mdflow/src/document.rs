//! Markdown agent document parsing (spec §3, §1 — explicitly out of scope
//! beyond its input/output contract: a `---`-delimited YAML frontmatter
//! block, an optional leading shebang line, and a body).

use mdflow_core::{AgentDocument, Metadata};

/// Parses `source` into an `AgentDocument`. A leading `#!...` line (if
/// present) is captured separately and stripped before frontmatter
/// detection. A missing or malformed frontmatter block yields empty
/// metadata and the whole remainder as body (mirrors `ConfigParse`'s
/// "recover with a warning" policy, spec §7).
pub fn parse_document(source: &str) -> AgentDocument {
    let (shebang, rest) = split_shebang(source);

    let Some(after_open) = rest.strip_prefix("---\n") else {
        return AgentDocument {
            metadata: Metadata::new(),
            body: rest.to_string(),
            shebang,
        };
    };

    let Some(close_idx) = after_open.find("\n---\n") else {
        return AgentDocument {
            metadata: Metadata::new(),
            body: rest.to_string(),
            shebang,
        };
    };

    let yaml_block = &after_open[..close_idx];
    let body = after_open[close_idx + "\n---\n".len()..].to_string();

    let metadata: Metadata = serde_yaml::from_str(yaml_block).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "malformed frontmatter, falling back to empty metadata");
        Metadata::new()
    });

    AgentDocument {
        metadata,
        body,
        shebang,
    }
}

fn split_shebang(source: &str) -> (Option<String>, &str) {
    if let Some(rest) = source.strip_prefix("#!") {
        if let Some(newline) = rest.find('\n') {
            let shebang = format!("#!{}", &rest[..newline]);
            return (Some(shebang), &rest[newline + 1..]);
        }
    }
    (None, source)
}
