//! ImportAction: the tagged variant at the center of the import/expansion
//! engine (spec §3, §9 "Polymorphic resolvers"). Represented as a sum type
//! with dispatch on the tag rather than a trait-object hierarchy, per the
//! spec's explicit design note.

#[derive(Clone, Debug, PartialEq)]
pub enum ImportActionKind {
    File {
        path: String,
        line_range: Option<(u32, u32)>,
    },
    Glob {
        pattern: String,
    },
    Url {
        url: String,
    },
    Command {
        command: String,
    },
    Symbol {
        path: String,
        symbol: String,
    },
    ExecutableFence {
        language: Option<String>,
        body: String,
    },
}

/// An `ImportActionKind` plus the literal matched substring and its starting
/// byte index in the source, as spec §3 requires.
#[derive(Clone, Debug, PartialEq)]
pub struct ImportAction {
    pub kind: ImportActionKind,
    pub original: String,
    pub index: usize,
}

impl ImportAction {
    pub fn new(kind: ImportActionKind, original: impl Into<String>, index: usize) -> Self {
        Self {
            kind,
            original: original.into(),
            index,
        }
    }

    pub fn end(&self) -> usize {
        self.index + self.original.len()
    }
}

/// A resolved import: the action paired with its resolved textual content.
#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedImport {
    pub action: ImportAction,
    pub content: String,
}
