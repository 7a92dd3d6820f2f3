use std::path::PathBuf;

/// The tool's structured error taxonomy (spec §7). Every variant owns its
/// `#[error("...")]` display message; `ConfigParse` is the only variant the
/// pipeline recovers from locally (falls back to an empty config with a
/// warning) — every other variant halts the pipeline.
#[derive(thiserror::Error, Debug)]
pub enum MdflowError {
    #[error("file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("refusing to import binary file: {0}")]
    BinaryFileRejection(PathBuf),

    #[error("symbol '{symbol}' not found in {path}")]
    SymbolNotFound { path: PathBuf, symbol: String },

    #[error("invalid line range {start}-{end} for {path} ({lines} lines)")]
    InvalidRange {
        path: PathBuf,
        start: u32,
        end: u32,
        lines: u32,
    },

    #[error("glob error for pattern '{pattern}': {message}")]
    GlobError { pattern: String, message: String },

    #[error("host '{0}' is not trusted; re-run with --_trust or add it interactively")]
    UntrustedHost(String),

    #[error("fetch of {url} timed out after {secs}s")]
    FetchTimeout { url: String, secs: u64 },

    #[error("fetch of {url} failed after {attempts} attempts: {cause}")]
    FetchExhausted {
        url: String,
        attempts: u32,
        cause: String,
    },

    #[error("HTTP {status} fetching {url}")]
    HttpStatus { url: String, status: u16 },

    #[error("command import `{command}` failed (exit {exit_code}): {stderr}")]
    CommandImportFailed {
        command: String,
        exit_code: i32,
        stderr: String,
    },

    #[error("missing template variable '{0}'")]
    MissingTemplateVar(String),

    #[error("cancelled")]
    UserCancelled,

    #[error("could not determine which command to run")]
    NoCommand,

    #[error("could not parse config file {path}: {message}")]
    ConfigParse { path: PathBuf, message: String },

    #[error(
        "expanded body exceeds the context limit ({tokens} estimated tokens > {limit} limit)"
    )]
    ContextOverflow { tokens: usize, limit: usize },

    #[error("failed to spawn '{0}': command not found or not executable")]
    ChildSpawnFailed(String),

    #[error("cyclic import detected: {0} imports itself, directly or transitively")]
    CyclicImport(PathBuf),

    #[error("template render error: {0}")]
    TemplateRenderError(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_file_not_found() {
        let err = MdflowError::FileNotFound(PathBuf::from("/tmp/missing.md"));
        assert_eq!(err.to_string(), "file not found: /tmp/missing.md");
    }

    #[test]
    fn display_symbol_not_found() {
        let err = MdflowError::SymbolNotFound {
            path: PathBuf::from("lib.rs"),
            symbol: "frobnicate".into(),
        };
        assert_eq!(err.to_string(), "symbol 'frobnicate' not found in lib.rs");
    }

    #[test]
    fn display_invalid_range() {
        let err = MdflowError::InvalidRange {
            path: PathBuf::from("f.ts"),
            start: 10,
            end: 12,
            lines: 20,
        };
        assert_eq!(err.to_string(), "invalid line range 10-12 for f.ts (20 lines)");
    }

    #[test]
    fn display_untrusted_host() {
        let err = MdflowError::UntrustedHost("evil.example".into());
        assert!(err.to_string().contains("evil.example"));
    }

    #[test]
    fn display_missing_template_var_contains_name() {
        let err = MdflowError::MissingTemplateVar("_name".into());
        assert!(err.to_string().contains("_name"));
    }

    #[test]
    fn display_fetch_exhausted() {
        let err = MdflowError::FetchExhausted {
            url: "https://example.com".into(),
            attempts: 4,
            cause: "connection reset".into(),
        };
        assert_eq!(
            err.to_string(),
            "fetch of https://example.com failed after 4 attempts: connection reset"
        );
    }

    #[test]
    fn error_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<MdflowError>();
    }
}
