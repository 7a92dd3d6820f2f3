//! Resolution orchestrator (spec §4.3, §9): dispatches each `ImportAction`
//! to its resolver via a match on the tag (a data enum, not trait objects,
//! per the spec's explicit design note), fanning out with bounded
//! concurrency (width 4) and threading a canonical-path visited set through
//! recursive File/Symbol resolution to reject cyclic imports.
//!
//! Whether a resolved file's content is itself re-scanned for further
//! imports is left ambiguous by the spec; this implementation does
//! re-scan File/Glob/Symbol results (an import chain reads the same way a
//! human editor would compose it), which is why cycle tracking exists at
//! all — see DESIGN.md.

use std::collections::HashMap;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use futures::future::join_all;
use mdflow_config::TrustStore;
use mdflow_core::MdflowError;
use tokio::sync::{Mutex, Semaphore};

use crate::action::{ImportAction, ImportActionKind, ResolvedImport};
use crate::cache::ImportCache;
use crate::parser::parse_imports;
use crate::resolvers::command::resolve_command;
use crate::resolvers::file::resolve_file;
use crate::resolvers::glob_resolver::resolve_glob;
use crate::resolvers::resolve_path;
use crate::resolvers::symbol::resolve_symbol;
use crate::resolvers::url::{resolve_url, UrlResolverArgs};

const FAN_OUT_WIDTH: usize = 4;

pub struct ResolveContext {
    pub base_dir: PathBuf,
    pub client: reqwest::Client,
    pub cache: ImportCache,
    pub env: HashMap<String, String>,
    pub force_trust: bool,
    pub stdin_is_tty: bool,
}

/// Resolves every import action found in `source`, recursing into File,
/// Glob, and Symbol results so nested `@` imports are expanded too.
/// `visited` accumulates canonicalized paths already on the current
/// resolution chain; re-entering one is a `CyclicImport` error.
pub async fn resolve_all(
    source: &str,
    ctx: &ResolveContext,
    trust_store: Arc<Mutex<TrustStore>>,
    visited: &mut HashSet<PathBuf>,
) -> Result<Vec<ResolvedImport>, MdflowError> {
    let actions = parse_imports(source);
    let semaphore = Arc::new(Semaphore::new(FAN_OUT_WIDTH));

    let futures = actions.into_iter().map(|action| {
        let semaphore = semaphore.clone();
        let trust_store = trust_store.clone();
        let visited_paths: HashSet<PathBuf> = visited.clone();
        async move {
            let _permit = semaphore.acquire().await.expect("semaphore not closed");
            let mut local_visited = visited_paths;
            let content = resolve_one(&action, ctx, trust_store, &mut local_visited).await?;
            Ok::<ResolvedImport, MdflowError>(ResolvedImport { action, content })
        }
    });

    let results = join_all(futures).await;
    results.into_iter().collect()
}

async fn resolve_one(
    action: &ImportAction,
    ctx: &ResolveContext,
    trust_store: Arc<Mutex<TrustStore>>,
    visited: &mut HashSet<PathBuf>,
) -> Result<String, MdflowError> {
    match &action.kind {
        ImportActionKind::File { path, line_range } => {
            guard_cycle(path, &ctx.base_dir, visited)?;
            let content = resolve_file(path, *line_range, &ctx.base_dir)?;
            expand_nested(&content, ctx, trust_store, visited).await
        }
        ImportActionKind::Glob { pattern } => {
            let content = resolve_glob(pattern, &ctx.base_dir)?;
            expand_nested(&content, ctx, trust_store, visited).await
        }
        ImportActionKind::Symbol { path, symbol } => {
            guard_cycle(path, &ctx.base_dir, visited)?;
            let content = resolve_symbol(path, symbol, &ctx.base_dir)?;
            expand_nested(&content, ctx, trust_store, visited).await
        }
        ImportActionKind::Url { url } => {
            let mut store = trust_store.lock().await;
            resolve_url(UrlResolverArgs {
                url,
                trust_store: &mut store,
                cache: &ctx.cache,
                client: &ctx.client,
                force_trust: ctx.force_trust,
                stdin_is_tty: ctx.stdin_is_tty,
            })
            .await
        }
        ImportActionKind::Command { command } => {
            resolve_command(command, &ctx.base_dir, &ctx.env).await
        }
        ImportActionKind::ExecutableFence { body, .. } => Ok(body.clone()),
    }
}

/// Recursively resolves any imports found inside an already-resolved File
/// body, so `@./a.md` containing its own `@./b.md` expands fully.
fn expand_nested<'a>(
    content: &'a str,
    ctx: &'a ResolveContext,
    trust_store: Arc<Mutex<TrustStore>>,
    visited: &'a mut HashSet<PathBuf>,
) -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<String, MdflowError>> + Send + 'a>>
{
    Box::pin(async move {
        if !crate::parser::has_imports(content) {
            return Ok(content.to_string());
        }
        let resolved = resolve_all(content, ctx, trust_store, visited).await?;
        Ok(crate::inject::inject_imports(content, &resolved))
    })
}

fn guard_cycle(
    path_str: &str,
    base_dir: &Path,
    visited: &mut HashSet<PathBuf>,
) -> Result<(), MdflowError> {
    let resolved = resolve_path(path_str, base_dir);
    let canonical = resolved.canonicalize().unwrap_or(resolved);
    if !visited.insert(canonical.clone()) {
        return Err(MdflowError::CyclicImport(canonical));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(base_dir: PathBuf) -> ResolveContext {
        ResolveContext {
            base_dir,
            client: reqwest::Client::new(),
            cache: ImportCache::new(std::env::temp_dir().join("mdflow-test-cache")),
            env: HashMap::new(),
            force_trust: true,
            stdin_is_tty: false,
        }
    }

    #[tokio::test]
    async fn resolves_simple_file_import() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join("a.md"), "hello from a").unwrap();

        let context = ctx(tmp.path().to_path_buf());
        let trust = Arc::new(Mutex::new(
            TrustStore::load_from(tmp.path().join("known_hosts")).unwrap(),
        ));
        let mut visited = HashSet::new();
        let resolved = resolve_all("@./a.md", &context, trust, &mut visited)
            .await
            .unwrap();
        assert_eq!(resolved.len(), 1);
        assert_eq!(resolved[0].content, "hello from a");
    }

    #[tokio::test]
    async fn glob_results_are_rescanned_for_nested_imports() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join("b.md"), "nested content").unwrap();
        std::fs::write(tmp.path().join("a.md"), "@./b.md").unwrap();

        let context = ctx(tmp.path().to_path_buf());
        let trust = Arc::new(Mutex::new(
            TrustStore::load_from(tmp.path().join("known_hosts")).unwrap(),
        ));
        let mut visited = HashSet::new();
        let resolved = resolve_all("@./a*.md", &context, trust, &mut visited)
            .await
            .unwrap();
        assert!(resolved[0].content.contains("nested content"));
    }

    #[tokio::test]
    async fn direct_self_import_is_cyclic() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("a.md");
        std::fs::write(&path, "@./a.md").unwrap();

        let context = ctx(tmp.path().to_path_buf());
        let trust = Arc::new(Mutex::new(
            TrustStore::load_from(tmp.path().join("known_hosts")).unwrap(),
        ));
        let mut visited = HashSet::new();
        let err = resolve_all("@./a.md", &context, trust, &mut visited)
            .await
            .unwrap_err();
        assert!(matches!(err, MdflowError::CyclicImport(_)));
    }
}
