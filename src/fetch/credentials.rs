//! Bearer token lookup per host

use std::collections::HashMap;
use std::path::Path;

#[cfg(test)]
use mockall::automock;
use tracing::{debug, warn};

/// Source of API tokens, keyed by host name (`github.com`)
///
/// A missing token is not an error; requests simply go out unauthenticated.
#[cfg_attr(test, automock)]
pub trait CredentialStore: Send + Sync {
    fn token(&self, host: &str) -> Option<String>;
}

/// In-memory tokens
#[derive(Debug, Clone, Default)]
pub struct StaticCredentials {
    tokens: HashMap<String, String>,
}

impl StaticCredentials {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(mut self, host: &str, token: &str) -> Self {
        self.tokens.insert(host.to_string(), token.to_string());
        self
    }
}

impl CredentialStore for StaticCredentials {
    fn token(&self, host: &str) -> Option<String> {
        self.tokens.get(host).cloned()
    }
}

/// Tokens from `credentials.json`, overridden by `*_TOKEN` environment variables
#[derive(Debug, Clone, Default)]
pub struct FileCredentialStore {
    tokens: HashMap<String, String>,
}

impl FileCredentialStore {
    /// Load tokens from a JSON object of `host -> token`
    ///
    /// A missing or malformed file yields an empty store.
    pub fn load(path: &Path) -> Self {
        let tokens = match std::fs::read_to_string(path) {
            Ok(content) => serde_json::from_str(&content)
                .inspect_err(|e| warn!("Ignoring malformed credentials file {:?}: {}", path, e))
                .unwrap_or_default(),
            Err(e) => {
                debug!("No credentials loaded from {:?}: {}", path, e);
                HashMap::new()
            }
        };

        Self { tokens }
    }

    fn token_with_env(&self, host: &str, env_token: Option<String>) -> Option<String> {
        env_token
            .filter(|token| !token.is_empty())
            .or_else(|| self.tokens.get(host).cloned())
    }
}

fn env_var_for(host: &str) -> Option<&'static str> {
    match host {
        "github.com" => Some("GITHUB_TOKEN"),
        "gitlab.com" => Some("GITLAB_TOKEN"),
        "bitbucket.org" => Some("BITBUCKET_TOKEN"),
        _ => None,
    }
}

impl CredentialStore for FileCredentialStore {
    fn token(&self, host: &str) -> Option<String> {
        let env_token = env_var_for(host).and_then(|name| std::env::var(name).ok());
        self.token_with_env(host, env_token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn static_credentials_returns_configured_token() {
        let store = StaticCredentials::new().with_token("github.com", "ghp_test");

        assert_eq!(store.token("github.com"), Some("ghp_test".to_string()));
        assert_eq!(store.token("gitlab.com"), None);
    }

    #[test]
    fn file_store_reads_tokens_by_host() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"gitlab.com": "glpat-test"}}"#).unwrap();

        let store = FileCredentialStore::load(file.path());

        assert_eq!(
            store.token_with_env("gitlab.com", None),
            Some("glpat-test".to_string())
        );
        assert_eq!(store.token_with_env("github.com", None), None);
    }

    #[test]
    fn file_store_prefers_environment_token() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"github.com": "from-file"}}"#).unwrap();

        let store = FileCredentialStore::load(file.path());

        assert_eq!(
            store.token_with_env("github.com", Some("from-env".to_string())),
            Some("from-env".to_string())
        );
        assert_eq!(
            store.token_with_env("github.com", Some(String::new())),
            Some("from-file".to_string())
        );
    }

    #[test]
    fn file_store_tolerates_missing_and_malformed_files() {
        let dir = tempfile::tempdir().unwrap();
        let missing = FileCredentialStore::load(&dir.path().join("missing.json"));
        assert_eq!(missing.token_with_env("github.com", None), None);

        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "[1, 2").unwrap();
        let malformed = FileCredentialStore::load(file.path());
        assert_eq!(malformed.token_with_env("github.com", None), None);
    }
}
