//! Per-profile HTTP sessions

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue};
use tracing::debug;

use crate::fetch::credentials::CredentialStore;
use crate::fetch::error::FetchError;
use crate::fetch::profile::Profile;

/// Headers, credentials and timeout shared by every request of one profile
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionProfile {
    pub profile: Profile,
    /// Full `Authorization` header value, when a token is configured
    pub auth_header: Option<String>,
    pub accept: Option<&'static str>,
    pub user_agent: &'static str,
    pub timeout: Duration,
}

impl SessionProfile {
    pub fn build(profile: Profile, credentials: &dyn CredentialStore, timeout: Duration) -> Self {
        let auth_header = profile
            .credential_host()
            .and_then(|host| credentials.token(host))
            .map(|token| format!("Bearer {}", token));

        Self {
            profile,
            auth_header,
            accept: profile.accept(),
            user_agent: profile.user_agent(),
            timeout,
        }
    }

    fn headers(&self) -> Result<HeaderMap, FetchError> {
        let mut headers = HeaderMap::new();

        if let Some(auth) = &self.auth_header {
            let mut value =
                HeaderValue::from_str(auth).map_err(|_| FetchError::InvalidHeader("Authorization"))?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        if let Some(accept) = self.accept {
            headers.insert(ACCEPT, HeaderValue::from_static(accept));
        }

        Ok(headers)
    }
}

/// A reusable client configured for one profile
#[derive(Debug)]
pub struct Session {
    profile: SessionProfile,
    client: reqwest::Client,
}

impl Session {
    pub fn new(profile: SessionProfile) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .user_agent(profile.user_agent)
            .default_headers(profile.headers()?)
            .build()?;

        Ok(Self { profile, client })
    }

    pub fn profile(&self) -> &SessionProfile {
        &self.profile
    }

    pub fn client(&self) -> &reqwest::Client {
        &self.client
    }
}

/// Lazily built sessions, one per profile, kept for the life of the process
pub struct SessionRegistry {
    credentials: Arc<dyn CredentialStore>,
    timeout: Duration,
    sessions: Mutex<HashMap<Profile, Arc<Session>>>,
}

impl SessionRegistry {
    pub fn new(credentials: Arc<dyn CredentialStore>, timeout: Duration) -> Self {
        Self {
            credentials,
            timeout,
            sessions: Mutex::new(HashMap::new()),
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Session for `profile`, built on first use
    ///
    /// The registry lock is held while building, so concurrent first access
    /// to one profile builds a single client.
    pub fn session(&self, profile: Profile) -> Result<Arc<Session>, FetchError> {
        let mut sessions = self.sessions.lock().unwrap_or_else(PoisonError::into_inner);

        if let Some(session) = sessions.get(&profile) {
            return Ok(Arc::clone(session));
        }

        debug!("Creating HTTP session for profile {}", profile);
        let session = Arc::new(Session::new(SessionProfile::build(
            profile,
            self.credentials.as_ref(),
            self.timeout,
        ))?);
        sessions.insert(profile, Arc::clone(&session));

        Ok(session)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{FETCH_TIMEOUT, USER_AGENT};
    use crate::fetch::credentials::{MockCredentialStore, StaticCredentials};
    use mockall::predicate::function;

    #[test]
    fn build_attaches_bearer_token_for_api_profiles() {
        let mut credentials = MockCredentialStore::new();
        credentials
            .expect_token()
            .with(function(|host: &str| host == "github.com"))
            .times(1)
            .returning(|_| Some("ghp_secret".to_string()));

        let profile = SessionProfile::build(Profile::GitHub, &credentials, FETCH_TIMEOUT);

        assert_eq!(profile.auth_header, Some("Bearer ghp_secret".to_string()));
        assert_eq!(profile.accept, Some("application/vnd.github.v3+json"));
        assert_eq!(profile.timeout, FETCH_TIMEOUT);
    }

    #[test]
    fn build_without_token_proceeds_unauthenticated() {
        let profile = SessionProfile::build(
            Profile::Bitbucket,
            &StaticCredentials::new(),
            FETCH_TIMEOUT,
        );

        assert_eq!(profile.auth_header, None);
        assert_eq!(profile.accept, Some("application/json"));
    }

    #[test]
    fn build_never_asks_for_tokens_on_plain_profiles() {
        let mut credentials = MockCredentialStore::new();
        credentials.expect_token().never();

        let profile = SessionProfile::build(Profile::Default, &credentials, FETCH_TIMEOUT);

        assert_eq!(
            profile,
            SessionProfile {
                profile: Profile::Default,
                auth_header: None,
                accept: None,
                user_agent: USER_AGENT,
                timeout: FETCH_TIMEOUT,
            }
        );
    }

    #[test]
    fn headers_reject_invalid_token() {
        let credentials = StaticCredentials::new().with_token("gitlab.com", "bad\ntoken");
        let profile = SessionProfile::build(Profile::GitLab, &credentials, FETCH_TIMEOUT);

        assert!(matches!(
            Session::new(profile),
            Err(FetchError::InvalidHeader("Authorization"))
        ));
    }

    #[test]
    fn session_is_built_once_per_profile() {
        let mut credentials = MockCredentialStore::new();
        credentials
            .expect_token()
            .times(1)
            .returning(|_| Some("token".to_string()));
        let registry = SessionRegistry::new(Arc::new(credentials), FETCH_TIMEOUT);

        let first = registry.session(Profile::GitHub).unwrap();
        let second = registry.session(Profile::GitHub).unwrap();
        let other = registry.session(Profile::Xml).unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert!(!Arc::ptr_eq(&first, &other));
        assert_eq!(other.profile().accept, Some("application/xml"));
    }
}
