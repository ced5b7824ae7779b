//! Request profiles and URL routing

use reqwest::Url;

use crate::config::USER_AGENT;

/// A class of host sharing headers and credentials
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Profile {
    /// api.github.com, bearer token for github.com
    GitHub,
    /// GitLab REST API, bearer token for gitlab.com
    GitLab,
    /// api.bitbucket.org, bearer token for bitbucket.org
    Bitbucket,
    /// repology.org JSON API
    Repology,
    /// Atom/RSS/XML documents
    Xml,
    /// Any other JSON endpoint
    Json,
    /// Plain pages, no auth and no Accept header
    Default,
}

impl Profile {
    /// Returns the string representation of the profile
    pub fn as_str(&self) -> &'static str {
        match self {
            Profile::GitHub => "github",
            Profile::GitLab => "gitlab",
            Profile::Bitbucket => "bitbucket",
            Profile::Repology => "repology",
            Profile::Xml => "xml",
            Profile::Json => "json",
            Profile::Default => "default",
        }
    }

    /// Host whose token authenticates requests of this profile
    pub fn credential_host(&self) -> Option<&'static str> {
        match self {
            Profile::GitHub => Some("github.com"),
            Profile::GitLab => Some("gitlab.com"),
            Profile::Bitbucket => Some("bitbucket.org"),
            _ => None,
        }
    }

    pub fn accept(&self) -> Option<&'static str> {
        match self {
            Profile::GitHub => Some("application/vnd.github.v3+json"),
            Profile::GitLab | Profile::Bitbucket | Profile::Repology | Profile::Json => {
                Some("application/json")
            }
            Profile::Xml => Some("application/xml"),
            Profile::Default => None,
        }
    }

    pub fn user_agent(&self) -> &'static str {
        match self {
            // repology rejects generic client agents
            Profile::Repology => "DistroWatch",
            _ => USER_AGENT,
        }
    }
}

impl std::fmt::Display for Profile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a routing predicate gets to look at
struct Target<'a> {
    raw: &'a str,
    url: Option<&'a Url>,
}

impl Target<'_> {
    fn host(&self) -> Option<&str> {
        self.url.and_then(|u| u.host_str())
    }

    fn path(&self) -> &str {
        self.url.map_or("", |u| u.path())
    }
}

fn is_github_api(target: &Target<'_>) -> bool {
    target.host() == Some("api.github.com")
}

fn is_gitlab_api(target: &Target<'_>) -> bool {
    match target.host() {
        Some("api.gitlab.com") => true,
        Some("gitlab.com") => target.path().starts_with("/api/"),
        _ => false,
    }
}

fn is_bitbucket_api(target: &Target<'_>) -> bool {
    target.host() == Some("api.bitbucket.org")
}

fn is_repology(target: &Target<'_>) -> bool {
    target.host() == Some("repology.org")
}

fn is_xml_document(target: &Target<'_>) -> bool {
    target.raw.ends_with(".atom") || target.raw.ends_with(".xml")
}

fn is_json_document(target: &Target<'_>) -> bool {
    target.raw.ends_with("json")
}

/// Routing table, evaluated top to bottom; first match wins
const ROUTES: &[(fn(&Target<'_>) -> bool, Profile)] = &[
    (is_github_api, Profile::GitHub),
    (is_gitlab_api, Profile::GitLab),
    (is_bitbucket_api, Profile::Bitbucket),
    (is_repology, Profile::Repology),
    (is_xml_document, Profile::Xml),
    (is_json_document, Profile::Json),
];

/// Detect the profile to fetch `url` with
pub fn detect_profile(url: &str) -> Profile {
    let parsed = Url::parse(url).ok();
    let target = Target {
        raw: url,
        url: parsed.as_ref(),
    };

    ROUTES
        .iter()
        .find(|(matches, _)| matches(&target))
        .map_or(Profile::Default, |(_, profile)| *profile)
}
