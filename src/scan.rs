//! Regex scanning of arbitrary upstream pages

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::config::ConfigError;
use crate::fetch::ContentSource;
use crate::version::commit::is_commit_hash;
use crate::version::normalize::is_semver_shaped;
use crate::version::{Candidate, PackageAtom, Policy, ResolutionResult, resolve_with_feed_date};

const ANY_VERSION_CAPTURE: &str = r#"([^"]+)"#;
const SEMVER_CAPTURE: &str = r"v?(\d+\.\d+(?:\.\d+)?)";

static FEED_UPDATED_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)<entry\b.*?<updated>\s*([^<]+?)\s*</updated>")
        .expect("feed pattern must compile")
});

/// Narrow a catch-all capture to release-shaped versions on archive listings
fn adjust_pattern(pattern: &str, package: &PackageAtom, policy: &Policy) -> String {
    if pattern.starts_with("archive/")
        && is_semver_shaped(package.version())
        && policy.semver_enabled(&package.catpkg())
    {
        let adjusted = pattern.replace(ANY_VERSION_CAPTURE, SEMVER_CAPTURE);
        debug!("Adjusted regex for semantic versioning: {}", adjusted);
        return adjusted;
    }
    pattern.to_string()
}

/// `<updated>` of the first `<entry>` of an Atom document
pub fn feed_updated(body: &str) -> Option<&str> {
    FEED_UPDATED_RE
        .captures(body)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Extract candidates in document order
///
/// The first capture group is the tag; a pattern without groups uses the
/// whole match. A commit hash carries the page URL as its id.
pub fn extract_candidates(regex: &Regex, body: &str, url: &str) -> Vec<Candidate> {
    regex
        .captures_iter(body)
        .filter_map(|caps| caps.get(1).or_else(|| caps.get(0)))
        .map(|m| {
            let tag = m.as_str();
            if is_commit_hash(tag) {
                Candidate::new(tag, url)
            } else {
                Candidate::tag(tag)
            }
        })
        .collect()
}

/// Fetch `url`, collect every match of `pattern` and resolve the latest
///
/// An invalid pattern is a configuration error. An unreachable, failed or
/// empty page gives the empty result.
pub async fn latest_by_regex(
    source: &dyn ContentSource,
    url: &str,
    pattern: &str,
    package: &PackageAtom,
    policy: &Policy,
) -> Result<ResolutionResult, ConfigError> {
    let adjusted = adjust_pattern(pattern, package, policy);
    let regex = Regex::new(&adjusted).map_err(|source| ConfigError::InvalidPattern {
        pattern: adjusted.clone(),
        source,
    })?;

    let response = source.fetch(url).await;
    if !response.is_success() || !response.has_content() {
        debug!("No usable page at {} (HTTP {})", url, response.status_code());
        return Ok(ResolutionResult::default());
    }

    let candidates = extract_candidates(&regex, response.text(), url);
    debug!("Found {} candidates for {} at {}", candidates.len(), package, url);

    Ok(resolve_with_feed_date(
        &candidates,
        package,
        policy,
        feed_updated(response.text()),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::FetchResult;
    use crate::fetch::fetcher::MockContentSource;
    use mockall::predicate::function;
    use rstest::rstest;

    fn atom(s: &str) -> PackageAtom {
        PackageAtom::parse(s).unwrap()
    }

    fn source_with(body: &'static str) -> MockContentSource {
        let mut source = MockContentSource::new();
        source
            .expect_fetch()
            .with(function(|url: &str| url == "https://example.com/tags"))
            .times(1)
            .returning(move |url| FetchResult::new(url, 200, body.to_string()));
        source
    }

    #[test]
    fn adjust_pattern_narrows_archive_captures() {
        let policy = Policy::default();

        assert_eq!(
            adjust_pattern(r#"archive/([^"]+)\.tar\.gz"#, &atom("dev-util/foo-1.2.3"), &policy),
            r"archive/v?(\d+\.\d+(?:\.\d+)?)\.tar\.gz"
        );
        assert_eq!(
            adjust_pattern(r#"releases/([^"]+)\.tar\.gz"#, &atom("dev-util/foo-1.2.3"), &policy),
            r#"releases/([^"]+)\.tar\.gz"#
        );
        assert_eq!(
            adjust_pattern(r#"archive/([^"]+)\.tar\.gz"#, &atom("dev-util/foo-1.2.3.4"), &policy),
            r#"archive/([^"]+)\.tar\.gz"#
        );
    }

    #[test]
    fn adjust_pattern_respects_disabled_semver() {
        let policy = Policy::default().with_semver("dev-util/foo", false);

        assert_eq!(
            adjust_pattern(r#"archive/([^"]+)\.zip"#, &atom("dev-util/foo-1.2"), &policy),
            r#"archive/([^"]+)\.zip"#
        );
    }

    #[test]
    fn feed_updated_reads_first_entry() {
        let body = r#"<feed><updated>2023-01-01T00:00:00Z</updated>
            <entry><id>a</id><updated>2024-03-05T10:00:00Z</updated></entry>
            <entry><updated>2024-01-01T00:00:00Z</updated></entry></feed>"#;

        assert_eq!(feed_updated(body), Some("2024-03-05T10:00:00Z"));
        assert_eq!(feed_updated("<html></html>"), None);
    }

    #[tokio::test]
    async fn latest_by_regex_resolves_matches() {
        let source = source_with(
            r#"<a href="foo-1.2.0.tar.gz"></a><a href="foo-1.10.0.tar.gz"></a><a href="foo-1.9.0.tar.gz"></a>"#,
        );

        let result = latest_by_regex(
            &source,
            "https://example.com/tags",
            r"foo-([\d.]+)\.tar\.gz",
            &atom("dev-util/foo-1.2.0"),
            &Policy::default(),
        )
        .await
        .unwrap();

        assert_eq!(result.version, "1.10.0");
        assert_eq!(result.hash_date, "");
    }

    #[tokio::test]
    async fn latest_by_regex_dates_commit_from_feed() {
        let source = source_with(
            r#"<feed><entry><id>tag:github.com,2008:Grit::Commit/abcdef1234567890abcdef1234567890abcdef12</id>
            <updated>2024-03-05T10:00:00Z</updated></entry></feed>"#,
        );

        let result = latest_by_regex(
            &source,
            "https://example.com/tags",
            r"Commit/([0-9a-f]{40})",
            &atom("dev-util/foo-0_pre20240101"),
            &Policy::default(),
        )
        .await
        .unwrap();

        assert_eq!(result.version, "abcdef1234567890abcdef1234567890abcdef12");
        assert_eq!(result.id, "https://example.com/tags");
        assert_eq!(result.hash_date, "20240305");
    }

    #[tokio::test]
    async fn latest_by_regex_empty_page_gives_empty_result() {
        let mut source = MockContentSource::new();
        source
            .expect_fetch()
            .times(1)
            .returning(|url| FetchResult::unavailable(url));

        let result = latest_by_regex(
            &source,
            "https://example.com/tags",
            r"foo-([\d.]+)",
            &atom("dev-util/foo-1.0"),
            &Policy::default(),
        )
        .await
        .unwrap();

        assert!(result.is_empty());
    }

    #[rstest]
    #[case(404)]
    #[case(500)]
    #[tokio::test]
    async fn latest_by_regex_ignores_error_pages(#[case] status: u16) {
        let mut source = MockContentSource::new();
        source.expect_fetch().times(1).returning(move |url| {
            FetchResult::new(url, status, r#"<a href="foo-9.9.9.tar.gz"></a>"#.to_string())
        });

        let result = latest_by_regex(
            &source,
            "https://example.com/tags",
            r"foo-([\d.]+)\.tar\.gz",
            &atom("dev-util/foo-1.2.3"),
            &Policy::default(),
        )
        .await
        .unwrap();

        assert!(result.is_empty());
    }

    #[tokio::test]
    async fn latest_by_regex_rejects_invalid_pattern_before_fetching() {
        let mut source = MockContentSource::new();
        source.expect_fetch().never();

        let result = latest_by_regex(
            &source,
            "https://example.com/tags",
            r"foo-(",
            &atom("dev-util/foo-1.0"),
            &Policy::default(),
        )
        .await;

        assert!(matches!(result, Err(ConfigError::InvalidPattern { .. })));
    }
}
