//! Tag normalization
//!
//! One pass over a raw tag yields both the Portage-style literal handed back
//! to callers and the key used for ordering. The two are kept as separate
//! values: `2.0.0-rc1` renders as `2.0.0_rc1` but sorts by its components.
//!
//! Accepted grammar after prefix stripping:
//!
//! ```text
//! N([._-]N)* [letter]? ([._-]? suffix [._-]? N?)?
//! ```
//!
//! where `suffix` is one of alpha/a, beta/b, pre/preview/dev, rc,
//! p/pl/patch/post.

use std::cmp::Ordering;
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::version::archive::strip_archive_extension;

static VERSION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^(\d+(?:[._-]\d+)*)([a-z])?(?:[._-]?(alpha|beta|preview|pre|dev|rc|patch|post|pl|p|a|b)[._-]?(\d*))?$",
    )
    .expect("version pattern must compile")
});

static RELEASE_WORD_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:release|version|ver|rel)[-_.]?").expect("release word pattern must compile")
});

static SEMVER_SHAPE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+\.\d+(?:\.\d+)?$").expect("semver pattern must compile"));

/// Channel suffix, declared in ascending sort order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Suffix {
    Alpha,
    Beta,
    Pre,
    Rc,
    Release,
    Patch,
}

impl Suffix {
    fn parse(s: &str) -> Self {
        match s.to_ascii_lowercase().as_str() {
            "alpha" | "a" => Suffix::Alpha,
            "beta" | "b" => Suffix::Beta,
            "pre" | "preview" | "dev" => Suffix::Pre,
            "rc" => Suffix::Rc,
            "p" | "pl" | "patch" | "post" => Suffix::Patch,
            _ => Suffix::Release,
        }
    }

    /// Portage spelling of the suffix, empty for a final release
    pub fn as_portage(&self) -> &'static str {
        match self {
            Suffix::Alpha => "_alpha",
            Suffix::Beta => "_beta",
            Suffix::Pre => "_pre",
            Suffix::Rc => "_rc",
            Suffix::Release => "",
            Suffix::Patch => "_p",
        }
    }

    /// Whether the suffix marks an early-access channel
    pub fn is_development(&self) -> bool {
        matches!(
            self,
            Suffix::Alpha | Suffix::Beta | Suffix::Pre | Suffix::Rc
        )
    }
}

/// Ordering key of a normalized version
///
/// Numeric components are kept as digit strings without leading zeros and
/// compared by length first, so arbitrarily long runs (dates, build numbers)
/// never overflow. Trailing zero components are insignificant.
#[derive(Debug, Clone)]
pub struct VersionKey {
    components: Vec<String>,
    letter: Option<char>,
    suffix: Suffix,
    suffix_number: String,
}

impl VersionKey {
    pub fn components(&self) -> &[String] {
        &self.components
    }

    /// Component at `index`, `"0"` when absent
    pub fn component(&self, index: usize) -> &str {
        self.components.get(index).map(String::as_str).unwrap_or("0")
    }

    /// Portage letter following the numeric part (`1.0b`)
    pub fn letter(&self) -> Option<char> {
        self.letter
    }

    pub fn suffix(&self) -> Suffix {
        self.suffix
    }

    pub fn suffix_number(&self) -> &str {
        &self.suffix_number
    }

    /// Two or three numeric components
    pub fn is_semver_shaped(&self) -> bool {
        (2..=3).contains(&self.components.len())
    }

    fn significant(&self) -> &[String] {
        let end = self
            .components
            .iter()
            .rposition(|c| c != "0")
            .map_or(0, |i| i + 1);
        &self.components[..end]
    }
}

fn strip_leading_zeros(digits: &str) -> String {
    let trimmed = digits.trim_start_matches('0');
    if trimmed.is_empty() {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}

fn compare_numeric(a: &str, b: &str) -> Ordering {
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

impl Ord for VersionKey {
    fn cmp(&self, other: &Self) -> Ordering {
        let (ours, theirs) = (self.significant(), other.significant());
        for (a, b) in ours.iter().zip(theirs) {
            let ordering = compare_numeric(a, b);
            if ordering != Ordering::Equal {
                return ordering;
            }
        }

        ours.len()
            .cmp(&theirs.len())
            .then_with(|| self.letter.cmp(&other.letter))
            .then_with(|| self.suffix.cmp(&other.suffix))
            .then_with(|| compare_numeric(&self.suffix_number, &other.suffix_number))
    }
}

impl PartialOrd for VersionKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for VersionKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for VersionKey {}

/// A tag after normalization: the literal to return and the key to sort by
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedVersion {
    literal: String,
    key: VersionKey,
}

impl NormalizedVersion {
    pub fn literal(&self) -> &str {
        &self.literal
    }

    pub fn key(&self) -> &VersionKey {
        &self.key
    }

    pub fn is_development(&self) -> bool {
        self.key.suffix.is_development()
    }
}

impl fmt::Display for NormalizedVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.literal)
    }
}

/// Strip decorations that commonly precede the version in a tag or file name
pub(crate) fn strip_prefixes<'a>(tag: &'a str, package_name: &str) -> &'a str {
    let mut rest = strip_archive_extension(tag.trim());

    if !package_name.is_empty()
        && let Some(head) = rest.get(..package_name.len())
        && head.eq_ignore_ascii_case(package_name)
    {
        let tail = &rest[package_name.len()..];
        rest = tail.strip_prefix(['-', '_', '.']).unwrap_or(tail);
    }

    if let Some(m) = RELEASE_WORD_RE.find(rest) {
        rest = &rest[m.end()..];
    }

    match rest.strip_prefix(['v', 'V']) {
        Some(tail) if tail.starts_with(|c: char| c.is_ascii_digit()) => tail,
        _ => rest,
    }
}

/// Normalize a raw tag
///
/// `package_name` is the bare package name (no category); a tag that starts
/// with it, like `foo-1.2.tar.gz` for package `foo`, has it removed. Pass an
/// empty name to skip that step.
///
/// Returns `None` for tags that do not describe a version.
pub fn normalize(tag: &str, package_name: &str) -> Option<NormalizedVersion> {
    let stripped = strip_prefixes(tag, package_name);
    let stripped = stripped.split_once('+').map_or(stripped, |(head, _)| head);

    let Some(caps) = VERSION_RE.captures(stripped) else {
        debug!("normalize(): rejected tag {:?}", tag);
        return None;
    };

    let raw_components: Vec<&str> = caps[1].split(['.', '_', '-']).collect();
    let letter = caps
        .get(2)
        .and_then(|m| m.as_str().chars().next())
        .map(|c| c.to_ascii_lowercase());
    let suffix = caps
        .get(3)
        .map_or(Suffix::Release, |m| Suffix::parse(m.as_str()));
    let raw_suffix_number = caps.get(4).map_or("", |m| m.as_str());

    let mut literal = raw_components.join(".");
    if let Some(letter) = letter {
        literal.push(letter);
    }
    literal.push_str(suffix.as_portage());
    if suffix != Suffix::Release {
        literal.push_str(raw_suffix_number);
    }

    let key = VersionKey {
        components: raw_components.iter().map(|c| strip_leading_zeros(c)).collect(),
        letter,
        suffix,
        suffix_number: strip_leading_zeros(raw_suffix_number),
    };

    debug!("normalize(): {:?} -> {}", tag, literal);
    Some(NormalizedVersion { literal, key })
}

/// Whether a declared version looks like `N.N` or `N.N.N`
pub fn is_semver_shaped(version: &str) -> bool {
    SEMVER_SHAPE_RE.is_match(version)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn literal(tag: &str) -> Option<String> {
        normalize(tag, "").map(|v| v.literal().to_string())
    }

    fn key(tag: &str) -> VersionKey {
        normalize(tag, "").unwrap().key().clone()
    }

    #[rstest]
    #[case("1.2.3", Some("1.2.3"))]
    #[case("v1.2.3", Some("1.2.3"))]
    #[case("V2.0", Some("2.0"))]
    #[case("1_2_3", Some("1.2.3"))]
    #[case("1-2-3", Some("1.2.3"))]
    #[case("2.0.0-rc1", Some("2.0.0_rc1"))]
    #[case("2.0.0-RC.2", Some("2.0.0_rc2"))]
    #[case("1.2.3-pl4", Some("1.2.3_p4"))]
    #[case("3.99_p20240101", Some("3.99_p20240101"))]
    #[case("1.0-beta", Some("1.0_beta"))]
    #[case("1.0b", Some("1.0b"))]
    #[case("1.0a1", Some("1.0_alpha1"))]
    #[case("1.0.dev3", Some("1.0_pre3"))]
    #[case("1.2.3+build.7", Some("1.2.3"))]
    #[case("release-1.2.3", Some("1.2.3"))]
    #[case("version_4.5", Some("4.5"))]
    #[case("release-v1.4", Some("1.4"))]
    #[case("1.2.3.tar.gz", Some("1.2.3"))]
    #[case("1.7z", Some("1.7z"))]
    #[case("2024.01.05", Some("2024.01.05"))]
    #[case("latest", None)]
    #[case("", None)]
    #[case("v", None)]
    #[case("1.2.3-linux-amd64", None)]
    fn normalize_produces_portage_literal(#[case] tag: &str, #[case] expected: Option<&str>) {
        assert_eq!(literal(tag), expected.map(|s| s.to_string()));
    }

    #[test]
    fn normalize_strips_package_name_prefix() {
        let normalized = normalize("Foo-1.4.2.tar.xz", "foo").unwrap();
        assert_eq!(normalized.literal(), "1.4.2");
    }

    #[test]
    fn normalize_keeps_tag_when_package_name_does_not_match() {
        assert_eq!(normalize("bar-1.0", "foo"), None);
    }

    #[rstest]
    #[case("1.10.0", "1.9.0")]
    #[case("10.0", "9.5")]
    #[case("1.0.1", "1.0")]
    #[case("1.0", "1.0_rc1")]
    #[case("1.0_rc2", "1.0_rc1")]
    #[case("1.0_rc1", "1.0_beta3")]
    #[case("1.0_beta1", "1.0_alpha9")]
    #[case("1.0_p1", "1.0")]
    #[case("1.0b", "1.0a")]
    #[case("1.0a", "1.0")]
    #[case("123456789012345678901234567890.1", "123456789012345678901234567890.0")]
    fn version_key_orders_greater(#[case] greater: &str, #[case] lesser: &str) {
        assert!(key(greater) > key(lesser), "{greater} > {lesser}");
    }

    #[rstest]
    #[case("1.0", "1.0.0")]
    #[case("v1.0", "1.0")]
    #[case("01.002", "1.2")]
    #[case("1.0-rc01", "1.0_rc1")]
    fn version_key_treats_as_equal(#[case] a: &str, #[case] b: &str) {
        assert_eq!(key(a), key(b));
    }

    #[rstest]
    #[case("1.2", true)]
    #[case("1.2.3", true)]
    #[case("1", false)]
    #[case("1.2.3.4", false)]
    #[case("1.2.3_rc1", false)]
    fn is_semver_shaped_checks_declared_version(#[case] version: &str, #[case] expected: bool) {
        assert_eq!(is_semver_shaped(version), expected);
    }

    #[test]
    fn suffix_development_channels() {
        assert!(Suffix::Rc.is_development());
        assert!(Suffix::Alpha.is_development());
        assert!(!Suffix::Release.is_development());
        assert!(!Suffix::Patch.is_development());
    }
}
