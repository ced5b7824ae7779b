//! Commit-hash ("live") candidates

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

static DATED_VERSION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"2[0-9]{7}").expect("date pattern must compile"));

/// Whether a tag is shaped like an abbreviated or full commit hash
///
/// Exactly 7 hex characters, or more than 8. Eight characters are excluded
/// because they collide with `YYYYMMDD` date tags.
pub fn is_commit_hash(tag: &str) -> bool {
    let len = tag.len();
    (len == 7 || len > 8) && tag.chars().all(|c| c.is_ascii_hexdigit())
}

/// Compact date stamp for a commit-based result
///
/// Only packages whose declared version already carries an 8-digit date
/// (`0_p20240101`, `20231130`) get one. `feed_updated` is an ISO-8601
/// timestamp such as an Atom entry's `<updated>`; its date part becomes
/// `YYYYMMDD`. Anything else yields an empty string.
pub fn hash_date(declared_version: &str, feed_updated: Option<&str>) -> String {
    if !DATED_VERSION_RE.is_match(declared_version) {
        return String::new();
    }

    let Some(updated) = feed_updated else {
        return String::new();
    };

    let date: String = updated
        .trim()
        .split('T')
        .next()
        .unwrap_or_default()
        .replace('-', "");

    if date.len() == 8 && date.chars().all(|c| c.is_ascii_digit()) {
        debug!("Using feed date {} for declared version {}", date, declared_version);
        date
    } else {
        debug!("Ignoring malformed feed date {:?}", updated);
        String::new()
    }
}
