//! Development channel detection

use std::sync::LazyLock;

use regex::Regex;

use crate::version::normalize::{NormalizedVersion, strip_prefixes};

static CHANNEL_WORD_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:^|[._+-])(?:nightly|snapshot|canary|insiders?|eap|unstable)(?:$|[._+-])")
        .expect("channel pattern must compile")
});

/// Whether a candidate belongs to an early-access or release-candidate channel
///
/// Either its normalized suffix is alpha/beta/pre/rc, or the tag names a
/// preview channel as a separate word. The package name is stripped first,
/// so `heaptrack-1.5.0` is not read as an `eap` build.
pub fn is_development_tag(raw_tag: &str, package_name: &str, normalized: &NormalizedVersion) -> bool {
    normalized.is_development() || CHANNEL_WORD_RE.is_match(strip_prefixes(raw_tag, package_name))
}
