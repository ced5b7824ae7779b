//! Latest version resolution
//!
//! Picks one winner out of a noisy candidate list:
//!
//! 1. a commit hash in first position wins outright ("live" packages)
//! 2. otherwise every tag candidate is normalized and filtered by ignore
//!    rules, development channel, semver shape and version restriction
//! 3. the maximum by [`VersionKey`](crate::version::normalize::VersionKey)
//!    wins; ties keep the earliest candidate
//!
//! Resolution is pure: no I/O, no state carried between calls.

use tracing::debug;

use crate::version::atom::PackageAtom;
use crate::version::channel::is_development_tag;
use crate::version::commit::{hash_date, is_commit_hash};
use crate::version::normalize::{NormalizedVersion, is_semver_shaped, normalize};
use crate::version::policy::Policy;
use crate::version::types::{Candidate, ResolutionResult};

/// Resolve the latest version for `package` out of `candidates`
pub fn resolve(candidates: &[Candidate], package: &PackageAtom, policy: &Policy) -> ResolutionResult {
    resolve_with_feed_date(candidates, package, policy, None)
}

/// Like [`resolve`], with the `<updated>` timestamp of the feed the
/// candidates came from, used to date a commit-based result
pub fn resolve_with_feed_date(
    candidates: &[Candidate],
    package: &PackageAtom,
    policy: &Policy,
    feed_updated: Option<&str>,
) -> ResolutionResult {
    let Some(first) = candidates.first() else {
        debug!("No candidates for {}", package);
        return ResolutionResult::default();
    };

    if is_commit_hash(&first.tag) {
        debug!("Commit {} is the latest for {}", first.tag, package);
        return ResolutionResult {
            version: first.tag.clone(),
            id: first.id.clone(),
            hash_date: hash_date(package.version(), feed_updated),
        };
    }

    let catpkg = package.catpkg();
    let declared = normalize(package.version(), "");
    let development_allowed =
        policy.development_allowed || declared.as_ref().is_some_and(|d| d.is_development());
    let semver_only = policy.semver_enabled(&catpkg) && is_semver_shaped(package.version());

    let mut best: Option<(&Candidate, NormalizedVersion)> = None;

    for candidate in candidates {
        if is_commit_hash(&candidate.tag) {
            debug!("Skipping commit {} after tag candidates", candidate.tag);
            continue;
        }

        if policy.is_ignored(&candidate.tag) {
            debug!("Ignoring {} for {}", candidate.tag, catpkg);
            continue;
        }

        let Some(normalized) = normalize(&candidate.tag, package.name()) else {
            continue;
        };

        if !development_allowed && is_development_tag(&candidate.tag, package.name(), &normalized) {
            debug!("Skipping development version {}", normalized);
            continue;
        }

        if semver_only && !normalized.key().is_semver_shaped() {
            debug!("Skipping non-semver version {}", normalized);
            continue;
        }

        if let Some(restriction) = &policy.restriction
            && !restriction.allows(&normalized, declared.as_ref())
        {
            debug!("Skipping restricted version {}", normalized);
            continue;
        }

        match &best {
            Some((_, current)) if normalized.key() <= current.key() => {}
            _ => best = Some((candidate, normalized)),
        }
    }

    match best {
        Some((candidate, normalized)) => {
            debug!("Latest version for {}: {}", catpkg, normalized);
            ResolutionResult {
                version: normalized.literal().to_string(),
                id: candidate.id.clone(),
                hash_date: String::new(),
            }
        }
        None => {
            debug!("No acceptable candidate for {}", catpkg);
            ResolutionResult::default()
        }
    }
}
