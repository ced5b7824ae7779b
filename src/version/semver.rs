use semver::{Prerelease, Version};

use crate::version::normalize::{NormalizedVersion, Suffix};

/// Parse a version string into a semver::Version, normalizing partial versions.
///
/// Handles partial versions like "1" or "1.2" by padding with zeros.
/// Does NOT strip 'v' prefix (use `normalize` first if needed).
///
/// Examples:
/// - "1" -> Version(1, 0, 0)
/// - "1.2" -> Version(1, 2, 0)
/// - "1.2.3" -> Version(1, 2, 3)
pub fn parse_version(version: &str) -> Option<Version> {
    let parts: Vec<&str> = version.split('.').collect();
    let normalized = match parts.len() {
        1 => format!("{}.0.0", parts[0]),
        2 => format!("{}.{}.0", parts[0], parts[1]),
        _ => version.to_string(),
    };
    Version::parse(&normalized).ok()
}

/// Map a normalized version onto semver for requirement matching
///
/// Versions with more than three numeric components, or with a Portage
/// letter, have no semver equivalent. Development suffixes become a
/// pre-release (`1.0_rc2` -> `1.0.0-rc.2`); a patch suffix is dropped.
pub fn to_semver(version: &NormalizedVersion) -> Option<Version> {
    let key = version.key();
    if key.components().len() > 3 || key.letter().is_some() {
        return None;
    }

    let mut parsed = parse_version(&key.components().join("."))?;

    let label = match key.suffix() {
        Suffix::Alpha => "alpha",
        Suffix::Beta => "beta",
        Suffix::Pre => "pre",
        Suffix::Rc => "rc",
        Suffix::Release | Suffix::Patch => return Some(parsed),
    };
    parsed.pre = Prerelease::new(&format!("{}.{}", label, key.suffix_number())).ok()?;
    Some(parsed)
}
