//! Per-package resolution policy

use std::collections::HashMap;
use std::str::FromStr;

use regex::Regex;
use semver::VersionReq;

use crate::version::error::RestrictionError;
use crate::version::normalize::NormalizedVersion;
use crate::version::semver::to_semver;

/// Narrows which versions are eligible
#[derive(Debug, Clone)]
pub enum VersionRestriction {
    /// Literal prefix on a component boundary: `1.2` admits `1.2.9`, not `1.20`
    Prefix(String),
    /// Regex matched against the normalized literal
    Pattern(Regex),
    /// Semver requirement such as `>=1.4, <2`
    Requirement(VersionReq),
    /// Same major component as the declared version
    SameMajor,
    /// Same major and minor components as the declared version
    SameMinor,
}

impl VersionRestriction {
    /// Whether `candidate` satisfies the restriction
    ///
    /// `declared` is the package's current version; the relative variants
    /// admit everything when it is unknown.
    pub fn allows(&self, candidate: &NormalizedVersion, declared: Option<&NormalizedVersion>) -> bool {
        match self {
            VersionRestriction::Prefix(prefix) => {
                let literal = candidate.literal();
                literal
                    .strip_prefix(prefix.as_str())
                    .is_some_and(|rest| !rest.starts_with(|c: char| c.is_ascii_digit()))
            }
            VersionRestriction::Pattern(pattern) => pattern.is_match(candidate.literal()),
            VersionRestriction::Requirement(requirement) => {
                to_semver(candidate).is_some_and(|v| requirement.matches(&v))
            }
            VersionRestriction::SameMajor => declared.is_none_or(|declared| {
                candidate.key().component(0) == declared.key().component(0)
            }),
            VersionRestriction::SameMinor => declared.is_none_or(|declared| {
                (0..2).all(|i| candidate.key().component(i) == declared.key().component(i))
            }),
        }
    }
}

impl FromStr for VersionRestriction {
    type Err = RestrictionError;

    /// `major`, `minor`, `prefix:<p>`, `regex:<re>`, or a semver requirement
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        match s {
            "major" => return Ok(VersionRestriction::SameMajor),
            "minor" => return Ok(VersionRestriction::SameMinor),
            _ => {}
        }

        if let Some(prefix) = s.strip_prefix("prefix:") {
            return Ok(VersionRestriction::Prefix(prefix.to_string()));
        }

        if let Some(pattern) = s.strip_prefix("regex:") {
            return Regex::new(pattern)
                .map(VersionRestriction::Pattern)
                .map_err(|source| RestrictionError::Pattern {
                    pattern: pattern.to_string(),
                    source,
                });
        }

        VersionReq::parse(s)
            .map(VersionRestriction::Requirement)
            .map_err(|source| RestrictionError::Requirement {
                requirement: s.to_string(),
                source,
            })
    }
}

/// Rules controlling which candidates a resolution may pick
#[derive(Debug, Clone, Default)]
pub struct Policy {
    /// Admit alpha/beta/pre/rc and preview-channel tags
    pub development_allowed: bool,
    pub restriction: Option<VersionRestriction>,
    /// catpkg -> whether semver-shaped packages only accept semver-shaped tags
    pub semver: HashMap<String, bool>,
    /// Tags matching any of these are never considered
    pub ignore: Vec<Regex>,
}

impl Policy {
    pub fn with_development(mut self, allowed: bool) -> Self {
        self.development_allowed = allowed;
        self
    }

    pub fn with_restriction(mut self, restriction: VersionRestriction) -> Self {
        self.restriction = Some(restriction);
        self
    }

    pub fn with_semver(mut self, catpkg: &str, enabled: bool) -> Self {
        self.semver.insert(catpkg.to_string(), enabled);
        self
    }

    pub fn with_ignore(mut self, pattern: Regex) -> Self {
        self.ignore.push(pattern);
        self
    }

    /// Semver narrowing is on unless a package opts out
    pub fn semver_enabled(&self, catpkg: &str) -> bool {
        self.semver.get(catpkg).copied().unwrap_or(true)
    }

    pub fn is_ignored(&self, tag: &str) -> bool {
        self.ignore.iter().any(|pattern| pattern.is_match(tag))
    }
}

/// Compile ignore patterns; the first invalid one is reported
pub fn compile_ignore_patterns(patterns: &[String]) -> Result<Vec<Regex>, RestrictionError> {
    patterns
        .iter()
        .map(|pattern| {
            Regex::new(pattern).map_err(|source| RestrictionError::Pattern {
                pattern: pattern.clone(),
                source,
            })
        })
        .collect()
}
