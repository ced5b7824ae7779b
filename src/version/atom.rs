//! Package identity
//!
//! A package is named by a Portage atom, `category/name-version[-rN]`.
//! Per-package settings are keyed by the `category/name` part (catpkg).

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;

use crate::version::error::AtomError;

static PORTAGE_VERSION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d+(?:\.\d+)*[a-z]?(?:_(?:alpha|beta|pre|rc|p)\d*)*(?:-r(\d+))?$")
        .expect("portage version pattern must compile")
});

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PackageAtom {
    category: String,
    name: String,
    version: String,
    revision: Option<u32>,
}

impl PackageAtom {
    /// Parse `cat/pkg`, `cat/pkg-1.2.3` or `=cat/pkg-1.2.3-r1`
    pub fn parse(atom: &str) -> Result<Self, AtomError> {
        let invalid = || AtomError::Invalid(atom.to_string());
        let trimmed = atom.trim().trim_start_matches('=');

        let (category, rest) = trimmed.split_once('/').ok_or_else(invalid)?;
        if category.is_empty() || rest.is_empty() || rest.contains('/') {
            return Err(invalid());
        }

        let split = rest.match_indices('-').map(|(i, _)| i).find(|&i| {
            let tail = &rest[i + 1..];
            tail.starts_with(|c: char| c.is_ascii_digit()) && PORTAGE_VERSION_RE.is_match(tail)
        });

        let (name, version, revision) = match split {
            Some(i) => {
                let tail = &rest[i + 1..];
                let caps = PORTAGE_VERSION_RE.captures(tail).ok_or_else(invalid)?;
                let revision = caps.get(1).and_then(|m| m.as_str().parse().ok());
                let version = match caps.get(1) {
                    Some(m) => &tail[..m.start() - 2],
                    None => tail,
                };
                (&rest[..i], version, revision)
            }
            None => (rest, "", None),
        };

        if name.is_empty() {
            return Err(invalid());
        }

        Ok(Self {
            category: category.to_string(),
            name: name.to_string(),
            version: version.to_string(),
            revision,
        })
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared version without revision, empty for unversioned atoms
    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn revision(&self) -> Option<u32> {
        self.revision
    }

    /// `category/name`
    pub fn catpkg(&self) -> String {
        format!("{}/{}", self.category, self.name)
    }
}

impl FromStr for PackageAtom {
    type Err = AtomError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for PackageAtom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.category, self.name)?;
        if !self.version.is_empty() {
            write!(f, "-{}", self.version)?;
        }
        if let Some(revision) = self.revision {
            write!(f, "-r{}", revision)?;
        }
        Ok(())
    }
}
