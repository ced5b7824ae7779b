use serde::{Deserialize, Serialize};

/// A proposed "latest version": a raw tag plus an opaque identifier
///
/// `id` is whatever the source attaches to the tag (a commit hash, a release
/// asset id) and is empty when the source has nothing to offer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub tag: String,
    #[serde(default)]
    pub id: String,
}

impl Candidate {
    pub fn new(tag: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            id: id.into(),
        }
    }

    /// Candidate without an identifier
    pub fn tag(tag: impl Into<String>) -> Self {
        Self::new(tag, "")
    }
}

/// Outcome of a resolution
///
/// An empty `version` means no candidate was acceptable, which is a normal
/// result rather than an error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResolutionResult {
    pub version: String,
    pub id: String,
    /// `YYYYMMDD`, only ever set for commit-based results
    pub hash_date: String,
}

impl ResolutionResult {
    pub fn is_empty(&self) -> bool {
        self.version.is_empty()
    }
}
