use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AtomError {
    #[error("Invalid package atom: {0}")]
    Invalid(String),
}

#[derive(Debug, Error)]
pub enum RestrictionError {
    #[error("Invalid restriction pattern {pattern:?}: {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("Invalid version requirement {requirement:?}: {source}")]
    Requirement {
        requirement: String,
        #[source]
        source: semver::Error,
    },
}
