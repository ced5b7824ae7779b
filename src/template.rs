//! Distfile URI templates

use std::fmt;
use std::str::FromStr;

use crate::config::ConfigError;

const VERSION_PLACEHOLDER: &str = "@PV@";
const SHA_PLACEHOLDER: &str = "@SHA@";

/// A URI with `@PV@` and/or `@SHA@` placeholders
///
/// ```text
/// https://example.com/foo/archive/@SHA@.tar.gz
/// https://example.com/foo-@PV@-vendor.tar.xz
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UriTemplate {
    template: String,
}

impl UriTemplate {
    /// A template without any placeholder is rejected
    pub fn parse(template: &str) -> Result<Self, ConfigError> {
        if !template.contains(VERSION_PLACEHOLDER) && !template.contains(SHA_PLACEHOLDER) {
            return Err(ConfigError::MissingPlaceholder(template.to_string()));
        }

        Ok(Self {
            template: template.to_string(),
        })
    }

    pub fn as_str(&self) -> &str {
        &self.template
    }

    pub fn expand(&self, version: &str, sha: &str) -> String {
        self.template
            .replace(VERSION_PLACEHOLDER, version)
            .replace(SHA_PLACEHOLDER, sha)
    }
}

impl FromStr for UriTemplate {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for UriTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.template)
    }
}
