//! Survey document version identifiers
//!
//! A version is an optional leading `v`, one or more dot-separated digit
//! groups, then any suffix (`v1.3`, `v1.3.2`, `v1.3beta`). Versions compare
//! numerically component by component; on a numeric tie a version carrying a
//! suffix sorts below the same version without one.

use super::errors::MappingError;
use regex::Regex;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

fn version_regex() -> &'static Regex {
    static VERSION_REGEX: OnceLock<Regex> = OnceLock::new();
    VERSION_REGEX.get_or_init(|| {
        Regex::new(r"^v?(?P<components>\d+(?:\.\d+)*)(?P<suffix>.*)$")
            .expect("version pattern is valid")
    })
}

/// A parsed document version
#[derive(Debug, Clone)]
pub struct Version {
    text: String,
    components: Vec<u32>,
    suffix: Option<String>,
}

impl Version {
    /// Parses a version identifier
    ///
    /// # Errors
    ///
    /// Returns [`MappingError::MalformedVersion`] when the text has no leading
    /// digit group or a component does not fit in 32 bits.
    pub fn parse(text: &str) -> Result<Self, MappingError> {
        let trimmed = text.trim();
        let captures = version_regex()
            .captures(trimmed)
            .ok_or_else(|| MappingError::MalformedVersion(text.to_string()))?;

        let components = captures["components"]
            .split('.')
            .map(|part| part.parse::<u32>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| MappingError::MalformedVersion(text.to_string()))?;

        let suffix = Some(captures["suffix"].to_string()).filter(|s| !s.is_empty());

        Ok(Self {
            text: trimmed.to_string(),
            components,
            suffix,
        })
    }

    /// Numeric components, most significant first
    pub fn components(&self) -> &[u32] {
        &self.components
    }

    /// Trailing suffix, if any
    pub fn suffix(&self) -> Option<&str> {
        self.suffix.as_deref()
    }

    /// Returns true when this version sorts strictly before `other`
    pub fn is_less_than(&self, other: &Version) -> bool {
        self.cmp(other) == Ordering::Less
    }

    fn compare_numeric(&self, other: &Version) -> Ordering {
        for (mine, theirs) in self.components.iter().zip(other.components.iter()) {
            match mine.cmp(theirs) {
                Ordering::Equal => continue,
                unequal => return unequal,
            }
        }
        self.components.len().cmp(&other.components.len())
    }

    fn compare_suffix(&self, other: &Version) -> Ordering {
        match (&self.suffix, &other.suffix) {
            (None, None) => Ordering::Equal,
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (Some(mine), Some(theirs)) => mine.to_lowercase().cmp(&theirs.to_lowercase()),
        }
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        self.compare_numeric(other)
            .then_with(|| self.compare_suffix(other))
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Version {}

impl FromStr for Version {
    type Err = MappingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.text)
    }
}
