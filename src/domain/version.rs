use std::cmp::Ordering;
use std::fmt;

use crate::error::{ModtagError, Result};

/// A semantic version together with the prefix it was written with
/// (typically `v` or empty). The prefix is carried along so a tag can be
/// reproduced exactly, but it never participates in comparison.
#[derive(Debug, Clone)]
pub struct Version {
    pub prefix: String,
    pub semver: semver::Version,
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.semver == other.semver
    }
}

impl Eq for Version {}

impl Version {
    pub fn new(prefix: impl Into<String>, major: u64, minor: u64, patch: u64) -> Self {
        Version {
            prefix: prefix.into(),
            semver: semver::Version::new(major, minor, patch),
        }
    }

    /// The zero version `0.0.0` used when a module has no tags yet.
    pub fn zero(prefix: impl Into<String>) -> Self {
        Version::new(prefix, 0, 0, 0)
    }

    /// Parse a version that must start with `prefix` (e.g. "v1.2.3" with
    /// prefix "v"). An empty prefix only matches bare semver text, so
    /// `v1.0.0` is rejected when the configured prefix is empty.
    pub fn parse(text: &str, prefix: &str) -> Result<Self> {
        let remainder = text
            .strip_prefix(prefix)
            .ok_or_else(|| ModtagError::version(format!("'{}' missing prefix '{}'", text, prefix)))?;

        let semver = semver::Version::parse(remainder)
            .map_err(|e| ModtagError::version(format!("'{}': {}", text, e)))?;

        Ok(Version {
            prefix: prefix.to_string(),
            semver,
        })
    }

    pub fn major(&self) -> u64 {
        self.semver.major
    }

    /// Next version after a bump, always a bare X.Y.Z release.
    pub fn bump(&self, bump: VersionBump) -> Self {
        let v = &self.semver;
        let next = match bump {
            VersionBump::Major => semver::Version::new(v.major + 1, 0, 0),
            VersionBump::Minor => semver::Version::new(v.major, v.minor + 1, 0),
            VersionBump::Patch => semver::Version::new(v.major, v.minor, v.patch + 1),
            VersionBump::None => semver::Version::new(v.major, v.minor, v.patch),
        };
        Version {
            prefix: self.prefix.clone(),
            semver: next,
        }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.prefix, self.semver)
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        self.semver.cmp(&other.semver)
    }
}

/// How far a set of commits moves a version
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum VersionBump {
    None,
    Patch,
    Minor,
    Major,
}
