//! Version - Semantic version with release precedence ordering
//!
//! Version is a Value Object. Two versions are equal when they have the
//! same precedence; build metadata is dropped at parse time.

use core::cmp::Ordering;
use core::fmt;
use core::str::FromStr;

/// A single dot-separated pre-release identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum Identifier {
    Numeric(u64),
    Alpha(String),
}

impl Ord for Identifier {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Identifier::Numeric(a), Identifier::Numeric(b)) => a.cmp(b),
            (Identifier::Numeric(_), Identifier::Alpha(_)) => Ordering::Less,
            (Identifier::Alpha(_), Identifier::Numeric(_)) => Ordering::Greater,
            (Identifier::Alpha(a), Identifier::Alpha(b)) => a.cmp(b),
        }
    }
}

impl PartialOrd for Identifier {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Identifier::Numeric(n) => write!(f, "{}", n),
            Identifier::Alpha(s) => f.write_str(s),
        }
    }
}

/// Semantic version: `MAJOR.MINOR.PATCH[-PRERELEASE]`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Version {
    major: u64,
    minor: u64,
    patch: u64,
    pre: Vec<Identifier>,
}

impl Version {
    /// Create a release version
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self {
            major,
            minor,
            patch,
            pre: Vec::new(),
        }
    }

    /// Parse a version string (`1.2.3`, `v1.2.3-rc.1`, `1.2.3+build.5`)
    pub fn parse(input: &str) -> Result<Self, VersionParseError> {
        let err = |reason: &'static str| VersionParseError {
            input: input.to_string(),
            reason,
        };

        let text = input.trim();
        let text = text.strip_prefix('v').unwrap_or(text);
        if text.is_empty() {
            return Err(err("empty version"));
        }

        // Build metadata never takes part in precedence
        let text = match text.split_once('+') {
            Some((head, build)) => {
                if build.is_empty() || build.split('.').any(|part| !is_identifier(part)) {
                    return Err(err("invalid build metadata"));
                }
                head
            }
            None => text,
        };

        let (core_part, pre_part) = match text.split_once('-') {
            Some((core_part, pre)) => (core_part, Some(pre)),
            None => (text, None),
        };

        let mut numbers = core_part.split('.');
        let major = parse_numeric(numbers.next()).ok_or_else(|| err("invalid major version"))?;
        let minor = parse_numeric(numbers.next()).ok_or_else(|| err("invalid minor version"))?;
        let patch = parse_numeric(numbers.next()).ok_or_else(|| err("invalid patch version"))?;
        if numbers.next().is_some() {
            return Err(err("expected exactly three numeric components"));
        }

        let mut pre = Vec::new();
        if let Some(pre_part) = pre_part {
            if pre_part.is_empty() {
                return Err(err("empty pre-release"));
            }
            for part in pre_part.split('.') {
                if !is_identifier(part) {
                    return Err(err("invalid pre-release identifier"));
                }
                if part.bytes().all(|b| b.is_ascii_digit()) {
                    let n = parse_numeric(Some(part))
                        .ok_or_else(|| err("numeric pre-release identifier has a leading zero"))?;
                    pre.push(Identifier::Numeric(n));
                } else {
                    pre.push(Identifier::Alpha(part.to_string()));
                }
            }
        }

        Ok(Self {
            major,
            minor,
            patch,
            pre,
        })
    }

}

fn parse_numeric(part: Option<&str>) -> Option<u64> {
    let part = part?;
    if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if part.len() > 1 && part.starts_with('0') {
        return None;
    }
    part.parse().ok()
}

fn is_identifier(part: &str) -> bool {
    !part.is_empty() && part.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'-')
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        self.major
            .cmp(&other.major)
            .then(self.minor.cmp(&other.minor))
            .then(self.patch.cmp(&other.patch))
            .then_with(|| match (self.pre.is_empty(), other.pre.is_empty()) {
                (true, true) => Ordering::Equal,
                // A pre-release precedes its release
                (true, false) => Ordering::Greater,
                (false, true) => Ordering::Less,
                (false, false) => self.pre.cmp(&other.pre),
            })
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)?;
        for (i, id) in self.pre.iter().enumerate() {
            f.write_str(if i == 0 { "-" } else { "." })?;
            write!(f, "{}", id)?;
        }
        Ok(())
    }
}

impl FromStr for Version {
    type Err = VersionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Error returned when a version string is malformed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionParseError {
    pub input: String,
    pub reason: &'static str,
}

impl fmt::Display for VersionParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid version '{}': {}", self.input, self.reason)
    }
}

impl std::error::Error for VersionParseError {}
