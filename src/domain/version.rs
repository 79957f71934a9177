use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;

use crate::error::{ReleaseError, Result};

const VERSION_PATTERN: &str = r"^(0|[1-9]\d*)\.(0|[1-9]\d*)\.(0|[1-9]\d*)(?:-((?:0|[1-9]\d*|\d*[a-zA-Z-][0-9a-zA-Z-]*)(?:\.(?:0|[1-9]\d*|\d*[a-zA-Z-][0-9a-zA-Z-]*))*))?$";

fn version_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(VERSION_PATTERN).expect("version pattern is a valid regex"))
}

/// Semantic version `MAJOR.MINOR.PATCH[-PRERELEASE]`
///
/// Values are immutable: every `next_*` operation returns a new version.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SemanticVersion {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
    pub pre_release: Option<String>,
}

impl SemanticVersion {
    /// Create a release version without a pre-release suffix
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        SemanticVersion {
            major,
            minor,
            patch,
            pre_release: None,
        }
    }

    /// The `0.0.0` baseline used when a repository has no version tags
    pub fn zero() -> Self {
        SemanticVersion::new(0, 0, 0)
    }

    /// Return a copy carrying the given pre-release suffix
    pub fn with_pre_release(&self, pre_release: impl Into<String>) -> Self {
        SemanticVersion {
            pre_release: Some(pre_release.into()),
            ..self.clone()
        }
    }

    /// Parse a version strictly.
    ///
    /// No `v` prefix, no leading zeros, no build metadata.
    pub fn parse(input: &str) -> Result<Self> {
        let caps = version_regex()
            .captures(input)
            .ok_or_else(|| ReleaseError::invalid_version(input))?;

        let number = |idx: usize| -> Result<u64> {
            caps[idx]
                .parse::<u64>()
                .map_err(|_| ReleaseError::invalid_version(input))
        };

        Ok(SemanticVersion {
            major: number(1)?,
            minor: number(2)?,
            patch: number(3)?,
            pre_release: caps.get(4).map(|m| m.as_str().to_string()),
        })
    }

    /// Parse a version found in a tag name, tolerating a `v`/`V` prefix
    pub fn parse_tag(tag: &str) -> Result<Self> {
        let trimmed = tag
            .strip_prefix('v')
            .or_else(|| tag.strip_prefix('V'))
            .unwrap_or(tag);
        SemanticVersion::parse(trimmed)
    }

    pub fn next_major(&self) -> Result<Self> {
        Ok(SemanticVersion::new(self.increment(self.major)?, 0, 0))
    }

    pub fn next_minor(&self) -> Result<Self> {
        Ok(SemanticVersion::new(self.major, self.increment(self.minor)?, 0))
    }

    pub fn next_patch(&self) -> Result<Self> {
        Ok(SemanticVersion::new(self.major, self.minor, self.increment(self.patch)?))
    }

    /// Next release candidate.
    ///
    /// A release moves to `<next patch>-rc.1`; `rc.N` moves to `rc.N+1`;
    /// any other pre-release restarts at `rc.1` on the same triple.
    pub fn next_release_candidate(&self) -> Result<Self> {
        match self.pre_release.as_deref() {
            None => Ok(self.next_patch()?.with_pre_release("rc.1")),
            Some(pre) => {
                let iteration = pre
                    .strip_prefix("rc.")
                    .and_then(|n| n.parse::<u64>().ok());
                match iteration {
                    Some(n) => Ok(self.with_pre_release(format!("rc.{}", self.increment(n)?))),
                    None => Ok(self.with_pre_release("rc.1")),
                }
            }
        }
    }

    /// Whether every `next_*` operation succeeds from this version
    pub fn can_advance(&self) -> bool {
        self.next_major().is_ok()
            && self.next_minor().is_ok()
            && self.next_patch().is_ok()
            && self.next_release_candidate().is_ok()
    }

    fn increment(&self, component: u64) -> Result<u64> {
        component
            .checked_add(1)
            .ok_or_else(|| ReleaseError::VersionOverflow(self.to_string()))
    }

    fn precedence_pre_release(&self) -> semver::Prerelease {
        self.pre_release
            .as_deref()
            .and_then(|pre| semver::Prerelease::new(pre).ok())
            .unwrap_or(semver::Prerelease::EMPTY)
    }
}

impl Ord for SemanticVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.major, self.minor, self.patch)
            .cmp(&(other.major, other.minor, other.patch))
            .then_with(|| {
                self.precedence_pre_release()
                    .cmp(&other.precedence_pre_release())
            })
    }
}

impl PartialOrd for SemanticVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl FromStr for SemanticVersion {
    type Err = ReleaseError;

    fn from_str(s: &str) -> Result<Self> {
        SemanticVersion::parse(s)
    }
}

impl fmt::Display for SemanticVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)?;
        if let Some(pre) = &self.pre_release {
            write!(f, "-{}", pre)?;
        }
        Ok(())
    }
}
