//! Package versions and version ranges.
//!
//! A version is a sequence of tokens separated by `.` or `-`. Numeric tokens
//! compare numerically, alphanumeric tokens compare lexically and sort below
//! numeric ones, and a version sorts before any longer version it prefixes
//! (`1.2 < 1.2.0 < 1.2.1 < 1.10`). The empty version is valid and sorts first.

use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
enum Token {
    Alpha(String),
    Numeric(u64),
}

impl Token {
    fn parse(s: &str) -> Token {
        match s.parse::<u64>() {
            Ok(n) => Token::Numeric(n),
            Err(_) => Token::Alpha(s.to_string()),
        }
    }
}

/// An ordered package version.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Version {
    raw: String,
    tokens: Vec<Token>,
}

impl Version {
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// True when `prefix`'s tokens are a leading run of this version's tokens.
    pub fn starts_with(&self, prefix: &Version) -> bool {
        self.tokens.starts_with(&prefix.tokens)
    }
}

impl FromStr for Version {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        if s.is_empty() {
            return Ok(Version::default());
        }

        let mut tokens = Vec::new();
        for part in s.split(['.', '-']) {
            if part.is_empty() {
                bail!("Invalid version '{}': empty token", s);
            }
            if !part.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
                bail!("Invalid version '{}': bad token '{}'", s, part);
            }
            tokens.push(Token::parse(part));
        }

        Ok(Version {
            raw: s.to_string(),
            tokens,
        })
    }
}

impl TryFrom<String> for Version {
    type Error = anyhow::Error;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<Version> for String {
    fn from(v: Version) -> Self {
        v.raw
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        // Fall back to the raw text so `1.0` and `1-0` stay distinct
        self.tokens
            .cmp(&other.tokens)
            .then_with(|| self.raw.cmp(&other.raw))
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Range of versions a package request accepts.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum VersionRange {
    /// Any version
    #[default]
    Any,
    /// The version and everything below it (`1.2` matches `1.2` and `1.2.3`)
    Prefix(Version),
    /// This version or newer (`1.2+`)
    AtLeast(Version),
    /// Exactly this version (`==1.2`)
    Exact(Version),
}

impl VersionRange {
    pub fn contains(&self, version: &Version) -> bool {
        match self {
            VersionRange::Any => true,
            VersionRange::Prefix(prefix) => version.starts_with(prefix),
            VersionRange::AtLeast(min) => version >= min,
            VersionRange::Exact(exact) => version == exact,
        }
    }
}

impl FromStr for VersionRange {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        if s.is_empty() {
            return Ok(VersionRange::Any);
        }
        if let Some(exact) = s.strip_prefix("==") {
            return Ok(VersionRange::Exact(exact.parse()?));
        }
        if let Some(min) = s.strip_suffix('+') {
            return Ok(VersionRange::AtLeast(min.parse()?));
        }
        Ok(VersionRange::Prefix(s.parse()?))
    }
}

impl fmt::Display for VersionRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VersionRange::Any => Ok(()),
            VersionRange::Prefix(v) => write!(f, "{}", v),
            VersionRange::AtLeast(v) => write!(f, "{}+", v),
            VersionRange::Exact(v) => write!(f, "=={}", v),
        }
    }
}
