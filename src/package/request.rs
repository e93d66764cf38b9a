//! Package requests (`name`, `name-1.2`, `name-1.2+`, `name==1.2`).

use anyhow::{Result, bail};
use std::fmt;
use std::str::FromStr;

use super::version::VersionRange;

/// A package name plus the range of versions it accepts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageRequest {
    pub name: String,
    pub range: VersionRange,
}

impl PackageRequest {
    pub fn is_valid_name(name: &str) -> bool {
        !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
    }
}

impl FromStr for PackageRequest {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let (name, range) = if let Some(pos) = s.find("==") {
            (&s[..pos], &s[pos..])
        } else if let Some((name, range)) = s.split_once('-') {
            if range.is_empty() {
                bail!("Invalid package request '{}': missing version after '-'", s);
            }
            (name, range)
        } else {
            (s, "")
        };

        if !Self::is_valid_name(name) {
            bail!("Invalid package request '{}': bad package name '{}'", s, name);
        }

        let range = range
            .parse::<VersionRange>()
            .map_err(|e| anyhow::anyhow!("Invalid package request '{}': {}", s, e))?;

        Ok(PackageRequest {
            name: name.to_string(),
            range,
        })
    }
}

impl fmt::Display for PackageRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.range {
            VersionRange::Any => write!(f, "{}", self.name),
            VersionRange::Exact(_) => write!(f, "{}{}", self.name, self.range),
            range => write!(f, "{}-{}", self.name, range),
        }
    }
}
