use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use super::version::Version;
use crate::runtime::Runtime;

/// File name of the package definition inside a version directory
pub const PACKAGE_DEFINITION: &str = "package.json";

/// Package definition stored as `package.json` in each version directory
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct PackageMeta {
    pub name: String,
    #[serde(default)]
    pub version: Version,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub requires: Vec<String>,
    /// One requirement list per variant; each list also names the variant's payload subpath
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub variants: Vec<Vec<String>>,
    /// Creation time in seconds since the Unix epoch
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
    /// `None` defers to the configured default
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relocatable: Option<bool>,
    /// Attributes this tool does not interpret; carried over verbatim on copy
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl PackageMeta {
    #[tracing::instrument(skip(runtime))]
    pub fn load<R: Runtime>(runtime: &R, path: &Path) -> Result<Self> {
        let content = runtime.read_to_string(path)?;
        let meta: PackageMeta = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse package definition {:?}", path))?;
        meta.validate()
            .with_context(|| format!("Invalid package definition {:?}", path))?;
        Ok(meta)
    }

    pub fn save<R: Runtime>(&self, runtime: &R, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        runtime
            .write(path, content.as_bytes())
            .with_context(|| format!("Failed to save package definition to {:?}", path))
    }

    /// Reject definitions whose variant requirement lists cannot name a payload directory.
    pub fn validate(&self) -> Result<()> {
        for (index, requires) in self.variants.iter().enumerate() {
            if requires.is_empty() {
                bail!("variant {} of {} has no requirements", index, self.name);
            }
            for req in requires {
                if req.is_empty()
                    || req == "."
                    || req == ".."
                    || req.contains(['/', '\\'])
                {
                    bail!(
                        "variant {} of {} has a requirement unusable as a path: '{}'",
                        index,
                        self.name,
                        req
                    );
                }
            }
        }
        Ok(())
    }

    /// Payload subpath of a variant, relative to the version directory.
    pub fn variant_subpath(requires: &[String]) -> PathBuf {
        requires.iter().collect()
    }
}
