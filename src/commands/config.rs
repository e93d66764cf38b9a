use anyhow::{Context, Result, bail};
use log::debug;
use std::path::PathBuf;

use crate::runtime::{Runtime, normalize_path};

/// Search path list, in the platform's path-list syntax
pub const PACKAGES_PATH_ENV: &str = "PKGCOPY_PACKAGES_PATH";
/// The local packages repository
pub const LOCAL_PACKAGES_PATH_ENV: &str = "PKGCOPY_LOCAL_PACKAGES_PATH";
/// Relocatability assumed for packages that don't declare it
pub const DEFAULT_RELOCATABLE_ENV: &str = "PKGCOPY_DEFAULT_RELOCATABLE";

/// Settings that steer package resolution and the relocatability check.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub packages_path: Vec<PathBuf>,
    pub local_packages_path: PathBuf,
    pub default_relocatable: bool,
}

impl Config {
    /// Read the configuration from the environment.
    #[tracing::instrument(skip(runtime))]
    pub fn load<R: Runtime>(runtime: &R) -> Result<Self> {
        let local_packages_path = match runtime.env_var(LOCAL_PACKAGES_PATH_ENV) {
            Ok(path) if !path.is_empty() => PathBuf::from(path),
            _ => runtime
                .home_dir()
                .context("Could not find home directory")?
                .join("packages"),
        };

        let packages_path = match runtime.env_var(PACKAGES_PATH_ENV) {
            Ok(value) => split_path_list(&value),
            Err(_) => vec![local_packages_path.clone()],
        };

        let default_relocatable = match runtime.env_var(DEFAULT_RELOCATABLE_ENV) {
            Ok(value) => parse_bool(&value)
                .with_context(|| format!("Invalid value for {}", DEFAULT_RELOCATABLE_ENV))?,
            Err(_) => true,
        };

        let config = Self {
            packages_path,
            local_packages_path,
            default_relocatable,
        };
        debug!("Loaded config: {:?}", config);
        Ok(config)
    }

    /// The search paths without the local packages path.
    pub fn nonlocal_packages_path(&self) -> Vec<PathBuf> {
        let local = normalize_path(&self.local_packages_path);
        self.packages_path
            .iter()
            .filter(|path| normalize_path(path) != local)
            .cloned()
            .collect()
    }

    /// Paths to search for the source package.
    ///
    /// An explicit path list wins over `no_local`.
    pub fn search_paths(&self, paths: Option<&str>, no_local: bool) -> Vec<PathBuf> {
        match paths {
            Some(paths) => split_path_list(paths),
            None if no_local => self.nonlocal_packages_path(),
            None => self.packages_path.clone(),
        }
    }
}

/// Split an OS path list, dropping empty entries.
pub fn split_path_list(value: &str) -> Vec<PathBuf> {
    std::env::split_paths(value)
        .filter(|path| !path.as_os_str().is_empty())
        .collect()
}

fn parse_bool(value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Ok(true),
        "0" | "false" | "no" => Ok(false),
        other => bail!("Expected true/false, got '{}'", other),
    }
}
