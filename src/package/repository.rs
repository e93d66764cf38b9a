//! Package repositories.
//!
//! [`PackageRepository`] is the capability interface the copy engine works
//! against. [`FilesystemRepository`] implements it on top of a [`Runtime`]
//! with the layout:
//!
//! ```text
//! <root>/<name>/<version>/package.json
//! <root>/<name>/<version>/<variant requires...>/   # variant payload
//! ```

use anyhow::{Context, Result, bail};
use log::{debug, warn};
use std::path::{Path, PathBuf};

use super::meta::{PACKAGE_DEFINITION, PackageMeta};
use super::model::{Package, Variant};
use super::version::Version;
use crate::runtime::Runtime;

/// Directory name used for a package without a version
pub const NO_VERSION_DIR: &str = "_NO_VERSION";

/// Location scheme of filesystem repositories (`filesystem@/path`)
pub const FILESYSTEM_SCHEME: &str = "filesystem";

/// Storage capabilities the copy engine needs from a repository.
#[cfg_attr(test, mockall::automock)]
pub trait PackageRepository {
    /// Location string identifying this repository.
    fn location(&self) -> &str;

    /// Directory holding the payload of `name` at `version`.
    fn package_payload_path(&self, name: &str, version: &Version) -> PathBuf;

    /// Where `variant` (typically from another repository) would live in this one.
    fn variant_payload_path(&self, variant: &Variant) -> PathBuf;

    fn get_package(&self, name: &str, version: &Version) -> Result<Option<Package>>;

    /// Find the variant in this repository matching `variant`'s package and definition.
    fn get_equivalent_variant(&self, variant: &Variant) -> Result<Option<Variant>>;

    /// Register `variant` of `source` in this repository's package definition.
    ///
    /// A new package takes `source`'s definition and, with `keep_timestamp`, its
    /// timestamp. An existing package keeps its own definition and timestamp and
    /// only gains the variant.
    fn install_variant(
        &self,
        source: &Package,
        variant: &Variant,
        keep_timestamp: bool,
    ) -> Result<Variant>;
}

/// Resolve a location string (`/path` or `filesystem@/path`) to a repository handle.
#[tracing::instrument(skip(runtime))]
pub fn open_repository<'a, R: Runtime>(
    runtime: &'a R,
    location: &str,
) -> Result<Box<dyn PackageRepository + 'a>> {
    let path = match location.split_once('@') {
        Some((FILESYSTEM_SCHEME, path)) => path,
        Some((scheme, _)) => bail!(
            "Unsupported repository type '{}' in location '{}'",
            scheme,
            location
        ),
        None => location,
    };

    if path.is_empty() {
        bail!("Empty repository location");
    }

    Ok(Box::new(FilesystemRepository::open(runtime, Path::new(path))?))
}

/// Repository stored as plain directories on a local filesystem.
pub struct FilesystemRepository<'a, R: Runtime> {
    runtime: &'a R,
    root: PathBuf,
    location: String,
}

impl<'a, R: Runtime> FilesystemRepository<'a, R> {
    /// Open the existing repository directory at `path`.
    #[tracing::instrument(skip(runtime))]
    pub fn open(runtime: &'a R, path: &Path) -> Result<Self> {
        if !runtime.is_dir(path) {
            bail!("Repository does not exist: {}", path.display());
        }

        let root = runtime
            .canonicalize(path)
            .with_context(|| format!("Failed to resolve repository {:?}", path))?;
        debug!("Opened repository at {:?}", root);

        Ok(Self::new(runtime, root))
    }

    /// Create a repository handle for an already-resolved root directory.
    pub fn new(runtime: &'a R, root: PathBuf) -> Self {
        let location = format!("{}@{}", FILESYSTEM_SCHEME, root.display());
        Self {
            runtime,
            root,
            location,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns: `<root>/<name>`
    pub fn family_dir(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    /// Returns: `<root>/<name>/<version>`
    pub fn version_dir(&self, name: &str, version: &Version) -> PathBuf {
        let dir = if version.is_empty() {
            NO_VERSION_DIR
        } else {
            version.as_str()
        };
        self.family_dir(name).join(dir)
    }

    /// Returns: `<root>/<name>/<version>/package.json`
    pub fn definition_path(&self, name: &str, version: &Version) -> PathBuf {
        self.version_dir(name, version).join(PACKAGE_DEFINITION)
    }

    fn package_from_meta(&self, meta: PackageMeta) -> Package {
        let base = self.version_dir(&meta.name, &meta.version);
        let uri = base.join(PACKAGE_DEFINITION).display().to_string();
        Package {
            meta,
            uri,
            base,
            repository: self.location.clone(),
        }
    }

    /// All versions of `name` in this repository, oldest first.
    ///
    /// Version directories that fail to parse or load are logged and skipped.
    #[tracing::instrument(skip(self))]
    pub fn iter_packages(&self, name: &str) -> Result<Vec<Package>> {
        let family_dir = self.family_dir(name);
        if !self.runtime.is_dir(&family_dir) {
            return Ok(vec![]);
        }

        let mut packages = Vec::new();
        for entry in self.runtime.read_dir(&family_dir)? {
            if !self.runtime.is_dir(&entry) {
                continue;
            }
            let Some(dir_name) = entry.file_name().and_then(|n| n.to_str()) else {
                continue;
            };

            let version = if dir_name == NO_VERSION_DIR {
                Version::default()
            } else {
                match dir_name.parse::<Version>() {
                    Ok(v) => v,
                    Err(e) => {
                        debug!("Skipping {:?}: {}", entry, e);
                        continue;
                    }
                }
            };

            match self.get_package(name, &version) {
                Ok(Some(package)) => packages.push(package),
                Ok(None) => debug!("No package definition in {:?}", entry),
                Err(e) => warn!("Failed to load package from {:?}: {:#}", entry, e),
            }
        }

        packages.sort_by(|a, b| a.version().cmp(b.version()));
        Ok(packages)
    }

    fn save(&self, meta: &PackageMeta) -> Result<()> {
        let dir = self.version_dir(&meta.name, &meta.version);
        if !self.runtime.exists(&dir) {
            self.runtime.create_dir_all(&dir)?;
        }
        meta.save(self.runtime, &dir.join(PACKAGE_DEFINITION))
    }
}

impl<R: Runtime> PackageRepository for FilesystemRepository<'_, R> {
    fn location(&self) -> &str {
        &self.location
    }

    fn package_payload_path(&self, name: &str, version: &Version) -> PathBuf {
        self.version_dir(name, version)
    }

    fn variant_payload_path(&self, variant: &Variant) -> PathBuf {
        let base = self.package_payload_path(&variant.parent.name, &variant.parent.version);
        match variant.subpath() {
            Some(subpath) => base.join(subpath),
            None => base,
        }
    }

    fn get_package(&self, name: &str, version: &Version) -> Result<Option<Package>> {
        let path = self.definition_path(name, version);
        if !self.runtime.exists(&path) {
            return Ok(None);
        }

        let meta = PackageMeta::load(self.runtime, &path)?;
        if meta.name != name || &meta.version != version {
            bail!(
                "Package definition {:?} describes {}-{}, expected {}-{}",
                path,
                meta.name,
                meta.version,
                name,
                version
            );
        }
        Ok(Some(self.package_from_meta(meta)))
    }

    fn get_equivalent_variant(&self, variant: &Variant) -> Result<Option<Variant>> {
        let Some(package) = self.get_package(&variant.parent.name, &variant.parent.version)?
        else {
            return Ok(None);
        };

        let found = match variant.index {
            None if package.num_variants() == 0 => Some(package.whole_package()),
            None => None,
            Some(_) => package
                .variants()
                .into_iter()
                .find(|v| v.requires == variant.requires),
        };
        Ok(found)
    }

    #[tracing::instrument(skip(self, source, variant), fields(variant = %variant.uri))]
    fn install_variant(
        &self,
        source: &Package,
        variant: &Variant,
        keep_timestamp: bool,
    ) -> Result<Variant> {
        let meta = match self.get_package(source.name(), source.version())? {
            Some(existing) => {
                let mut meta = existing.meta;
                match (variant.index, meta.variants.is_empty()) {
                    (None, true) => {}
                    (Some(_), false) => {
                        if !meta.variants.contains(&variant.requires) {
                            meta.variants.push(variant.requires.clone());
                        }
                    }
                    (None, false) => bail!(
                        "Cannot copy {} without variants into {}, which has variants",
                        source.qualified_name(),
                        self.location
                    ),
                    (Some(_), true) => bail!(
                        "Cannot copy a variant of {} into {}, which has no variants",
                        source.qualified_name(),
                        self.location
                    ),
                }
                meta
            }
            None => {
                let mut meta = source.meta.clone();
                meta.variants = match variant.index {
                    Some(_) => vec![variant.requires.clone()],
                    None => vec![],
                };
                meta.timestamp = match (keep_timestamp, source.timestamp()) {
                    (true, Some(ts)) => Some(ts),
                    _ => Some(chrono::Utc::now().timestamp()),
                };
                meta
            }
        };

        self.save(&meta)?;

        let package = self.package_from_meta(meta);
        let installed = match variant.index {
            None => Some(package.whole_package()),
            Some(_) => package
                .variants()
                .into_iter()
                .find(|v| v.requires == variant.requires),
        };
        installed.with_context(|| {
            format!(
                "Variant {} missing from {} after install",
                variant.uri, package.uri
            )
        })
    }
}
