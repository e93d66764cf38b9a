//! Payload transfer strategies.
//!
//! [`RealTransfer`] moves a variant's payload into the destination and then
//! registers it in the destination package definition. [`SimulatedTransfer`]
//! performs no mutation and reports where the variant would have gone.

use anyhow::{Context, Result, bail};
use log::{debug, info};
use std::fmt;
use std::path::{Path, PathBuf};

use super::error::CopyError;
use crate::package::{PACKAGE_DEFINITION, Package, PackageRepository, Variant};
use crate::runtime::{Runtime, is_path_under};

/// Per-variant transfer policy, already adjusted by conflict resolution.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransferOptions {
    /// Symlink to the source payload instead of copying it
    pub shallow: bool,
    /// Give a newly created destination package the source timestamp
    pub keep_timestamp: bool,
}

/// Where a copied variant ended up.
#[derive(Debug, Clone, PartialEq)]
pub enum Destination {
    /// The variant as installed in the destination repository
    Created(Variant),
    /// Dry run: the payload path the variant would have been created at
    WouldCreate(PathBuf),
}

impl Destination {
    pub fn variant(&self) -> Option<&Variant> {
        match self {
            Destination::Created(variant) => Some(variant),
            Destination::WouldCreate(_) => None,
        }
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Destination::Created(variant) => f.write_str(&variant.uri),
            Destination::WouldCreate(path) => write!(f, "{}", path.display()),
        }
    }
}

pub trait Transfer {
    fn transfer(
        &self,
        source: &Package,
        variant: &Variant,
        dest: &dyn PackageRepository,
        options: TransferOptions,
    ) -> Result<Destination, CopyError>;
}

/// Dry-run strategy: computes the target, touches nothing.
pub struct SimulatedTransfer;

impl Transfer for SimulatedTransfer {
    fn transfer(
        &self,
        _source: &Package,
        variant: &Variant,
        dest: &dyn PackageRepository,
        _options: TransferOptions,
    ) -> Result<Destination, CopyError> {
        Ok(Destination::WouldCreate(dest.variant_payload_path(variant)))
    }
}

/// Copies (or links) payloads through a [`Runtime`].
pub struct RealTransfer<'a, R: Runtime> {
    runtime: &'a R,
}

impl<'a, R: Runtime> RealTransfer<'a, R> {
    pub fn new(runtime: &'a R) -> Self {
        Self { runtime }
    }

    fn copy_payload(&self, variant: &Variant, dest_path: &Path, shallow: bool) -> Result<()> {
        let src_root = variant.payload_root();
        if !self.runtime.is_dir(src_root) {
            bail!("Payload of {} is missing: {:?}", variant.uri, src_root);
        }
        if is_path_under(dest_path, src_root) || is_path_under(src_root, dest_path) {
            bail!(
                "Destination {:?} overlaps the source payload {:?}",
                dest_path,
                src_root
            );
        }

        if variant.subpath().is_some() {
            if let Some(parent) = dest_path.parent() {
                self.runtime.create_dir_all(parent)?;
            }
            self.remove_existing(dest_path)?;
            if shallow {
                debug!("Linking {:?} -> {:?}", dest_path, src_root);
                self.runtime.symlink(src_root, dest_path)?;
            } else {
                self.copy_tree(src_root, dest_path)?;
            }
            return Ok(());
        }

        // The whole-package payload shares its directory with the package
        // definition, so entries are handled one by one.
        self.runtime.create_dir_all(dest_path)?;
        for stale in self.runtime.read_dir(dest_path)? {
            if stale.file_name().is_some_and(|name| name != PACKAGE_DEFINITION) {
                self.remove_existing(&stale)?;
            }
        }

        for entry in self.runtime.read_dir(src_root)? {
            let Some(name) = entry.file_name() else {
                continue;
            };
            if name == PACKAGE_DEFINITION {
                continue;
            }

            let target = dest_path.join(name);
            if self.runtime.is_symlink(&entry) {
                self.copy_link(&entry, &target)?;
            } else if shallow {
                debug!("Linking {:?} -> {:?}", target, entry);
                self.runtime.symlink(&entry, &target)?;
            } else if self.runtime.is_dir(&entry) {
                self.copy_tree(&entry, &target)?;
            } else {
                self.runtime.copy(&entry, &target)?;
            }
        }
        Ok(())
    }

    /// Recursively copy `src` to `dest`; symlinks are recreated, not followed.
    fn copy_tree(&self, src: &Path, dest: &Path) -> Result<()> {
        self.runtime.create_dir_all(dest)?;

        for entry in self.runtime.read_dir(src)? {
            let Some(name) = entry.file_name() else {
                continue;
            };
            let target = dest.join(name);

            if self.runtime.is_symlink(&entry) {
                self.copy_link(&entry, &target)?;
            } else if self.runtime.is_dir(&entry) {
                self.copy_tree(&entry, &target)?;
            } else {
                self.runtime.copy(&entry, &target)?;
            }
        }

        // Applied last so read-only directories can still be filled
        let mode = self.runtime.mode(src)?;
        self.runtime.set_permissions(dest, mode)?;
        Ok(())
    }

    fn copy_link(&self, link: &Path, dest: &Path) -> Result<()> {
        let target = self.runtime.read_link(link)?;
        self.runtime.symlink(&target, dest)
    }

    fn remove_existing(&self, path: &Path) -> Result<()> {
        if self.runtime.is_symlink(path) {
            debug!("Replacing symlink {:?}", path);
            self.runtime.remove_symlink(path)
        } else if self.runtime.is_dir(path) {
            debug!("Replacing directory {:?}", path);
            self.runtime.remove_dir_all(path)
        } else if self.runtime.exists(path) {
            debug!("Replacing file {:?}", path);
            self.runtime.remove_file(path)
        } else {
            Ok(())
        }
    }
}

impl<R: Runtime> Transfer for RealTransfer<'_, R> {
    #[tracing::instrument(skip_all, fields(variant = %variant.uri))]
    fn transfer(
        &self,
        source: &Package,
        variant: &Variant,
        dest: &dyn PackageRepository,
        options: TransferOptions,
    ) -> Result<Destination, CopyError> {
        let dest_path = dest.variant_payload_path(variant);
        info!(
            "{} {} to {:?}",
            if options.shallow { "Linking" } else { "Copying" },
            variant.uri,
            dest_path
        );

        self.copy_payload(variant, &dest_path, options.shallow)
            .with_context(|| format!("Failed to transfer payload of {}", variant.uri))
            .map_err(|e| CopyError::repository(dest.location(), e))?;

        let installed = dest
            .install_variant(source, variant, options.keep_timestamp)
            .map_err(|e| CopyError::repository(dest.location(), e))?;

        Ok(Destination::Created(installed))
    }
}
