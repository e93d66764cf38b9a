//! Package model and storage.
//!
//! This module provides the package/variant model, versions and requests,
//! the on-disk package definition, and the repository abstraction packages
//! are read from and copied into.

mod discovery;
mod meta;
mod model;
mod repository;
mod request;
mod version;

pub use discovery::find_packages;
pub use meta::{PACKAGE_DEFINITION, PackageMeta};
pub use model::{Package, PackageId, Variant};
pub use repository::{
    FILESYSTEM_SCHEME, FilesystemRepository, NO_VERSION_DIR, PackageRepository, open_repository,
};
#[cfg(test)]
pub use repository::MockPackageRepository;
pub use request::PackageRequest;
pub use version::{Version, VersionRange};
