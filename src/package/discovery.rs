use anyhow::Result;
use log::debug;
use std::path::PathBuf;

use super::model::Package;
use super::repository::FilesystemRepository;
use super::request::PackageRequest;
use crate::runtime::Runtime;

/// Find every package matching `request` across the search paths, in search-path order.
///
/// Search paths that do not exist are skipped.
#[tracing::instrument(skip(runtime, paths))]
pub fn find_packages<R: Runtime>(
    runtime: &R,
    paths: &[PathBuf],
    request: &PackageRequest,
) -> Result<Vec<Package>> {
    let mut found = Vec::new();

    for path in paths {
        if !runtime.is_dir(path) {
            debug!("Skipping missing search path {:?}", path);
            continue;
        }

        let repo = FilesystemRepository::new(runtime, runtime.canonicalize(path)?);
        let matches = repo
            .iter_packages(&request.name)?
            .into_iter()
            .filter(|p| request.range.contains(p.version()));
        found.extend(matches);
    }

    debug!("Found {} package(s) matching {}", found.len(), request);
    Ok(found)
}
