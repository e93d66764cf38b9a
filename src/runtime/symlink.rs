//! Symlink operations (create, read, remove).

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use super::RealRuntime;

impl RealRuntime {
    #[tracing::instrument(skip(self))]
    pub(crate) fn symlink_impl(&self, original: &Path, link: &Path) -> Result<()> {
        #[cfg(unix)]
        {
            use std::os::unix::fs::symlink as unix_symlink;
            unix_symlink(original, link)
                .with_context(|| format!("Failed to create symlink {:?} -> {:?}", link, original))?;
        }
        #[cfg(windows)]
        {
            use std::os::windows::fs::{symlink_dir, symlink_file};

            // Payload links point at directories unless the resolved target is a file
            let resolved = match link.parent() {
                Some(parent) if original.is_relative() => parent.join(original),
                _ => original.to_path_buf(),
            };
            let created = if resolved.is_file() {
                symlink_file(original, link)
            } else {
                symlink_dir(original, link)
            };
            created
                .with_context(|| format!("Failed to create symlink {:?} -> {:?}", link, original))?;
        }
        Ok(())
    }

    #[tracing::instrument(skip(self))]
    pub(crate) fn read_link_impl(&self, path: &Path) -> Result<PathBuf> {
        fs::read_link(path).with_context(|| format!("Failed to read symlink {:?}", path))
    }

    #[tracing::instrument(skip(self))]
    pub(crate) fn is_symlink_impl(&self, path: &Path) -> bool {
        fs::symlink_metadata(path)
            .map(|m| m.file_type().is_symlink())
            .unwrap_or(false)
    }

    #[tracing::instrument(skip(self))]
    pub(crate) fn remove_symlink_impl(&self, path: &Path) -> Result<()> {
        #[cfg(unix)]
        {
            fs::remove_file(path).with_context(|| format!("Failed to remove symlink {:?}", path))?;
        }
        #[cfg(windows)]
        {
            // Directory symlinks need remove_dir, file symlinks remove_file.
            fs::remove_dir(path)
                .or_else(|_| fs::remove_file(path))
                .with_context(|| format!("Failed to remove symlink {:?}", path))?;
        }
        Ok(())
    }

    #[tracing::instrument(skip(self))]
    pub(crate) fn canonicalize_impl(&self, path: &Path) -> Result<PathBuf> {
        fs::canonicalize(path).with_context(|| format!("Failed to canonicalize {:?}", path))
    }
}

#[cfg(test)]
mod tests {
    use crate::runtime::{RealRuntime, Runtime};
    use tempfile::tempdir;

    #[cfg_attr(
        pkgcopy_skip_cross_windows_tests,
        ignore = "cross windows tests disabled; set PKGCOPY_RUN_CROSS_WINDOWS_TESTS=1 to enable"
    )]
    #[test]
    fn test_real_runtime_dir_symlink() {
        let runtime = RealRuntime;
        let dir = tempdir().unwrap();
        let target = dir.path().join("target");
        let link = dir.path().join("link");
        runtime.create_dir_all(&target).unwrap();

        runtime.symlink(&target, &link).unwrap();
        assert!(runtime.exists(&link));
        assert!(runtime.is_symlink(&link));
        assert!(!runtime.is_symlink(&target));
        assert_eq!(runtime.read_link(&link).unwrap(), target);

        runtime.remove_symlink(&link).unwrap();
        assert!(!runtime.exists(&link));
        assert!(runtime.exists(&target));
    }

    #[cfg_attr(
        pkgcopy_skip_cross_windows_tests,
        ignore = "cross windows tests disabled; set PKGCOPY_RUN_CROSS_WINDOWS_TESTS=1 to enable"
    )]
    #[test]
    fn test_real_runtime_file_symlink() {
        let runtime = RealRuntime;
        let dir = tempdir().unwrap();
        let target_file = dir.path().join("target.txt");
        let link = dir.path().join("link.txt");
        runtime.write(&target_file, b"hello").unwrap();

        runtime.symlink(&target_file, &link).unwrap();
        assert_eq!(runtime.read_to_string(&link).unwrap(), "hello");

        runtime.remove_symlink(&link).unwrap();
        assert!(!runtime.exists(&link));
        assert!(runtime.exists(&target_file));
    }

    #[cfg_attr(
        pkgcopy_skip_cross_windows_tests,
        ignore = "cross windows tests disabled; set PKGCOPY_RUN_CROSS_WINDOWS_TESTS=1 to enable"
    )]
    #[test]
    fn test_is_symlink_sees_dangling_links() {
        let runtime = RealRuntime;
        let dir = tempdir().unwrap();
        let link = dir.path().join("dangling");

        runtime.symlink(&dir.path().join("gone"), &link).unwrap();
        assert!(runtime.is_symlink(&link));
        assert!(!runtime.exists(&link));
    }

    #[test]
    fn test_canonicalize_resolves_dot_components() {
        let runtime = RealRuntime;
        let dir = tempdir().unwrap();
        let nested = dir.path().join("a/b");
        runtime.create_dir_all(&nested).unwrap();

        let canonical = runtime.canonicalize(&nested.join("../b/.")).unwrap();
        assert_eq!(canonical, runtime.canonicalize(&nested).unwrap());
        assert!(runtime.canonicalize(&dir.path().join("missing")).is_err());
    }
}
