//! File system operations (read, write, directory, permissions).

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use super::RealRuntime;

impl RealRuntime {
    #[tracing::instrument(skip(self, contents))]
    pub(crate) fn write_impl(&self, path: &Path, contents: &[u8]) -> Result<()> {
        fs::write(path, contents).with_context(|| format!("Failed to write to {:?}", path))?;
        Ok(())
    }

    #[tracing::instrument(skip(self))]
    pub(crate) fn read_to_string_impl(&self, path: &Path) -> Result<String> {
        fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))
    }

    #[tracing::instrument(skip(self))]
    pub(crate) fn copy_impl(&self, from: &Path, to: &Path) -> Result<u64> {
        fs::copy(from, to).with_context(|| format!("Failed to copy {:?} to {:?}", from, to))
    }

    #[tracing::instrument(skip(self))]
    pub(crate) fn create_dir_all_impl(&self, path: &Path) -> Result<()> {
        fs::create_dir_all(path)
            .with_context(|| format!("Failed to create directory {:?}", path))?;
        Ok(())
    }

    #[tracing::instrument(skip(self))]
    pub(crate) fn remove_file_impl(&self, path: &Path) -> Result<()> {
        fs::remove_file(path).with_context(|| format!("Failed to remove file {:?}", path))?;
        Ok(())
    }

    #[tracing::instrument(skip(self))]
    pub(crate) fn remove_dir_all_impl(&self, path: &Path) -> Result<()> {
        fs::remove_dir_all(path)
            .with_context(|| format!("Failed to remove directory {:?} and its contents", path))?;
        Ok(())
    }

    #[tracing::instrument(skip(self))]
    pub(crate) fn exists_impl(&self, path: &Path) -> bool {
        path.exists()
    }

    #[tracing::instrument(skip(self))]
    pub(crate) fn is_dir_impl(&self, path: &Path) -> bool {
        path.is_dir()
    }

    #[tracing::instrument(skip(self))]
    pub(crate) fn read_dir_impl(&self, path: &Path) -> Result<Vec<PathBuf>> {
        let entries =
            fs::read_dir(path).with_context(|| format!("Failed to read directory {:?}", path))?;
        let mut paths = entries
            .map(|entry| Ok(entry?.path()))
            .collect::<Result<Vec<_>>>()?;
        paths.sort();
        Ok(paths)
    }

    #[tracing::instrument(skip(self))]
    pub(crate) fn mode_impl(&self, path: &Path) -> Result<u32> {
        let metadata =
            fs::metadata(path).with_context(|| format!("Failed to stat {:?}", path))?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            Ok(metadata.permissions().mode() & 0o7777)
        }
        #[cfg(not(unix))]
        {
            Ok(if metadata.permissions().readonly() {
                0o555
            } else {
                0o755
            })
        }
    }

    #[tracing::instrument(skip(self))]
    pub(crate) fn set_permissions_impl(&self, path: &Path, mode: u32) -> Result<()> {
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let permissions = fs::Permissions::from_mode(mode);
            fs::set_permissions(path, permissions)
                .with_context(|| format!("Failed to set permissions on {:?}", path))?;
        }
        #[cfg(not(unix))]
        {
            let _ = (path, mode); // Suppress unused warnings on non-Unix
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::runtime::{RealRuntime, Runtime};
    use tempfile::tempdir;

    #[test]
    fn test_real_runtime_file_ops() {
        let runtime = RealRuntime;
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("test.txt");

        runtime.write(&file_path, b"hello").unwrap();
        assert!(runtime.exists(&file_path));
        assert_eq!(runtime.read_to_string(&file_path).unwrap(), "hello");

        let copy_path = dir.path().join("copy.txt");
        assert_eq!(runtime.copy(&file_path, &copy_path).unwrap(), 5);
        assert_eq!(runtime.read_to_string(&copy_path).unwrap(), "hello");

        runtime.remove_file(&file_path).unwrap();
        assert!(!runtime.exists(&file_path));
        assert!(runtime.exists(&copy_path));
    }

    #[test]
    fn test_real_runtime_dir_ops() {
        let runtime = RealRuntime;
        let dir = tempdir().unwrap();
        let sub_dir = dir.path().join("sub/nested");

        runtime.create_dir_all(&sub_dir).unwrap();
        assert!(runtime.is_dir(&sub_dir));

        let parent = dir.path().join("sub");
        runtime.write(&parent.join("a.txt"), b"a").unwrap();
        let entries = runtime.read_dir(&parent).unwrap();
        assert_eq!(entries, vec![parent.join("a.txt"), sub_dir.clone()]);

        runtime.remove_dir_all(&parent).unwrap();
        assert!(!runtime.exists(&parent));
    }

    #[cfg(unix)]
    #[test]
    fn test_real_runtime_permissions_roundtrip() {
        let runtime = RealRuntime;
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("tool");
        runtime.write(&file_path, b"#!/bin/sh\n").unwrap();

        runtime.set_permissions(&file_path, 0o750).unwrap();
        assert_eq!(runtime.mode(&file_path).unwrap(), 0o750);

        // copy carries the permission bits along
        let copy_path = dir.path().join("tool-copy");
        runtime.copy(&file_path, &copy_path).unwrap();
        assert_eq!(runtime.mode(&copy_path).unwrap(), 0o750);
    }

    #[test]
    fn test_real_runtime_errors() {
        let runtime = RealRuntime;
        let dir = tempdir().unwrap();
        let missing = dir.path().join("missing");

        assert!(runtime.read_to_string(&missing).is_err());
        assert!(runtime.remove_file(&missing).is_err());
        assert!(runtime.read_dir(&missing).is_err());
        assert!(runtime.mode(&missing).is_err());
        assert!(runtime.copy(&missing, &dir.path().join("other")).is_err());
    }
}
