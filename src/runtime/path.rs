//! Lexical path helpers.

use std::path::{Component, Path, PathBuf};

/// Normalize a path by processing `.` and `..` components lexically.
/// This does not access the filesystem and does not follow symlinks.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut result = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                // Keep the `..` when there is nothing left to pop
                if !result.pop() {
                    result.push(component);
                }
            }
            _ => result.push(component),
        }
    }
    result
}

/// Check if `path` is `dir` or lies below it, comparing normalized components.
///
/// `/repo/foo/1.0/../../bar` is NOT under `/repo/foo`, while a plain string
/// prefix check would say it is.
pub fn is_path_under(path: &Path, dir: &Path) -> bool {
    let normalized_path = normalize_path(path);
    let normalized_dir = normalize_path(dir);

    let path_components: Vec<_> = normalized_path.components().collect();
    let dir_components: Vec<_> = normalized_dir.components().collect();

    if path_components.len() < dir_components.len() {
        return false;
    }

    dir_components
        .iter()
        .zip(path_components.iter())
        .all(|(d, p)| d == p)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_path_simple() {
        assert_eq!(
            normalize_path(Path::new("/repo/foo/1.0")),
            PathBuf::from("/repo/foo/1.0")
        );
    }

    #[test]
    fn test_normalize_path_mixed_components() {
        assert_eq!(
            normalize_path(Path::new("/repo/./foo/../bar/./1.0")),
            PathBuf::from("/repo/bar/1.0")
        );
    }

    #[test]
    fn test_normalize_path_relative_keeps_leading_parent() {
        assert_eq!(
            normalize_path(Path::new("../foo/bar/../baz")),
            PathBuf::from("../foo/baz")
        );
    }

    #[test]
    fn test_normalize_path_only_dots() {
        assert_eq!(normalize_path(Path::new("./././.")), PathBuf::from(""));
    }

    #[test]
    fn test_is_path_under_direct_child() {
        assert!(is_path_under(
            Path::new("/repo/foo/1.0/python-3"),
            Path::new("/repo/foo/1.0")
        ));
    }

    #[test]
    fn test_is_path_under_same_path() {
        assert!(is_path_under(Path::new("/repo/foo"), Path::new("/repo/foo")));
    }

    #[test]
    fn test_is_path_under_sibling_with_common_prefix() {
        // Component comparison, not string prefix
        assert!(!is_path_under(
            Path::new("/repo/foobar/1.0"),
            Path::new("/repo/foo")
        ));
    }

    #[test]
    fn test_is_path_under_escapes_with_parent_dirs() {
        assert!(!is_path_under(
            Path::new("/repo/foo/1.0/../../bar"),
            Path::new("/repo/foo")
        ));
    }

    #[test]
    fn test_is_path_under_shorter_path() {
        assert!(!is_path_under(Path::new("/repo"), Path::new("/repo/foo")));
    }
}
