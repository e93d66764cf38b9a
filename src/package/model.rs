//! Packages and variants as loaded from a repository.

use std::fmt;
use std::path::{Path, PathBuf};

use super::meta::PackageMeta;
use super::version::Version;

/// Identity of a package within a repository: name plus version.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PackageId {
    pub name: String,
    pub version: Version,
}

impl PackageId {
    /// `name-version`, or just `name` for a versionless package
    pub fn qualified_name(&self) -> String {
        if self.version.is_empty() {
            self.name.clone()
        } else {
            format!("{}-{}", self.name, self.version)
        }
    }
}

impl fmt::Display for PackageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.qualified_name())
    }
}

/// A package read from a repository.
#[derive(Debug, Clone, PartialEq)]
pub struct Package {
    pub meta: PackageMeta,
    /// Locator of the package definition, used for reporting
    pub uri: String,
    /// Version directory holding the definition and payload
    pub base: PathBuf,
    /// Location string of the repository the package was loaded from
    pub repository: String,
}

impl Package {
    pub fn name(&self) -> &str {
        &self.meta.name
    }

    pub fn version(&self) -> &Version {
        &self.meta.version
    }

    pub fn id(&self) -> PackageId {
        PackageId {
            name: self.meta.name.clone(),
            version: self.meta.version.clone(),
        }
    }

    pub fn qualified_name(&self) -> String {
        self.id().qualified_name()
    }

    pub fn timestamp(&self) -> Option<i64> {
        self.meta.timestamp
    }

    pub fn num_variants(&self) -> usize {
        self.meta.variants.len()
    }

    /// Declared relocatability, or `default_relocatable` when the package doesn't say.
    pub fn is_relocatable(&self, default_relocatable: bool) -> bool {
        self.meta.relocatable.unwrap_or(default_relocatable)
    }

    pub fn variant(&self, index: usize) -> Option<Variant> {
        let requires = self.meta.variants.get(index)?;
        Some(Variant {
            index: Some(index),
            parent: self.id(),
            requires: requires.clone(),
            uri: format!("{}[{}]", self.uri, index),
            root: self.base.join(PackageMeta::variant_subpath(requires)),
        })
    }

    pub fn variants(&self) -> Vec<Variant> {
        (0..self.num_variants())
            .filter_map(|index| self.variant(index))
            .collect()
    }

    /// The unit copied for a package without variants: the whole version directory.
    pub fn whole_package(&self) -> Variant {
        Variant {
            index: None,
            parent: self.id(),
            requires: Vec::new(),
            uri: self.uri.clone(),
            root: self.base.clone(),
        }
    }

    /// Every unit of copy in package order.
    pub fn units(&self) -> Vec<Variant> {
        if self.num_variants() == 0 {
            vec![self.whole_package()]
        } else {
            self.variants()
        }
    }
}

/// One build configuration of a package.
///
/// `index` is `None` for the whole-package unit of a package without variants.
#[derive(Debug, Clone, PartialEq)]
pub struct Variant {
    pub index: Option<usize>,
    pub parent: PackageId,
    pub requires: Vec<String>,
    pub uri: String,
    /// Directory holding this variant's payload
    pub root: PathBuf,
}

impl Variant {
    /// Payload location relative to the version directory; `None` for a whole package.
    pub fn subpath(&self) -> Option<PathBuf> {
        self.index
            .map(|_| PackageMeta::variant_subpath(&self.requires))
    }

    pub fn payload_root(&self) -> &Path {
        &self.root
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn package(variants: Vec<Vec<&str>>) -> Package {
        Package {
            meta: PackageMeta {
                name: "foo".into(),
                version: "1.0".parse().unwrap(),
                variants: variants
                    .into_iter()
                    .map(|v| v.into_iter().map(String::from).collect())
                    .collect(),
                ..Default::default()
            },
            uri: "/repo/foo/1.0/package.json".into(),
            base: PathBuf::from("/repo/foo/1.0"),
            repository: "filesystem@/repo".into(),
        }
    }

    #[test]
    fn test_qualified_name() {
        assert_eq!(package(vec![]).qualified_name(), "foo-1.0");

        let id = PackageId {
            name: "foo".into(),
            version: Version::default(),
        };
        assert_eq!(id.qualified_name(), "foo");
    }

    #[test]
    fn test_variants_carry_index_and_payload_root() {
        let pkg = package(vec![vec!["python-2"], vec!["python-3", "platform-linux"]]);
        let variants = pkg.variants();

        assert_eq!(variants.len(), 2);
        assert_eq!(variants[1].index, Some(1));
        assert_eq!(variants[1].uri, "/repo/foo/1.0/package.json[1]");
        assert_eq!(
            variants[1].root,
            Path::new("/repo/foo/1.0").join("python-3").join("platform-linux")
        );
        assert_eq!(variants[1].parent, pkg.id());
        assert!(pkg.variant(2).is_none());
    }

    #[test]
    fn test_units_of_package_without_variants() {
        let pkg = package(vec![]);
        let units = pkg.units();

        assert_eq!(units.len(), 1);
        assert_eq!(units[0].index, None);
        assert_eq!(units[0].subpath(), None);
        assert_eq!(units[0].payload_root(), Path::new("/repo/foo/1.0"));
    }

    #[test]
    fn test_relocatable_defaults() {
        let mut pkg = package(vec![]);
        assert!(pkg.is_relocatable(true));
        assert!(!pkg.is_relocatable(false));

        pkg.meta.relocatable = Some(false);
        assert!(!pkg.is_relocatable(true));

        pkg.meta.relocatable = Some(true);
        assert!(pkg.is_relocatable(false));
    }
}
