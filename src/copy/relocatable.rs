use log::debug;

use super::error::CopyError;
use crate::package::Package;

/// Gate refusing to move packages that are bound to their current location.
#[derive(Debug, Clone, Copy)]
pub struct RelocatabilityChecker {
    default_relocatable: bool,
}

impl RelocatabilityChecker {
    /// `default_relocatable` applies to packages that don't declare relocatability.
    pub fn new(default_relocatable: bool) -> Self {
        Self {
            default_relocatable,
        }
    }

    pub fn check(&self, package: &Package, force: bool) -> Result<(), CopyError> {
        if force {
            debug!("Skipping relocatability check for {}", package.uri);
            return Ok(());
        }

        if package.is_relocatable(self.default_relocatable) {
            Ok(())
        } else {
            Err(CopyError::NotRelocatable {
                uri: package.uri.clone(),
            })
        }
    }
}

impl Default for RelocatabilityChecker {
    fn default() -> Self {
        Self::new(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::package_with;

    #[test]
    fn test_declared_non_relocatable_fails() {
        let mut package = package_with("foo", "1.0", &[]);
        package.meta.relocatable = Some(false);

        let err = RelocatabilityChecker::default()
            .check(&package, false)
            .unwrap_err();
        assert!(matches!(err, CopyError::NotRelocatable { .. }));
    }

    #[test]
    fn test_force_bypasses_check() {
        let mut package = package_with("foo", "1.0", &[]);
        package.meta.relocatable = Some(false);

        assert!(RelocatabilityChecker::default().check(&package, true).is_ok());
    }

    #[test]
    fn test_undeclared_uses_default() {
        let package = package_with("foo", "1.0", &[]);

        assert!(RelocatabilityChecker::new(true).check(&package, false).is_ok());
        assert!(RelocatabilityChecker::new(false).check(&package, false).is_err());
    }

    #[test]
    fn test_declared_relocatable_overrides_default() {
        let mut package = package_with("foo", "1.0", &[]);
        package.meta.relocatable = Some(true);

        assert!(RelocatabilityChecker::new(false).check(&package, false).is_ok());
    }
}
