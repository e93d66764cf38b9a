use anyhow::anyhow;
use log::debug;

use super::error::CopyError;
use crate::package::{PackageRepository, Variant};

/// What to do with one variant given the destination's current content.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// Copy the variant. `into_existing` is set when the destination package
    /// already exists, in which case its timestamp must be left alone.
    Proceed { into_existing: bool },
    /// Leave the destination as is; carries the variant already there.
    Skip(Variant),
}

/// Decide whether `variant` may be copied into `dest`.
pub fn resolve(
    dest: &dyn PackageRepository,
    variant: &Variant,
    overwrite: bool,
) -> Result<Resolution, CopyError> {
    let existing = dest
        .get_equivalent_variant(variant)
        .map_err(|e| CopyError::repository(dest.location(), e))?;

    match existing {
        Some(existing) if !overwrite => {
            debug!("{} already exists as {}", variant.uri, existing.uri);
            Ok(Resolution::Skip(existing))
        }
        Some(existing) => {
            debug!("Overwriting {} with {}", existing.uri, variant.uri);
            Ok(Resolution::Proceed {
                into_existing: true,
            })
        }
        None => {
            let package = dest
                .get_package(&variant.parent.name, &variant.parent.version)
                .map_err(|e| CopyError::repository(dest.location(), e))?;

            if let Some(package) = &package {
                let mismatch = match (variant.index, package.num_variants()) {
                    (None, n) if n > 0 => Some("which has variants"),
                    (Some(_), 0) => Some("which has no variants"),
                    _ => None,
                };
                if let Some(reason) = mismatch {
                    return Err(CopyError::repository(
                        dest.location(),
                        anyhow!("Cannot copy {} into {}, {}", variant.uri, package.uri, reason),
                    ));
                }
            }

            Ok(Resolution::Proceed {
                into_existing: package.is_some(),
            })
        }
    }
}
