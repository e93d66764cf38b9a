use super::error::CopyError;
use crate::package::{Package, Variant};

/// Units of copy for `package`, in package order.
///
/// Without a selection (or with an empty one) every variant is returned, or the
/// whole package when it has no variants. A selection is validated in full
/// before anything is returned; duplicates collapse and caller order is ignored.
pub fn enumerate(package: &Package, selection: Option<&[usize]>) -> Result<Vec<Variant>, CopyError> {
    let indices = match selection {
        Some(indices) if !indices.is_empty() => indices,
        _ => return Ok(package.units()),
    };

    if let Some(&index) = indices.iter().find(|&&i| i >= package.num_variants()) {
        return Err(CopyError::InvalidSelection {
            index,
            uri: package.uri.clone(),
        });
    }

    let mut indices = indices.to_vec();
    indices.sort_unstable();
    indices.dedup();

    Ok(indices
        .into_iter()
        .filter_map(|index| package.variant(index))
        .collect())
}
