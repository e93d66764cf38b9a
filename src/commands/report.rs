use crate::copy::CopyResult;
use crate::package::Package;

/// Human-readable lines describing the outcome of copying `package`.
pub fn report_lines(package: &Package, result: &CopyResult, dry_run: bool) -> Vec<String> {
    let verb = if dry_run { "would be" } else { "were" };
    let mut lines = Vec::new();

    if package.num_variants() == 0 {
        if let Some(copied) = result.copied.first() {
            if dry_run {
                lines.push(format!(
                    "{} would be copied to {}",
                    package.uri, copied.destination
                ));
            } else {
                lines.push(format!("Copied {} to {}", package.uri, copied.destination));
            }
        } else if let Some(skipped) = result.skipped.first() {
            lines.push(format!(
                "Target package already exists: {}. Use 'overwrite' to replace it.",
                skipped.existing.uri
            ));
        }
        return lines;
    }

    if !result.copied.is_empty() {
        lines.push(format!("{} variants {} copied:", result.copied.len(), verb));
        for copied in &result.copied {
            lines.push(format!("  {} -> {}", copied.source.uri, copied.destination));
        }
    }

    if !result.skipped.is_empty() {
        lines.push(format!(
            "{} variants {} skipped (target exists):",
            result.skipped.len(),
            verb
        ));
        for skipped in &result.skipped {
            lines.push(format!("  {} !-> {}", skipped.source.uri, skipped.existing.uri));
        }
    }

    lines
}
