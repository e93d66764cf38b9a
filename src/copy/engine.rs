//! Orchestration of a copy request across all selected variants.

use log::{debug, info};

use super::conflict::{self, Resolution};
use super::error::CopyError;
use super::relocatable::RelocatabilityChecker;
use super::transfer::{Destination, RealTransfer, SimulatedTransfer, Transfer, TransferOptions};
use super::variants;
use crate::package::{Package, PackageRepository, Variant, open_repository};
use crate::runtime::Runtime;

/// Caller policy for one copy request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CopyOptions {
    /// Replace variants that already exist at the destination
    pub overwrite: bool,
    /// Symlink payloads instead of copying them
    pub shallow: bool,
    /// Keep the source timestamp when the destination package is new
    pub keep_timestamp: bool,
    /// Skip the relocatability check
    pub force: bool,
    /// Make every decision but change nothing
    pub dry_run: bool,
}

/// A resolved source package and where to put it.
#[derive(Debug, Clone)]
pub struct CopyRequest<'p> {
    pub package: &'p Package,
    pub dest_location: String,
    /// Explicit variant indices; `None` or empty copies everything
    pub variants: Option<Vec<usize>>,
    pub options: CopyOptions,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CopiedVariant {
    pub source: Variant,
    pub destination: Destination,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SkippedVariant {
    pub source: Variant,
    pub existing: Variant,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CopyOutcome {
    Copied(CopiedVariant),
    Skipped(SkippedVariant),
}

/// Copied and skipped variants, each in enumeration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CopyResult {
    pub copied: Vec<CopiedVariant>,
    pub skipped: Vec<SkippedVariant>,
}

impl CopyResult {
    pub fn push(&mut self, outcome: CopyOutcome) {
        match outcome {
            CopyOutcome::Copied(copied) => self.copied.push(copied),
            CopyOutcome::Skipped(skipped) => self.skipped.push(skipped),
        }
    }

    pub fn len(&self) -> usize {
        self.copied.len() + self.skipped.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Runs the per-variant decide-then-transfer loop against one destination.
pub struct CopyEngine<'a> {
    dest: &'a dyn PackageRepository,
    transfer: &'a dyn Transfer,
    checker: RelocatabilityChecker,
}

impl<'a> CopyEngine<'a> {
    pub fn new(
        dest: &'a dyn PackageRepository,
        transfer: &'a dyn Transfer,
        checker: RelocatabilityChecker,
    ) -> Self {
        Self {
            dest,
            transfer,
            checker,
        }
    }

    /// Copy `selection` of `package` into the destination.
    ///
    /// Request-level checks run before any variant is touched. The first
    /// failing variant halts processing; variants already copied stay.
    #[tracing::instrument(skip_all, fields(package = %package.uri))]
    pub fn copy(
        &self,
        package: &Package,
        selection: Option<&[usize]>,
        options: CopyOptions,
    ) -> Result<CopyResult, CopyError> {
        if package.repository == self.dest.location() {
            return Err(CopyError::SameRepository {
                uri: package.uri.clone(),
            });
        }

        self.checker.check(package, options.force)?;
        let units = variants::enumerate(package, selection)?;
        debug!("{} unit(s) of {} to process", units.len(), package.uri);

        let mut result = CopyResult::default();
        for variant in units {
            info!(
                "Copying source variant {} into repository {}...",
                variant.uri,
                self.dest.location()
            );

            let outcome = match conflict::resolve(self.dest, &variant, options.overwrite)? {
                Resolution::Skip(existing) => CopyOutcome::Skipped(SkippedVariant {
                    source: variant,
                    existing,
                }),
                Resolution::Proceed { into_existing } => {
                    let transfer_options = TransferOptions {
                        shallow: options.shallow,
                        keep_timestamp: options.keep_timestamp && !into_existing,
                    };
                    let destination =
                        self.transfer
                            .transfer(package, &variant, self.dest, transfer_options)?;
                    CopyOutcome::Copied(CopiedVariant {
                        source: variant,
                        destination,
                    })
                }
            };
            result.push(outcome);
        }

        Ok(result)
    }
}

/// Resolve the destination of `request` and run it with the matching transfer strategy.
pub fn copy_package<R: Runtime>(
    runtime: &R,
    checker: RelocatabilityChecker,
    request: &CopyRequest<'_>,
) -> Result<CopyResult, CopyError> {
    let dest = open_repository(runtime, &request.dest_location)
        .map_err(|e| CopyError::repository(request.dest_location.as_str(), e))?;

    let real;
    let transfer: &dyn Transfer = if request.options.dry_run {
        &SimulatedTransfer
    } else {
        real = RealTransfer::new(runtime);
        &real
    };

    CopyEngine::new(dest.as_ref(), transfer, checker).copy(
        request.package,
        request.variants.as_deref(),
        request.options,
    )
}
