//! The copy engine: relocatability gate, variant selection, conflict
//! resolution and payload transfer for one package at a time.

mod conflict;
mod engine;
mod error;
mod relocatable;
mod transfer;
mod variants;

pub use conflict::{Resolution, resolve};
pub use engine::{
    CopiedVariant, CopyEngine, CopyOptions, CopyOutcome, CopyRequest, CopyResult, SkippedVariant,
    copy_package,
};
pub use error::{BoxError, CopyError};
pub use relocatable::RelocatabilityChecker;
pub use transfer::{Destination, RealTransfer, SimulatedTransfer, Transfer, TransferOptions};
pub use variants::enumerate;
