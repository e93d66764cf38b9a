use thiserror::Error;

/// Boxed cause of a repository failure, keeping the full context chain.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Reasons a copy request fails.
#[derive(Debug, Error)]
pub enum CopyError {
    /// The package is bound to its location and `force` was not given.
    #[error("Cannot copy non-relocatable package: {uri}")]
    NotRelocatable { uri: String },

    /// A requested variant index does not exist in the source package.
    #[error("Cannot copy non-existent variant {index} in {uri}")]
    InvalidSelection { index: usize, uri: String },

    /// The destination is the repository the package was loaded from.
    #[error("Cannot copy package over itself: {uri}")]
    SameRepository { uri: String },

    /// The destination could not be resolved, read or written.
    #[error("Repository error at {location}")]
    Repository {
        location: String,
        #[source]
        source: BoxError,
    },
}

impl CopyError {
    pub fn repository(location: impl Into<String>, err: anyhow::Error) -> Self {
        CopyError::Repository {
            location: location.into(),
            source: err.into(),
        }
    }
}
