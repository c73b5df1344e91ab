//! Error types for loadout-loader.

/// Errors produced by loaders and resource access.
#[derive(Debug, thiserror::Error)]
pub enum LoaderError {
    /// A filesystem or archive operation failed.
    #[error("cannot access {location}: {source}")]
    Io {
        location: String,
        source: std::io::Error,
    },

    /// A resource exists but is not valid UTF-8 text.
    #[error("resource {location} is not valid UTF-8 text")]
    NotText { location: String },

    /// A located archive entry vanished between indexing and reading.
    #[error("archive {archive} no longer contains {entry}")]
    MissingEntry { archive: String, entry: String },
}
