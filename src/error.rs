//! Error types for the bindery pipeline.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced while compiling a book into an archive.
///
/// Asset-level failures (a single image that cannot be fetched or decoded) are
/// not represented here: they are recoverable and the offending reference is
/// left untouched. Everything in this enum aborts the build.
#[derive(Error, Debug)]
pub enum Error {
    /// The working directory vanished before the build started.
    #[error("working directory {0} does not exist")]
    MissingWorkingDirectory(PathBuf),

    /// Index generation was requested before any content was rendered.
    #[error("manifest is empty: content must be rendered before the index")]
    EmptyManifest,

    /// The archive writer reported that nothing was added.
    #[error("no files were added to archive {0}")]
    EmptyArchive(PathBuf),

    /// A configured input could not be used.
    #[error("configuration error: {0}")]
    Config(String),

    /// A page template failed to render.
    #[error("template error: {0}")]
    Template(String),

    /// Transport-level failure while fetching a remote asset.
    #[error("fetch failed for {url}: {message}")]
    Fetch { url: String, message: String },

    /// File system I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Directory traversal error while packaging.
    #[error("walk error: {0}")]
    Walk(#[from] walkdir::Error),

    /// Archive writer error.
    #[error("zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// Index serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Image decode or encode error.
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
}

impl Error {
    /// Create a new fetch error.
    pub fn fetch(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Fetch {
            url: url.into(),
            message: message.into(),
        }
    }

    /// Whether this error indicates a caller-ordering bug rather than bad input.
    pub fn is_contract_violation(&self) -> bool {
        matches!(self, Self::EmptyManifest | Self::MissingWorkingDirectory(_))
    }
}
