//! Error taxonomy for the starter integration pipeline

use std::path::PathBuf;
use thiserror::Error;

/// Errors produced by the integration pipeline.
///
/// Every variant is fatal to the run: nothing is retried and nothing already
/// written to disk is rolled back.
#[derive(Debug, Error)]
pub enum ScaffoldError {
    /// The destination directory is already present.
    #[error(
        "The path \"{}\" already exists. Please choose a different parent directory or project name.",
        .0.display()
    )]
    PathExists(PathBuf),

    /// The target path has no final component usable as a project name.
    #[error("Cannot derive a project name from \"{}\"", .0.display())]
    InvalidName(PathBuf),

    /// A configured URL could not be parsed.
    #[error("Invalid URL \"{url}\": {reason}")]
    InvalidUrl { url: String, reason: String },

    /// The version manifest could not be parsed or violates its invariants.
    #[error("Invalid version manifest: {0}")]
    Manifest(String),

    /// The requested starter version is not a key of the manifest.
    #[error("The starter version \"{0}\" you specified does not exist.")]
    UnknownVersion(String),

    /// A manifest or archive could not be retrieved.
    #[error("Failed to fetch {url}: {reason}")]
    Fetch { url: String, reason: String },

    /// The downloaded payload is not a valid archive.
    #[error("Failed to decompress starter archive: {0}")]
    Decompress(String),

    /// A placeholder rename would overwrite an existing entry.
    #[error("Cannot rename \"{}\" to \"{}\": target already exists", from.display(), to.display())]
    RenameConflict { from: PathBuf, to: PathBuf },

    /// A staged file could not be moved into the project.
    #[error("Failed to move \"{}\" to \"{}\": {reason}", from.display(), to.display())]
    Move {
        from: PathBuf,
        to: PathBuf,
        reason: String,
    },

    /// The external project generator did not complete.
    #[error("Command \"{command}\" execution failed: {reason}")]
    GeneratorCommandFailed { command: String, reason: String },

    /// A post-step install command did not complete.
    #[error("Command \"{command}\" execution failed: {reason}")]
    InstallFailed { command: String, reason: String },

    /// Any other filesystem failure, annotated with the path involved.
    #[error("I/O error at \"{}\": {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ScaffoldError {
    /// Wrap an I/O error with the path that produced it.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result alias used throughout the library.
pub type Result<T, E = ScaffoldError> = std::result::Result<T, E>;
