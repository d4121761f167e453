use std::path::PathBuf;

use thiserror::Error;

/// Library error type for thumbnailing operations.
#[derive(Debug, Error)]
pub enum Error {
    /// The configured image directory is missing or not a directory.
    #[error("invalid image directory: {0}")]
    BadDir(String),

    /// The file could not be decoded as a supported image.
    #[error("failed to decode {}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// A derivative could not be encoded.
    #[error("failed to encode {}", path.display())]
    Encode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// Filesystem error while reading, writing, renaming or deleting `path`.
    #[error("i/o error on {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A derivative already exists and overwriting is disabled.
    #[error("refusing to overwrite existing derivative {}", .0.display())]
    NameCollision(PathBuf),

    /// Resampling failed inside the resizer.
    #[error("resize error: {0}")]
    Resize(String),
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
