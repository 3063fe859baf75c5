use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum BlogError {
    #[error("Blog must be initialised before posts are queried")]
    NotInitialised,

    #[error("Supplied path for blog posts does not exist - {}", .0.display())]
    InvalidPath(PathBuf),

    #[error("Duplicate blog creation date + title combination {route} ({} and {})", .first.display(), .second.display())]
    DuplicatePost {
        route: String,
        first: PathBuf,
        second: PathBuf,
    },

    #[error("Could not find post {0}")]
    NotFound(String),

    #[error("Error reading post {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Invalid post {}: {reason}", .path.display())]
    InvalidPost {
        path: PathBuf,
        reason: String,
    },
}

impl BlogError {
    /// A missing post is the only error a caller is expected to recover from.
    pub fn is_not_found(&self) -> bool {
        matches!(self, BlogError::NotFound(_))
    }
}
