//! Error types for PicCull

use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PicCullError {
    #[error("No directory selected.")]
    NoDirectorySelected,

    #[error("No images found in the selected directory.")]
    NoImagesFound(PathBuf),

    #[error("Unable to open image at {}. It might be corrupted.", .path.display())]
    ImageDecode { path: PathBuf, message: String },

    #[error("Failed to cull {}: {source}", .path.file_name().unwrap_or_default().to_string_lossy())]
    FileOperation {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("No image selected to cull.")]
    NothingToCull,

    #[error("Cannot read directory {}: {source}", .path.display())]
    Scan {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Not a directory: {}", .0.display())]
    InvalidDirectory(PathBuf),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Invalid key binding: {0}")]
    InvalidKey(String),

    #[error("{key} is reserved for {action}")]
    ReservedKey { key: String, action: &'static str },

    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, PicCullError>;
