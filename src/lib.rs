//! PicCull - a terminal image culling library
//!
//! This crate provides the browsing and culling core of the PicCull
//! application: a session over the images of one directory, and the
//! filesystem collaborators that list and move those images.

pub mod app;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod file_opener;
pub mod preview;
pub mod tui;

// Re-export primary types for convenience
pub use app::App;
pub use config::UserConfig;
pub use domain::{
    culled_dir_for, is_supported_image, CullOutcome, CullSession, CullTarget, DeleteMode,
    DirectoryScanner, FileMover, FsMover, FsScanner, SessionState, SessionStats, Step,
    CULLED_DIR_NAME,
};
pub use error::{PicCullError, Result};
pub use file_opener::open_folder;
