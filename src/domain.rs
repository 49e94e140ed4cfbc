use std::fs;
use std::io;
use std::path::{Path, PathBuf};

mod mover;
mod session;

pub use mover::{DeleteMode, FileMover, FsMover};
pub use session::{CullOutcome, CullSession, CullTarget, SessionState, SessionStats, Step};

/// Name of the holding folder created inside the opened directory
pub const CULLED_DIR_NAME: &str = "pic-culled";

/// Extensions (lowercase, without the dot) that are treated as images
pub const IMAGE_EXTENSIONS: [&str; 6] = ["png", "jpg", "jpeg", "tiff", "bmp", "gif"];

/// Returns true if the path's extension is one of [`IMAGE_EXTENSIONS`], ignoring case.
pub fn is_supported_image(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// Destination folder for culled images of `source_dir`
pub fn culled_dir_for(source_dir: &Path) -> PathBuf {
    source_dir.join(CULLED_DIR_NAME)
}

/// Lists the image files of a directory.
pub trait DirectoryScanner {
    fn scan(&self, dir_path: &Path) -> io::Result<Vec<PathBuf>>;
}

/// Scanner backed by `std::fs::read_dir`.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsScanner;

impl DirectoryScanner for FsScanner {
    /// Discovers image files directly inside `dir_path`.
    ///
    /// # Behavior
    /// - Keeps regular files whose extension is a supported image type
    /// - Does not recurse into subdirectories (so `pic-culled/` is never listed)
    /// - Preserves the platform's native listing order
    /// - Skips entries that cannot be read instead of failing the whole scan
    fn scan(&self, dir_path: &Path) -> io::Result<Vec<PathBuf>> {
        let mut images = Vec::new();

        for entry_result in fs::read_dir(dir_path)? {
            let entry = match entry_result {
                Ok(e) => e,
                Err(_) => continue,
            };

            let path = entry.path();

            if !is_supported_image(&path) {
                continue;
            }

            // Follows symlinks, so a link to an image counts as an image
            let metadata = match fs::metadata(&path) {
                Ok(m) => m,
                Err(_) => continue,
            };

            if !metadata.is_file() {
                continue;
            }

            images.push(path);
        }

        Ok(images)
    }
}
