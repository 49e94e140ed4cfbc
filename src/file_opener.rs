//! Opens folders in the platform file manager

use crate::error::{PicCullError, Result};
use log::info;
use std::path::Path;

/// Opens `path` in the default file manager.
///
/// The file manager is started detached, so this returns as soon as it has
/// been launched and the terminal stays in raw mode.
pub fn open_folder(path: &Path) -> Result<()> {
    if !path.is_dir() {
        return Err(PicCullError::InvalidDirectory(path.to_path_buf()));
    }

    info!("opening {} in the file manager", path.display());
    open::that_detached(path)?;
    Ok(())
}
