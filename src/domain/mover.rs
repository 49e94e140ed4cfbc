use log::debug;
use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

/// Performs the filesystem side of a cull.
pub trait FileMover {
    /// Moves `path` into `dest_dir`, creating the directory if needed.
    /// Returns the new location of the file.
    fn move_into(&mut self, path: &Path, dest_dir: &Path) -> io::Result<PathBuf>;

    /// Removes `path`.
    fn delete(&mut self, path: &Path) -> io::Result<()>;
}

/// How [`FsMover::delete`] gets rid of a file
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DeleteMode {
    /// Remove the file permanently
    #[default]
    Permanent,
    /// Send the file to the system trash
    Trash,
}

/// File mover that operates on the real filesystem
#[derive(Debug, Clone, Copy, Default)]
pub struct FsMover {
    delete_mode: DeleteMode,
}

impl FsMover {
    pub fn new(delete_mode: DeleteMode) -> Self {
        Self { delete_mode }
    }

    pub fn delete_mode(&self) -> DeleteMode {
        self.delete_mode
    }
}

impl FileMover for FsMover {
    fn move_into(&mut self, path: &Path, dest_dir: &Path) -> io::Result<PathBuf> {
        if !path.exists() {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("File not found: {:?}", path),
            ));
        }

        let file_name = path.file_name().ok_or_else(|| {
            io::Error::new(io::ErrorKind::InvalidInput, "Path has no file name")
        })?;

        fs::create_dir_all(dest_dir)?;

        let target = dest_dir.join(file_name);

        // hard_link never replaces an existing target
        match fs::hard_link(path, &target) {
            Ok(()) => {
                if let Err(e) = fs::remove_file(path) {
                    fs::remove_file(&target).ok();
                    return Err(e);
                }
            }
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                return Err(already_exists(&target));
            }
            Err(e) => {
                if is_cross_device(&e) {
                    debug!("link across devices, copying {:?} instead", path);
                } else {
                    debug!("hard link unsupported ({}), copying {:?} instead", e, path);
                }
                copy_then_remove(path, &target)?;
            }
        }

        Ok(target)
    }

    fn delete(&mut self, path: &Path) -> io::Result<()> {
        match self.delete_mode {
            DeleteMode::Permanent => fs::remove_file(path),
            DeleteMode::Trash => {
                if !path.exists() {
                    return Err(io::Error::new(
                        io::ErrorKind::NotFound,
                        format!("File not found: {:?}", path),
                    ));
                }
                trash::delete(path).map_err(|e| io::Error::other(format!("Trash error: {}", e)))
            }
        }
    }
}

fn already_exists(target: &Path) -> io::Error {
    io::Error::new(
        io::ErrorKind::AlreadyExists,
        format!("Destination already exists: {:?}", target),
    )
}

/// Copies `from` to a new file at `to` and removes `from`. Fails with
/// `AlreadyExists` if `to` exists. On any later failure the copy is removed
/// again so the file exists in exactly one place.
fn copy_then_remove(from: &Path, to: &Path) -> io::Result<()> {
    let mut source = File::open(from)?;
    let mut dest = match OpenOptions::new().write(true).create_new(true).open(to) {
        Ok(file) => file,
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => return Err(already_exists(to)),
        Err(e) => return Err(e),
    };

    let copied = io::copy(&mut source, &mut dest).and_then(|_| dest.sync_all());
    drop(dest);
    drop(source);

    if let Err(e) = copied.and_then(|_| fs::remove_file(from)) {
        fs::remove_file(to).ok();
        return Err(e);
    }

    Ok(())
}

fn is_cross_device(err: &io::Error) -> bool {
    err.kind() == io::ErrorKind::CrossesDevices
}
