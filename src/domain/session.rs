use super::{culled_dir_for, DirectoryScanner, FileMover};
use crate::error::{PicCullError, Result};
use log::{debug, info, warn};
use std::path::{Path, PathBuf};

/// Direction of a single navigation step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Back,
    Forward,
}

/// Coarse state of a session, derived from the cursor and the sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No directory loaded
    Empty,
    /// Cursor points at an image
    Browsing,
    /// Cursor is one past the last image
    Exhausted,
}

/// What happened to a culled file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CullTarget {
    /// Moved into the culled folder, at the contained path
    Moved(PathBuf),
    Deleted,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CullOutcome {
    /// Original location of the culled image
    pub path: PathBuf,
    pub target: CullTarget,
}

/// Counters for the summary screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SessionStats {
    pub found: usize,
    /// Moved plus deleted
    pub culled: usize,
    pub moved: usize,
    pub deleted: usize,
    pub remaining: usize,
}

/// Browsing and culling state for one opened directory.
///
/// The session only holds path references. Files are touched exclusively
/// through the [`FileMover`] passed to [`CullSession::cull`], and the sequence
/// is mutated only after that operation has succeeded.
///
/// Invariant: `index <= paths.len()`. `index == paths.len()` is the
/// exhausted state.
#[derive(Debug, Default)]
pub struct CullSession {
    paths: Vec<PathBuf>,
    index: usize,
    source_dir: Option<PathBuf>,
    culled_dir: Option<PathBuf>,
    delete_on_cull: bool,
    found: usize,
    moved: usize,
    deleted: usize,
}

impl CullSession {
    pub fn new(delete_on_cull: bool) -> Self {
        Self {
            delete_on_cull,
            ..Self::default()
        }
    }

    /// Loads the images of `directory`, replacing the current sequence.
    ///
    /// Returns the number of images found. On a scan failure the session is
    /// left as it was. When the directory holds no images the session is
    /// reset to [`SessionState::Empty`] and `NoImagesFound` is returned.
    ///
    /// The culled folder is only computed here, not created.
    pub fn open<S>(&mut self, directory: &Path, scanner: &S) -> Result<usize>
    where
        S: DirectoryScanner + ?Sized,
    {
        let paths = scanner
            .scan(directory)
            .map_err(|source| PicCullError::Scan {
                path: directory.to_path_buf(),
                source,
            })?;

        if paths.is_empty() {
            warn!("no images found in {}", directory.display());
            self.reset();
            return Err(PicCullError::NoImagesFound(directory.to_path_buf()));
        }

        info!("opened {} with {} images", directory.display(), paths.len());

        self.found = paths.len();
        self.moved = 0;
        self.deleted = 0;
        self.paths = paths;
        self.index = 0;
        self.source_dir = Some(directory.to_path_buf());
        self.culled_dir = Some(culled_dir_for(directory));

        Ok(self.found)
    }

    /// Moves the cursor one step. Returns true if it moved.
    ///
    /// Forward stops at the last image, so navigation alone never reaches
    /// the exhausted state. Back from the exhausted state lands on the last
    /// image.
    pub fn advance(&mut self, step: Step) -> bool {
        match step {
            Step::Back if self.can_go_prev() => {
                self.index -= 1;
                true
            }
            Step::Forward if self.can_go_next() => {
                self.index += 1;
                true
            }
            _ => false,
        }
    }

    /// Culls the image under the cursor.
    ///
    /// Performs exactly one file operation: a delete when delete-on-cull is
    /// set, otherwise a move into the culled folder. The entry is removed
    /// from the sequence only if the operation succeeded. The cursor value
    /// is kept, so it now points at the following image (or past the end).
    pub fn cull<M>(&mut self, mover: &mut M) -> Result<CullOutcome>
    where
        M: FileMover + ?Sized,
    {
        if !self.can_cull() {
            return Err(PicCullError::NothingToCull);
        }

        let path = self.paths[self.index].clone();

        let result = if self.delete_on_cull {
            mover.delete(&path).map(|_| CullTarget::Deleted)
        } else {
            let dest = self
                .culled_dir
                .clone()
                .ok_or(PicCullError::NothingToCull)?;
            mover.move_into(&path, &dest).map(CullTarget::Moved)
        };

        let target = result.map_err(|source| {
            warn!("cull of {} failed: {}", path.display(), source);
            PicCullError::FileOperation {
                path: path.clone(),
                source,
            }
        })?;

        self.paths.remove(self.index);
        match target {
            CullTarget::Moved(_) => self.moved += 1,
            CullTarget::Deleted => self.deleted += 1,
        }
        debug!(
            "culled {} ({} left, index {})",
            path.display(),
            self.paths.len(),
            self.index
        );

        Ok(CullOutcome { path, target })
    }

    /// Path under the cursor, or `None` when exhausted or empty
    pub fn current(&self) -> Option<&Path> {
        self.paths.get(self.index).map(PathBuf::as_path)
    }

    pub fn can_go_prev(&self) -> bool {
        self.index > 0
    }

    pub fn can_go_next(&self) -> bool {
        self.index + 1 < self.paths.len()
    }

    pub fn can_cull(&self) -> bool {
        self.index < self.paths.len()
    }

    pub fn state(&self) -> SessionState {
        if self.source_dir.is_none() {
            SessionState::Empty
        } else if self.index < self.paths.len() {
            SessionState::Browsing
        } else {
            SessionState::Exhausted
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    pub fn source_dir(&self) -> Option<&Path> {
        self.source_dir.as_deref()
    }

    pub fn culled_dir(&self) -> Option<&Path> {
        self.culled_dir.as_deref()
    }

    /// Whether the culled folder exists on disk yet
    pub fn culled_dir_exists(&self) -> bool {
        self.culled_dir.as_deref().is_some_and(Path::is_dir)
    }

    pub fn delete_on_cull(&self) -> bool {
        self.delete_on_cull
    }

    pub fn set_delete_on_cull(&mut self, delete_on_cull: bool) {
        self.delete_on_cull = delete_on_cull;
    }

    pub fn stats(&self) -> SessionStats {
        SessionStats {
            found: self.found,
            culled: self.moved + self.deleted,
            moved: self.moved,
            deleted: self.deleted,
            remaining: self.paths.len(),
        }
    }

    fn reset(&mut self) {
        self.paths.clear();
        self.index = 0;
        self.source_dir = None;
        self.culled_dir = None;
        self.found = 0;
        self.moved = 0;
        self.deleted = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{FsMover, FsScanner, CULLED_DIR_NAME};
    use std::fs;
    use std::io;
    use tempfile::TempDir;

    /// Scanner returning a fixed list, for tests that never touch the disk
    struct FixedScanner(Vec<PathBuf>);

    impl DirectoryScanner for FixedScanner {
        fn scan(&self, _dir_path: &Path) -> io::Result<Vec<PathBuf>> {
            Ok(self.0.clone())
        }
    }

    struct FailingScanner;

    impl DirectoryScanner for FailingScanner {
        fn scan(&self, _dir_path: &Path) -> io::Result<Vec<PathBuf>> {
            Err(io::Error::new(io::ErrorKind::PermissionDenied, "denied"))
        }
    }

    /// Mover that only counts calls
    #[derive(Default)]
    struct CountingMover {
        moves: usize,
        deletes: usize,
    }

    impl FileMover for CountingMover {
        fn move_into(&mut self, path: &Path, dest_dir: &Path) -> io::Result<PathBuf> {
            self.moves += 1;
            Ok(dest_dir.join(path.file_name().unwrap()))
        }

        fn delete(&mut self, _path: &Path) -> io::Result<()> {
            self.deletes += 1;
            Ok(())
        }
    }

    struct FailingMover;

    impl FileMover for FailingMover {
        fn move_into(&mut self, _path: &Path, _dest_dir: &Path) -> io::Result<PathBuf> {
            Err(io::Error::new(io::ErrorKind::PermissionDenied, "denied"))
        }

        fn delete(&mut self, _path: &Path) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::PermissionDenied, "denied"))
        }
    }

    fn session_with(names: &[&str]) -> CullSession {
        let paths = names.iter().map(|n| Path::new("/photos").join(n)).collect();
        let mut session = CullSession::default();
        session
            .open(Path::new("/photos"), &FixedScanner(paths))
            .unwrap();
        session
    }

    fn current_name(session: &CullSession) -> Option<String> {
        session
            .current()
            .and_then(|p| p.file_name())
            .map(|n| n.to_string_lossy().into_owned())
    }

    mod open_tests {
        use super::*;

        #[test]
        fn test_new_session_is_empty() {
            let session = CullSession::default();

            assert_eq!(session.state(), SessionState::Empty);
            assert!(session.current().is_none());
            assert!(!session.can_cull());
            assert!(!session.can_go_prev());
            assert!(!session.can_go_next());
        }

        #[test]
        fn test_open_resets_index_and_counts() {
            let mut session = session_with(&["a.jpg", "b.png", "c.gif"]);
            session.advance(Step::Forward);
            session.advance(Step::Forward);

            let count = session
                .open(
                    Path::new("/other"),
                    &FixedScanner(vec![PathBuf::from("/other/x.jpg")]),
                )
                .unwrap();

            assert_eq!(count, 1);
            assert_eq!(session.index(), 0);
            assert_eq!(session.len(), 1);
            assert_eq!(session.state(), SessionState::Browsing);
            assert_eq!(session.source_dir(), Some(Path::new("/other")));
        }

        #[test]
        fn test_open_sets_culled_dir_without_creating_it() {
            let temp_dir = TempDir::new().unwrap();
            fs::write(temp_dir.path().join("a.jpg"), b"a").unwrap();

            let mut session = CullSession::default();
            session.open(temp_dir.path(), &FsScanner).unwrap();

            assert_eq!(
                session.culled_dir(),
                Some(temp_dir.path().join(CULLED_DIR_NAME).as_path())
            );
            assert!(!session.culled_dir_exists());
        }

        #[test]
        fn test_open_filters_by_extension() {
            let temp_dir = TempDir::new().unwrap();
            fs::write(temp_dir.path().join("a.jpg"), b"a").unwrap();
            fs::write(temp_dir.path().join("b.png"), b"b").unwrap();
            fs::write(temp_dir.path().join("c.txt"), b"c").unwrap();

            let mut session = CullSession::default();
            let count = session.open(temp_dir.path(), &FsScanner).unwrap();

            assert_eq!(count, 2);
            assert_eq!(session.index(), 0);
            let mut names: Vec<_> = session
                .paths()
                .iter()
                .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
                .collect();
            names.sort();
            assert_eq!(names, vec!["a.jpg", "b.png"]);
        }

        #[test]
        fn test_open_no_images() {
            let temp_dir = TempDir::new().unwrap();
            fs::write(temp_dir.path().join("notes.txt"), b"x").unwrap();

            let mut session = CullSession::default();
            let result = session.open(temp_dir.path(), &FsScanner);

            assert!(matches!(result, Err(PicCullError::NoImagesFound(_))));
            assert!(session.is_empty());
            assert_eq!(session.state(), SessionState::Empty);
        }

        #[test]
        fn test_open_no_images_clears_previous_session() {
            let mut session = session_with(&["a.jpg"]);

            let result = session.open(Path::new("/empty"), &FixedScanner(vec![]));

            assert!(matches!(result, Err(PicCullError::NoImagesFound(_))));
            assert!(session.is_empty());
            assert_eq!(session.state(), SessionState::Empty);
            assert!(session.culled_dir().is_none());
        }

        #[test]
        fn test_open_scan_failure_keeps_session() {
            let mut session = session_with(&["a.jpg", "b.jpg"]);
            session.advance(Step::Forward);

            let result = session.open(Path::new("/locked"), &FailingScanner);

            assert!(matches!(result, Err(PicCullError::Scan { .. })));
            assert_eq!(session.len(), 2);
            assert_eq!(session.index(), 1);
            assert_eq!(session.source_dir(), Some(Path::new("/photos")));
        }

        #[test]
        fn test_open_nonexistent_directory() {
            let mut session = CullSession::default();
            let result = session.open(Path::new("/nonexistent/directory"), &FsScanner);
            assert!(matches!(result, Err(PicCullError::Scan { .. })));
        }
    }

    mod navigation_tests {
        use super::*;

        #[test]
        fn test_back_at_start_is_noop() {
            let mut session = session_with(&["a.jpg", "b.jpg"]);

            assert!(!session.advance(Step::Back));
            assert_eq!(session.index(), 0);
        }

        #[test]
        fn test_forward_and_back() {
            let mut session = session_with(&["a.jpg", "b.jpg", "c.jpg"]);

            assert!(session.advance(Step::Forward));
            assert_eq!(current_name(&session).as_deref(), Some("b.jpg"));

            assert!(session.advance(Step::Back));
            assert_eq!(current_name(&session).as_deref(), Some("a.jpg"));
        }

        #[test]
        fn test_forward_stops_at_last_image() {
            let mut session = session_with(&["a.jpg", "b.jpg"]);

            assert!(session.advance(Step::Forward));
            assert!(!session.advance(Step::Forward));
            assert_eq!(session.index(), 1);
            assert_eq!(session.state(), SessionState::Browsing);
        }

        #[test]
        fn test_no_wraparound() {
            let mut session = session_with(&["a.jpg", "b.jpg"]);
            session.advance(Step::Forward);
            session.advance(Step::Forward);
            assert_eq!(session.index(), 1);

            session.advance(Step::Back);
            session.advance(Step::Back);
            assert_eq!(session.index(), 0);
        }

        #[test]
        fn test_back_leaves_exhausted_state() {
            let mut session = session_with(&["a.jpg", "b.jpg"]);
            let mut mover = CountingMover::default();
            session.advance(Step::Forward);
            session.cull(&mut mover).unwrap();
            assert_eq!(session.state(), SessionState::Exhausted);

            assert!(session.advance(Step::Back));
            assert_eq!(session.state(), SessionState::Browsing);
            assert_eq!(current_name(&session).as_deref(), Some("a.jpg"));
        }

        #[test]
        fn test_boundary_checks() {
            let mut session = session_with(&["a.jpg", "b.jpg"]);
            assert!(!session.can_go_prev());
            assert!(session.can_go_next());
            assert!(session.can_cull());

            session.advance(Step::Forward);
            assert!(session.can_go_prev());
            assert!(!session.can_go_next());
            assert!(session.can_cull());
        }

        #[test]
        fn test_can_cull_does_not_mutate() {
            let session = session_with(&["a.jpg", "b.jpg"]);
            let before = (session.index(), session.paths().to_vec());

            for _ in 0..3 {
                assert!(session.can_cull());
            }

            assert_eq!((session.index(), session.paths().to_vec()), before);
        }
    }

    mod cull_tests {
        use super::*;

        #[test]
        fn test_cull_moves_into_culled_dir() {
            let temp_dir = TempDir::new().unwrap();
            let a = temp_dir.path().join("a.jpg");
            let b = temp_dir.path().join("b.png");
            fs::write(&a, b"a").unwrap();
            fs::write(&b, b"b").unwrap();

            let mut session = CullSession::new(false);
            session
                .open(temp_dir.path(), &FixedScanner(vec![a.clone(), b.clone()]))
                .unwrap();

            let outcome = session.cull(&mut FsMover::default()).unwrap();

            let culled = temp_dir.path().join(CULLED_DIR_NAME).join("a.jpg");
            assert_eq!(outcome.path, a);
            assert_eq!(outcome.target, CullTarget::Moved(culled.clone()));
            assert!(!a.exists());
            assert!(culled.exists());
            assert_eq!(session.paths(), &[b.clone()]);
            assert_eq!(session.index(), 0);
            assert_eq!(session.current(), Some(b.as_path()));
            assert!(session.culled_dir_exists());
        }

        #[test]
        fn test_cull_deletes_when_flag_set() {
            let temp_dir = TempDir::new().unwrap();
            let a = temp_dir.path().join("a.jpg");
            fs::write(&a, b"a").unwrap();

            let mut session = CullSession::new(true);
            session.open(temp_dir.path(), &FsScanner).unwrap();

            let outcome = session.cull(&mut FsMover::default()).unwrap();

            assert_eq!(outcome.target, CullTarget::Deleted);
            assert!(!a.exists());
            // Deleting never creates the culled folder
            assert!(!temp_dir.path().join(CULLED_DIR_NAME).exists());
        }

        #[test]
        fn test_cull_last_image_exhausts() {
            let mut session = session_with(&["a.jpg"]);
            let mut mover = CountingMover::default();

            session.cull(&mut mover).unwrap();

            assert!(session.is_empty());
            assert_eq!(session.index(), 0);
            assert_eq!(session.state(), SessionState::Exhausted);
            assert!(session.current().is_none());
            assert!(!session.can_cull());
        }

        #[test]
        fn test_cull_keeps_index_and_shrinks_by_one() {
            let mut session = session_with(&["a.jpg", "b.jpg", "c.jpg", "d.jpg"]);
            let mut mover = CountingMover::default();
            session.advance(Step::Forward);

            session.cull(&mut mover).unwrap();

            assert_eq!(session.len(), 3);
            assert_eq!(session.index(), 1);
            assert_eq!(current_name(&session).as_deref(), Some("c.jpg"));
        }

        #[test]
        fn test_cull_performs_exactly_one_operation() {
            let mut session = session_with(&["a.jpg", "b.jpg"]);
            let mut mover = CountingMover::default();

            session.cull(&mut mover).unwrap();
            assert_eq!((mover.moves, mover.deletes), (1, 0));

            session.set_delete_on_cull(true);
            session.cull(&mut mover).unwrap();
            assert_eq!((mover.moves, mover.deletes), (1, 1));
        }

        #[test]
        fn test_cull_failure_leaves_sequence_unchanged() {
            let mut session = session_with(&["a.jpg", "b.jpg"]);
            session.advance(Step::Forward);

            let result = session.cull(&mut FailingMover);

            assert!(matches!(result, Err(PicCullError::FileOperation { .. })));
            assert_eq!(session.len(), 2);
            assert_eq!(session.index(), 1);
            assert_eq!(session.stats().culled, 0);
        }

        #[test]
        fn test_cull_missing_file_leaves_sequence_unchanged() {
            let temp_dir = TempDir::new().unwrap();
            let a = temp_dir.path().join("a.jpg");
            fs::write(&a, b"a").unwrap();

            let mut session = CullSession::default();
            session.open(temp_dir.path(), &FsScanner).unwrap();
            fs::remove_file(&a).unwrap();

            let result = session.cull(&mut FsMover::default());

            assert!(matches!(result, Err(PicCullError::FileOperation { .. })));
            assert_eq!(session.paths(), &[a]);
        }

        #[test]
        fn test_cull_when_exhausted() {
            let mut session = session_with(&["a.jpg"]);
            let mut mover = CountingMover::default();
            session.cull(&mut mover).unwrap();

            let result = session.cull(&mut mover);

            assert!(matches!(result, Err(PicCullError::NothingToCull)));
            assert_eq!(mover.moves, 1);
        }

        #[test]
        fn test_cull_on_empty_session() {
            let mut session = CullSession::default();
            let result = session.cull(&mut CountingMover::default());
            assert!(matches!(result, Err(PicCullError::NothingToCull)));
        }

        #[test]
        fn test_stats() {
            let mut session = session_with(&["a.jpg", "b.jpg", "c.jpg"]);
            let mut mover = CountingMover::default();

            session.cull(&mut mover).unwrap();

            assert_eq!(
                session.stats(),
                SessionStats {
                    found: 3,
                    culled: 1,
                    moved: 1,
                    deleted: 0,
                    remaining: 2,
                }
            );
        }

        #[test]
        fn test_stats_count_moves_and_deletes_separately() {
            let mut session = session_with(&["a.jpg", "b.jpg", "c.jpg"]);
            let mut mover = CountingMover::default();

            session.cull(&mut mover).unwrap();
            session.set_delete_on_cull(true);
            session.cull(&mut mover).unwrap();

            let stats = session.stats();
            assert_eq!(stats.moved, 1);
            assert_eq!(stats.deleted, 1);
            assert_eq!(stats.culled, 2);
            assert_eq!((mover.moves, mover.deletes), (1, 1));
        }
    }
}
