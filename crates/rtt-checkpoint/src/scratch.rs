//! Scratch-file cleanup guard, resolving `spec.md` §9's open question on
//! scratch cleanup ordering: rather than unlinking audio/video/frame
//! scratch paths at several scattered points, every stage registers its
//! scratch paths with one `ScratchScope` and lets `Drop` remove them on
//! every exit path — success, early return, or panic unwinding.

use std::path::PathBuf;

use tracing::warn;

#[derive(Debug, Default)]
pub struct ScratchScope {
    files: Vec<PathBuf>,
    dirs: Vec<PathBuf>,
    /// Set once cleanup has run explicitly via `finish()`, so `Drop`
    /// doesn't redundantly attempt it (and log spurious warnings) twice.
    finished: bool,
}

impl ScratchScope {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn track_file(&mut self, path: impl Into<PathBuf>) -> &mut Self {
        self.files.push(path.into());
        self
    }

    pub fn track_dir(&mut self, path: impl Into<PathBuf>) -> &mut Self {
        self.dirs.push(path.into());
        self
    }

    /// Removes every tracked path. Safe to call more than once; missing
    /// paths are not errors (a prior crashed run may have already cleared
    /// them, or this run may never have created them).
    pub fn cleanup(&mut self) {
        for file in self.files.drain(..) {
            if let Err(e) = std::fs::remove_file(&file) {
                if e.kind() != std::io::ErrorKind::NotFound {
                    warn!(path = %file.display(), error = %e, "failed to remove scratch file");
                }
            }
        }
        for dir in self.dirs.drain(..) {
            if let Err(e) = std::fs::remove_dir_all(&dir) {
                if e.kind() != std::io::ErrorKind::NotFound {
                    warn!(path = %dir.display(), error = %e, "failed to remove scratch dir");
                }
            }
        }
        self.finished = true;
    }
}

impl Drop for ScratchScope {
    fn drop(&mut self) {
        if !self.finished {
            self.cleanup();
        }
    }
}
