//! The transient directory a book is assembled in.

use std::path::Path;

use tempfile::TempDir;

use crate::error::Result;

/// Subdirectories of an HPub container.
pub const CONTAINER_DIRS: [&str; 4] = ["css", "gfx", "images", "js"];

/// A private build directory, removed on [`close`](Self::close) or drop.
#[derive(Debug)]
pub struct WorkingDirectory {
    dir: TempDir,
}

impl WorkingDirectory {
    /// Create a fresh directory under `parent`, or the system temp dir.
    pub fn create(parent: Option<&Path>) -> Result<Self> {
        let mut builder = tempfile::Builder::new();
        builder.prefix("bindery-");
        let dir = match parent {
            Some(parent) => builder.tempdir_in(parent)?,
            None => builder.tempdir()?,
        };
        tracing::debug!(path = %dir.path().display(), "working directory created");
        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Lay out the empty container directories.
    pub fn create_container(&self) -> Result<()> {
        for name in CONTAINER_DIRS {
            std::fs::create_dir_all(self.path().join(name))?;
        }
        Ok(())
    }

    /// Remove the directory. A directory that is already gone is not an error.
    pub fn close(self) -> Result<()> {
        let path = self.path().to_path_buf();
        match self.dir.close() {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }
        tracing::debug!(path = %path.display(), "working directory removed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_container_layout_and_cleanup() {
        let parent = tempfile::tempdir().unwrap();
        let workdir = WorkingDirectory::create(Some(parent.path())).unwrap();
        workdir.create_container().unwrap();
        for name in CONTAINER_DIRS {
            assert!(workdir.path().join(name).is_dir());
        }
        assert!(
            workdir
                .path()
                .file_name()
                .unwrap()
                .to_string_lossy()
                .starts_with("bindery-")
        );

        let path = workdir.path().to_path_buf();
        workdir.close().unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn test_close_tolerates_vanished_directory() {
        let workdir = WorkingDirectory::create(None).unwrap();
        std::fs::remove_dir_all(workdir.path()).unwrap();
        assert!(workdir.close().is_ok());
    }
}
