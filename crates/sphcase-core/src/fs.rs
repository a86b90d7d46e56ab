//! Filesystem seam used by the save/load workflow.
//!
//! Every failure is an explicit error; the workflow decides which ones are
//! best-effort.

use std::path::Path;

use crate::{Error, Result};

/// Filesystem operations needed to save and load a case.
pub trait CaseFilesystem {
    /// Create a directory and all of its parents.
    fn create_dir_all(&self, path: &Path) -> Result<()>;

    /// Copy a file, returning the number of bytes copied.
    fn copy(&self, from: &Path, to: &Path) -> Result<u64>;

    fn exists(&self, path: &Path) -> bool;

    /// Read a whole file. A missing file is `Error::FileNotFound`.
    fn read(&self, path: &Path) -> Result<Vec<u8>>;

    /// Replace a file's contents.
    fn write(&self, path: &Path, contents: &[u8]) -> Result<()>;
}

/// [`CaseFilesystem`] backed by `std::fs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFilesystem;

impl CaseFilesystem for LocalFilesystem {
    fn create_dir_all(&self, path: &Path) -> Result<()> {
        std::fs::create_dir_all(path).map_err(|e| Error::io(path, e))
    }

    fn copy(&self, from: &Path, to: &Path) -> Result<u64> {
        if !from.is_file() {
            return Err(Error::FileNotFound(from.to_path_buf()));
        }
        std::fs::copy(from, to).map_err(|e| Error::io(to, e))
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn read(&self, path: &Path) -> Result<Vec<u8>> {
        std::fs::read(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => Error::FileNotFound(path.to_path_buf()),
            _ => Error::io(path, e),
        })
    }

    fn write(&self, path: &Path, contents: &[u8]) -> Result<()> {
        std::fs::write(path, contents).map_err(|e| Error::io(path, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_missing_is_file_not_found() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let result = LocalFilesystem.read(&dir.path().join("nope"));
        assert!(matches!(result, Err(Error::FileNotFound(_))));
        Ok(())
    }

    #[test]
    fn test_copy_missing_source_is_file_not_found() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let result = LocalFilesystem.copy(&dir.path().join("a"), &dir.path().join("b"));
        assert!(matches!(result, Err(Error::FileNotFound(_))));
        Ok(())
    }

    #[test]
    fn test_write_then_read() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let nested = dir.path().join("a").join("b");
        LocalFilesystem.create_dir_all(&nested)?;
        let file = nested.join("data.csv");
        LocalFilesystem.write(&file, b"0 1\n")?;
        assert!(LocalFilesystem.exists(&file));
        assert_eq!(LocalFilesystem.read(&file)?, b"0 1\n");
        Ok(())
    }
}
