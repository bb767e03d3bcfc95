use std::fs;
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use crate::error::{DedupError, Result};
use crate::storage::StorageBackend;

/// Store objects as plain files under a root directory.
///
/// A key such as `data/3` maps to `<root>/data/3`. Writes go through a
/// temporary file in the destination directory and are renamed into place,
/// so a reader never observes a partially written object.
pub struct LocalBackend {
    root: PathBuf,
}

impl LocalBackend {
    pub fn new(root: &Path) -> Result<Self> {
        let root = if root.exists() {
            fs::canonicalize(root)?
        } else {
            root.to_path_buf()
        };
        Ok(Self { root })
    }

    /// Map a key onto a path below the root. Every `/`-separated segment must
    /// be a plain file name.
    fn object_path(&self, key: &str) -> Result<PathBuf> {
        let mut path = self.root.clone();
        for segment in key.split('/') {
            if segment.is_empty() || segment == "." || segment == ".." || segment.contains('\\') {
                return Err(DedupError::InvalidFormat(format!(
                    "unsafe storage key '{key}'"
                )));
            }
            path.push(segment);
        }
        Ok(path)
    }
}

/// Treat a missing file as an absent object.
fn found<T>(result: io::Result<T>) -> Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

impl StorageBackend for LocalBackend {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let path = self.object_path(key)?;
        found(fs::read(path))
    }

    fn put(&self, key: &str, data: &[u8]) -> Result<()> {
        let path = self.object_path(key)?;
        let dir = path.parent().unwrap_or(&self.root);
        fs::create_dir_all(dir)?;

        let mut tmp = tempfile::Builder::new().prefix(".put-").tempfile_in(dir)?;
        tmp.write_all(data)?;
        tmp.as_file().sync_all()?;
        tmp.persist(&path).map_err(|e| e.error)?;
        Ok(())
    }

    fn get_range(&self, key: &str, offset: u64, length: u64) -> Result<Option<Vec<u8>>> {
        let path = self.object_path(key)?;
        let Some(mut file) = found(fs::File::open(path))? else {
            return Ok(None);
        };
        file.seek(SeekFrom::Start(offset))?;
        let mut buf = Vec::with_capacity(length as usize);
        file.take(length).read_to_end(&mut buf)?;
        Ok(Some(buf))
    }
}
