//! Storage Directory Module
//!
//! Owns an engine's on-disk directory and the blob files written into it.
//! Every blob keeps its directory alive, so the directory is removed only
//! after the engine and the last blob are both gone.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tempfile::{Builder, TempPath};
use tracing::{debug, warn};

use crate::error::Result;

const BLOB_PREFIX: &str = "_bigitem_";
const BLOB_SUFFIX: &str = ".blob";

// == Storage Directory ==
/// Directory holding file-backed items; removed on drop.
#[derive(Debug)]
pub(crate) struct StorageDir {
    path: PathBuf,
}

impl StorageDir {
    /// Deletes anything at `path`, then creates an empty directory there.
    pub(crate) fn create(path: PathBuf) -> Result<Arc<Self>> {
        match fs::remove_dir_all(&path) {
            Ok(()) => debug!("Removed stale storage directory {}", path.display()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }
        fs::create_dir_all(&path)?;
        Ok(Arc::new(Self { path }))
    }

    pub(crate) fn path(&self) -> &Path {
        &self.path
    }

    /// Writes `bytes` to a new blob file. Blocks on file I/O.
    pub(crate) fn write_blob(self: &Arc<Self>, bytes: &[u8]) -> Result<Blob> {
        let mut file = Builder::new()
            .prefix(BLOB_PREFIX)
            .suffix(BLOB_SUFFIX)
            .tempfile_in(&self.path)?;
        file.write_all(bytes)?;
        file.flush()?;
        Ok(Blob {
            path: file.into_temp_path(),
            _dir: Arc::clone(self),
        })
    }
}

impl Drop for StorageDir {
    fn drop(&mut self) {
        if let Err(e) = fs::remove_dir_all(&self.path) {
            if e.kind() != io::ErrorKind::NotFound {
                warn!(
                    "Failed to remove storage directory {}: {}",
                    self.path.display(),
                    e
                );
            }
        }
    }
}

// == Blob ==
/// A blob file backing a file-tier payload, deleted on drop.
#[derive(Debug)]
pub struct Blob {
    // Field order matters: the file goes before the directory guard.
    path: TempPath,
    _dir: Arc<StorageDir>,
}

impl Blob {
    /// Returns the blob's path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}
