//! Staging directory where uploaded files wait for the import to run.

use std::{
    io,
    path::{Path, PathBuf},
};

use tokio::{fs, io::AsyncWriteExt};
use tracing::{debug, warn};
use uuid::Uuid;

/// Directory holding uploaded files until they are imported.
#[derive(Debug, Clone)]
pub struct UploadStaging {
    dir: PathBuf,
}

impl UploadStaging {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Create the directory if needed.
    pub async fn prepare(&self) -> io::Result<()> {
        fs::create_dir_all(&self.dir).await
    }

    /// Open a fresh, uniquely named file in the staging directory.
    pub async fn create(&self) -> io::Result<StagedUpload> {
        self.prepare().await?;
        let path = self.dir.join(Uuid::new_v4().simple().to_string());
        let file = fs::File::create(&path).await?;
        debug!(path = %path.display(), "staging upload");
        Ok(StagedUpload { path, file })
    }

    /// Delete every file of the staging directory except `keep`, returning how many went away.
    pub async fn purge_except(&self, keep: &StagedUpload) -> io::Result<usize> {
        let mut entries = fs::read_dir(&self.dir).await?;
        let mut removed = 0;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path == keep.path || !entry.file_type().await?.is_file() {
                continue;
            }
            match fs::remove_file(&path).await {
                Ok(()) => removed += 1,
                Err(err) if err.kind() == io::ErrorKind::NotFound => {}
                Err(err) => return Err(err),
            }
        }
        Ok(removed)
    }
}

/// An uploaded file sitting in the staging directory.
#[derive(Debug)]
pub struct StagedUpload {
    path: PathBuf,
    file: fs::File,
}

impl StagedUpload {
    pub async fn write_chunk(&mut self, chunk: &[u8]) -> io::Result<()> {
        self.file.write_all(chunk).await
    }

    /// Flush pending writes and return the whole content.
    pub async fn read_all(&mut self) -> io::Result<Vec<u8>> {
        self.file.flush().await?;
        fs::read(&self.path).await
    }

    /// Delete the file. Failures are logged, never surfaced.
    pub async fn remove(self) {
        let Self { path, file } = self;
        drop(file);
        if let Err(err) = fs::remove_file(&path).await {
            if err.kind() != io::ErrorKind::NotFound {
                warn!(path = %path.display(), error = %err, "failed to delete staged upload");
            }
        }
    }
}
