//! FileStore — attachment payloads on local disk.
//!
//! Attachments live beneath `base_path/{folder}/{generated}` where
//! `generated` is a fresh UUID prefixed onto the sanitized original
//! filename. Two concurrent stores never collide because every call draws a
//! new UUID; no locking is needed.

use std::{
    io::{self, ErrorKind},
    path::{Path, PathBuf},
};

use thiserror::Error;
use tokio::{
    fs::{self, File},
    io::AsyncWriteExt,
};
use tracing::debug;
use uuid::Uuid;

/// Folder holding employee profile attachments. Every caller in this service
/// uses the same folder.
pub const ATTACHMENT_FOLDER: &str = "ImageProfile";

#[derive(Debug, Error)]
pub enum FileStoreError {
    #[error("invalid attachment filename `{0}`")]
    InvalidFilename(String),
    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type FileStoreResult<T> = Result<T, FileStoreError>;

/// Outcome of a remove call. A missing file is an answer, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveStatus {
    Deleted,
    NotFound,
}

/// Disk-backed store for employee attachments.
#[derive(Clone, Debug)]
pub struct FileStore {
    /// Base directory beneath which attachment folders are created.
    base_path: PathBuf,
}

impl FileStore {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Reject names that could escape the attachment folder.
    fn ensure_filename_safe(&self, filename: &str) -> FileStoreResult<()> {
        if filename.is_empty()
            || filename.contains('/')
            || filename.contains('\\')
            || filename.contains("..")
            || filename.bytes().any(|b| b.is_ascii_control())
        {
            return Err(FileStoreError::InvalidFilename(filename.to_string()));
        }
        Ok(())
    }

    fn file_path(&self, folder: &str, filename: &str) -> PathBuf {
        let mut path = self.base_path.clone();
        path.push(folder);
        path.push(filename);
        path
    }

    /// Strip any client-supplied directory components, keeping only the
    /// final path segment with control characters removed.
    fn sanitize_original_name(original_name: &str) -> String {
        let last_segment = original_name
            .rsplit(['/', '\\'])
            .next()
            .unwrap_or(original_name);
        last_segment
            .chars()
            .filter(|c| !c.is_control())
            .collect::<String>()
            .replace("..", "")
    }

    /// Write `content` into the store under a freshly generated name and
    /// return that name.
    ///
    /// Bytes go to a temp file first and are renamed into place after a
    /// sync, so a crash mid-write never leaves a partial attachment under a
    /// referenced name. The temp file is removed on any failure.
    pub async fn store(
        &self,
        folder: &str,
        original_name: &str,
        content: &[u8],
    ) -> FileStoreResult<String> {
        let sanitized = Self::sanitize_original_name(original_name);
        let generated = format!("{}{}", Uuid::new_v4(), sanitized);
        self.ensure_filename_safe(&generated)?;

        let folder_path = self.base_path.join(folder);
        fs::create_dir_all(&folder_path).await?;

        let tmp_path = folder_path.join(format!(".tmp-{}", Uuid::new_v4()));
        let mut file = File::create(&tmp_path).await?;
        if let Err(err) = write_all_synced(&mut file, content).await {
            let _ = fs::remove_file(&tmp_path).await;
            return Err(FileStoreError::Io(err));
        }
        drop(file);

        let final_path = folder_path.join(&generated);
        if let Err(err) = fs::rename(&tmp_path, &final_path).await {
            let _ = fs::remove_file(&tmp_path).await;
            return Err(FileStoreError::Io(err));
        }

        debug!("stored attachment {}", final_path.display());
        Ok(generated)
    }

    /// Delete a stored attachment if present.
    pub async fn remove(&self, folder: &str, filename: &str) -> FileStoreResult<RemoveStatus> {
        self.ensure_filename_safe(filename)?;
        let path = self.file_path(folder, filename);
        match fs::remove_file(&path).await {
            Ok(()) => {
                debug!("removed attachment {}", path.display());
                Ok(RemoveStatus::Deleted)
            }
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!("attachment {} already missing", path.display());
                Ok(RemoveStatus::NotFound)
            }
            Err(err) => Err(FileStoreError::Io(err)),
        }
    }

    /// Open a stored attachment for streaming out, returning the handle and
    /// its length. `Err(Io)` with `NotFound` kind means no such attachment.
    pub async fn open(&self, folder: &str, filename: &str) -> FileStoreResult<(File, u64)> {
        self.ensure_filename_safe(filename)?;
        let path = self.file_path(folder, filename);
        let file = File::open(&path).await?;
        let len = file.metadata().await?.len();
        Ok((file, len))
    }
}

async fn write_all_synced(file: &mut File, content: &[u8]) -> io::Result<()> {
    file.write_all(content).await?;
    file.flush().await?;
    file.sync_all().await
}
