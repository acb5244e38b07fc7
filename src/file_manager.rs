// src/file_manager.rs - Output file and folder housekeeping
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;
use tokio::io::AsyncWriteExt;

#[derive(Debug, Error)]
pub enum FileError {
    #[error("path not valid")]
    InvalidPath,
    #[error("file not valid")]
    InvalidFile,
    #[error("'{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl FileError {
    fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io { path: path.to_path_buf(), source }
    }

    /// The underlying OS error kind, if this was an I/O failure.
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            Self::Io { source, .. } => Some(source.kind()),
            _ => None,
        }
    }
}

fn join_checked(folder: &Path, file: &str) -> Result<PathBuf, FileError> {
    if folder.as_os_str().is_empty() {
        return Err(FileError::InvalidPath);
    }
    if file.is_empty() {
        return Err(FileError::InvalidFile);
    }
    Ok(folder.join(file))
}

/// Create `folder` and its parents. Succeeds if it already exists.
pub async fn touch_path(folder: &Path) -> Result<(), FileError> {
    if folder.as_os_str().is_empty() {
        return Err(FileError::InvalidPath);
    }
    fs::create_dir_all(folder)
        .await
        .map_err(|e| FileError::io(folder, e))
}

/// Remove `folder` if it is empty. A missing or non-empty folder is reported
/// through the returned error's kind.
pub async fn remove_path(folder: &Path) -> Result<(), FileError> {
    if folder.as_os_str().is_empty() {
        return Err(FileError::InvalidPath);
    }
    fs::remove_dir(folder)
        .await
        .map_err(|e| FileError::io(folder, e))?;
    tracing::info!("Removed folder {}", folder.display());
    Ok(())
}

/// Overwrite `folder/file` with `data`, creating the folder if needed.
pub async fn touch_file(folder: &Path, file: &str, data: &str) -> Result<(), FileError> {
    let path = join_checked(folder, file)?;
    touch_path(folder).await?;

    let mut handle = fs::File::create(&path)
        .await
        .map_err(|e| FileError::io(&path, e))?;
    handle
        .write_all(data.as_bytes())
        .await
        .map_err(|e| FileError::io(&path, e))?;
    // Dropping the handle closes it; flush first so the write is complete.
    handle.flush().await.map_err(|e| FileError::io(&path, e))?;
    Ok(())
}

/// Delete `folder/file`.
pub async fn remove_file(folder: &Path, file: &str) -> Result<(), FileError> {
    let path = join_checked(folder, file)?;
    fs::remove_file(&path)
        .await
        .map_err(|e| FileError::io(&path, e))?;
    tracing::info!("Removed file {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_touch_file_creates_folder_and_overwrites() {
        let dir = tempdir().unwrap();
        let folder = dir.path().join("nested").join("out");
        touch_file(&folder, "a.txt", "first line that is long").await.unwrap();
        touch_file(&folder, "a.txt", "°C").await.unwrap();
        let content = std::fs::read_to_string(folder.join("a.txt")).unwrap();
        assert_eq!(content, "°C");
    }

    #[tokio::test]
    async fn test_invalid_names_rejected() {
        let dir = tempdir().unwrap();
        assert!(matches!(touch_file(Path::new(""), "a.txt", "").await, Err(FileError::InvalidPath)));
        assert!(matches!(touch_file(dir.path(), "", "").await, Err(FileError::InvalidFile)));
        assert!(matches!(remove_file(Path::new(""), "a.txt").await, Err(FileError::InvalidPath)));
        assert!(matches!(touch_path(Path::new("")).await, Err(FileError::InvalidPath)));
        assert!(matches!(remove_path(Path::new("")).await, Err(FileError::InvalidPath)));
    }

    #[tokio::test]
    async fn test_remove_missing_file_reports_not_found() {
        let dir = tempdir().unwrap();
        let err = remove_file(dir.path(), "absent.txt").await.unwrap_err();
        assert_eq!(err.kind(), Some(ErrorKind::NotFound));
    }

    #[tokio::test]
    async fn test_remove_path_keeps_non_empty_folder() {
        let dir = tempdir().unwrap();
        let folder = dir.path().join("out");
        touch_file(&folder, "keep.txt", "x").await.unwrap();
        assert!(remove_path(&folder).await.is_err());
        assert!(folder.join("keep.txt").exists());

        remove_file(&folder, "keep.txt").await.unwrap();
        remove_path(&folder).await.unwrap();
        assert!(!folder.exists());
    }
}
