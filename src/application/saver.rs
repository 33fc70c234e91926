use std::path::{Path, PathBuf};

use tracing::{error, info};

use crate::{application::download_coordinator::CompletedDownload, domain::AppError};

/// Where a finished download goes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveTarget {
    /// Ask with a native save dialog, pre-filled with the suggested name
    Ask,
    Directory(PathBuf),
}

/// Persist a completed download.
/// Returns `Ok(None)` when the user dismissed the save dialog.
pub async fn save_download(
    download: CompletedDownload,
    target: SaveTarget,
) -> Result<Option<PathBuf>, AppError> {
    let path = match target {
        SaveTarget::Ask => {
            let chosen = rfd::AsyncFileDialog::new()
                .set_file_name(&download.file_name)
                .save_file()
                .await
                .map(|handle| handle.path().to_path_buf());

            match chosen {
                Some(path) => path,
                None => {
                    info!(file_name = %download.file_name, "save dialog dismissed");
                    return Ok(None);
                }
            }
        }
        SaveTarget::Directory(dir) => {
            tokio::fs::create_dir_all(&dir).await.map_err(|e| {
                AppError::Io(format!("Failed to create {}: {}", dir.display(), e))
            })?;
            dir.join(&download.file_name)
        }
    };

    write_file(&path, &download.data).await?;
    info!(path = %path.display(), bytes = download.data.len(), "download saved");

    Ok(Some(path))
}

async fn write_file(path: &Path, data: &[u8]) -> Result<(), AppError> {
    tokio::fs::write(path, data).await.map_err(|e| {
        error!(path = %path.display(), error = %e, "write failed");
        AppError::Io(format!("Failed to write file: {}", e))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    fn scratch_dir(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!(
            "simple-video-downloader-{}-{}",
            name,
            std::process::id()
        ))
    }

    #[tokio::test]
    async fn test_save_into_directory() {
        let dir = scratch_dir("save");
        let download = CompletedDownload {
            file_name: "My Video.mp3".to_string(),
            data: Bytes::from_static(b"ID3 fake audio"),
        };

        let path = save_download(download, SaveTarget::Directory(dir.clone()))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(path, dir.join("My Video.mp3"));
        assert_eq!(tokio::fs::read(&path).await.unwrap(), b"ID3 fake audio");

        tokio::fs::remove_dir_all(&dir).await.unwrap();
    }

    #[tokio::test]
    async fn test_save_reports_io_error() {
        let dir = scratch_dir("blocked");
        tokio::fs::create_dir_all(&dir).await.unwrap();
        // a directory already occupies the target name
        tokio::fs::create_dir_all(dir.join("clip.mp4")).await.unwrap();

        let download = CompletedDownload {
            file_name: "clip.mp4".to_string(),
            data: Bytes::from_static(b"data"),
        };
        let err = save_download(download, SaveTarget::Directory(dir.clone()))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Io(_)));

        tokio::fs::remove_dir_all(&dir).await.unwrap();
    }
}
