use std::path::{Path, PathBuf};

use futures::StreamExt;
use reqwest::Client;
use shared::domain::VideoArtifact;
use thiserror::Error;
use tokio::{fs, io::AsyncWriteExt};
use tracing::info;

#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("failed to fetch video from {url}: {message}")]
    Fetch { url: String, message: String },
    #[error("video fetch from {url} returned status {status}")]
    Status { url: String, status: u16 },
    #[error("failed to write video to {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid video file name '{0}'")]
    InvalidName(String),
}

/// File name the video is saved under: the artifact name, or the default
/// when the backend left it empty. Only the final path component is kept.
pub fn download_file_name(video: &VideoArtifact) -> Result<String, DownloadError> {
    let raw = video.file_name();
    Path::new(raw)
        .file_name()
        .and_then(|name| name.to_str())
        .map(str::to_string)
        .ok_or_else(|| DownloadError::InvalidName(raw.to_string()))
}

#[derive(Clone, Default)]
pub struct VideoDownloader {
    http: Client,
}

impl VideoDownloader {
    pub fn new() -> Self {
        Self::with_client(Client::new())
    }

    pub fn with_client(http: Client) -> Self {
        Self { http }
    }

    /// Saves the video into `dir` under [`download_file_name`].
    pub async fn save_to_dir(
        &self,
        video: &VideoArtifact,
        dir: &Path,
    ) -> Result<PathBuf, DownloadError> {
        let path = dir.join(download_file_name(video)?);
        self.save_to_path(&video.url, &path).await?;
        Ok(path)
    }

    /// Streams `url` into `path`, returning the number of bytes written.
    ///
    /// Bytes go to a `.part` sibling first and are renamed into place once
    /// the body is complete.
    pub async fn save_to_path(&self, url: &str, path: &Path) -> Result<u64, DownloadError> {
        let io_err = |source: std::io::Error| DownloadError::Io {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await.map_err(io_err)?;
        }

        let response = self.request(url).await?;
        let partial = partial_path(path);
        let written = match write_body(response, url, path, &partial).await {
            Ok(written) => written,
            Err(err) => {
                let _ = fs::remove_file(&partial).await;
                return Err(err);
            }
        };
        if let Err(source) = fs::rename(&partial, path).await {
            let _ = fs::remove_file(&partial).await;
            return Err(io_err(source));
        }

        info!(%url, path = %path.display(), bytes = written, "video saved");
        Ok(written)
    }

    async fn request(&self, url: &str) -> Result<reqwest::Response, DownloadError> {
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|err| DownloadError::Fetch {
                url: url.to_string(),
                message: err.to_string(),
            })?;
        let status = response.status();
        if !status.is_success() {
            return Err(DownloadError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        Ok(response)
    }
}

/// Streams the body into `partial`. The caller removes `partial` on error.
async fn write_body(
    response: reqwest::Response,
    url: &str,
    path: &Path,
    partial: &Path,
) -> Result<u64, DownloadError> {
    let io_err = |source: std::io::Error| DownloadError::Io {
        path: path.to_path_buf(),
        source,
    };

    let mut file = fs::File::create(partial).await.map_err(io_err)?;
    let mut stream = response.bytes_stream();
    let mut written = 0u64;
    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|err| DownloadError::Fetch {
            url: url.to_string(),
            message: err.to_string(),
        })?;
        file.write_all(&chunk).await.map_err(io_err)?;
        written += chunk.len() as u64;
    }
    file.flush().await.map_err(io_err)?;
    Ok(written)
}

fn partial_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".part");
    path.with_file_name(name)
}

#[cfg(test)]
#[path = "tests/download_tests.rs"]
mod tests;
